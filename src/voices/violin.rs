//! Violin voice.
//!
//! A bowed string is a sawtooth-like wave; what makes it a violin is the
//! wooden body, whose resonances sit at fixed frequencies no matter which
//! note is played. So the formant filters and the body sines here are tuned
//! in Hz, not relative to the note.
//!
//! # How It Works
//!
//! 1. Sawtooth at the note frequency
//! 2. Two parallel band-pass formants at 600 Hz and 1400 Hz
//! 3. Body resonance sines at 440 Hz and 880 Hz, independent of the note
//! 4. A short burst of filtered noise where the bow bites the string
//! 5. Slow 80 ms attack; release proportional to the note length

use crate::dsp::noise::NoiseShape;
use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;
use crate::graph::oscillator::OscNode;

use super::parts::{adsr_gain, bus, hit_gain, level, noise_source, partial};
use super::Note;

const REVERB_SEND: f32 = 0.4;
/// Body formants: (centre Hz, Q, level).
const FORMANTS: [(f32, f32, f32); 2] = [(600.0, 2.5, 0.55), (1_400.0, 3.0, 0.35)];
const BODY_RESONANCE: [(f32, f32); 2] = [(440.0, 0.05), (880.0, 0.03)];
const BOW_SECS: f32 = 0.06;

pub fn violin(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let vel = note.velocity;
    let out = bus(b);

    let bow = Adsr::new(0.08, 0.1, 0.85, 0.2)
        .proportional_release(note.duration, 0.25, 0.08, 1.0)
        .pedal(note.sustain, 0.6, 0.1);

    let string = b.add(OscNode::sawtooth(note.frequency));
    for &(centre, q, relative) in &FORMANTS {
        let formant = b.add(FilterNode::bandpass(centre, q));
        let amp = adsr_gain(b, bow, level(relative, vel), note)?;
        b.connect(string, formant)?;
        b.connect(formant, amp)?;
        b.connect(amp, out)?;
    }
    b.schedule(string, note.start, note.end())?;

    for &(hz, relative) in &BODY_RESONANCE {
        partial(b, out, Waveform::Sine, hz, bow, level(relative, vel), note)?;
    }

    let scrape = noise_source(b, BOW_SECS, NoiseShape::LinearDecay);
    let rosin = b.add(FilterNode::bandpass(2_500.0, 1.0));
    let bite = hit_gain(b, level(0.12, vel), note.start, 0.005, BOW_SECS as f64)?;
    b.connect(scrape, rosin)?;
    b.connect(rosin, bite)?;
    b.connect(bite, out)?;
    b.schedule(scrape, note.start, note.end())?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::filter::FilterType;
    use crate::voices::tests::builder;
    use crate::voices::{build_instrument, Instrument};

    fn fixed_frequencies(freq: f32) -> (Vec<f32>, Vec<f32>) {
        let note = Note::new(freq, 1.0, 0.7, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Violin, &note, builder()).unwrap();
        let formants = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_filter())
            .filter(|f| f.filter_type() == FilterType::BandPass)
            .map(|f| f.frequency_param().default_value())
            .collect();
        let sines = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_oscillator())
            .filter(|o| o.waveform() == Waveform::Sine)
            .map(|o| o.frequency_param().default_value())
            .collect();
        (formants, sines)
    }

    #[test]
    fn body_does_not_track_pitch() {
        let (formants_low, sines_low) = fixed_frequencies(196.0);
        let (formants_high, sines_high) = fixed_frequencies(659.0);
        assert_eq!(formants_low, formants_high);
        assert_eq!(sines_low, sines_high);
        assert!(formants_low.contains(&600.0));
        assert!(formants_low.contains(&1_400.0));
        assert_eq!(sines_low, [440.0, 880.0]);
    }

    #[test]
    fn slow_bowed_attack() {
        let note = Note::new(440.0, 2.0, 1.0, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Violin, &note, builder()).unwrap();
        let env = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_gain())
            .find(|g| g.gain_param().events().len() == 5)
            .unwrap()
            .gain_param();
        assert!((env.events()[1].time - 0.08).abs() < 1e-9);
    }
}
