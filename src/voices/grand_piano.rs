//! Grand piano voice.
//!
//! Tuned separately from the upright rather than derived from it: six
//! harmonics with a brighter balance, two soundboard sines detuned either
//! side of the note, a heavier hammer, a longer release and half the signal
//! sent to the reverb.

use crate::dsp::noise::NoiseShape;
use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;
use crate::graph::oscillator::OscNode;

use super::parts::{adsr_gain, bus, hit_gain, level, noise_source, partial};
use super::piano::BASS_REGISTER_HZ;
use super::Note;

const REVERB_SEND: f32 = 0.5;
const HARMONICS: [f32; 6] = [0.7, 0.5, 0.35, 0.25, 0.15, 0.1];
const SOUNDBOARD: [(f32, f32); 2] = [(0.997, 0.06), (1.003, 0.06)];
const HAMMER_SECS: f32 = 0.008;

pub fn grand_piano(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;
    let out = bus(b);

    let string = Adsr::new(0.003, 0.6, 0.4, 1.2).pedal(note.sustain, 0.15, 0.35);

    // Fundamental through a gentle low-pass; heavier low end in the bass.
    let (cutoff, q) = if freq < BASS_REGISTER_HZ {
        ((freq * 6.0).max(400.0), 1.4)
    } else {
        ((freq * 10.0).min(12_000.0), 0.7)
    };
    let fundamental = b.add(OscNode::triangle(freq));
    let tone = b.add(FilterNode::lowpass(cutoff, q));
    let amp = adsr_gain(b, string, level(HARMONICS[0], vel), note)?;
    b.connect(fundamental, tone)?;
    b.connect(tone, amp)?;
    b.connect(amp, out)?;
    b.schedule(fundamental, note.start, note.end())?;

    for (n, &relative) in HARMONICS.iter().enumerate().skip(1) {
        let harmonic = (n + 1) as f32;
        let env = Adsr {
            decay: string.decay * (1.5 / harmonic as f64),
            ..string
        };
        partial(b, out, Waveform::Sine, freq * harmonic, env, level(relative, vel), note)?;
    }

    let board = Adsr::new(0.03, 0.8, 0.6, string.release);
    for &(detune, relative) in &SOUNDBOARD {
        partial(b, out, Waveform::Sine, freq * detune, board, level(relative, vel), note)?;
    }

    let hammer = noise_source(b, HAMMER_SECS, NoiseShape::ExponentialDecay { time_constant: 0.002 });
    let felt = b.add(FilterNode::bandpass((freq * 3.0).clamp(600.0, 4_000.0), 0.7));
    let strike = hit_gain(b, level(0.35, vel), note.start, 0.0005, HAMMER_SECS as f64)?;
    b.connect(hammer, felt)?;
    b.connect(felt, strike)?;
    b.connect(strike, out)?;
    b.schedule(hammer, note.start, note.end())?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::tests::{assert_well_formed, builder};
    use crate::voices::{build_instrument, Instrument};

    #[test]
    fn nine_generators_with_soundboard_detune() {
        let note = Note::new(220.0, 1.5, 0.9, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::GrandPiano, &note, builder()).unwrap();
        assert_well_formed(&graph, 0.0);
        assert_eq!(graph.generator_count(), 9);

        let detuned: Vec<f32> = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_oscillator())
            .map(|osc| osc.frequency_param().default_value() / 220.0)
            .filter(|ratio| (ratio - 1.0).abs() > 1e-4 && (ratio - 1.0).abs() < 0.01)
            .collect();
        assert_eq!(detuned.len(), 2);
    }
}
