//! Upright piano voice.
//!
//! Additive model of a struck string: five harmonic partials, each with its
//! own envelope so the upper partials die away first, a short noise burst
//! for the hammer, and a slightly sharp sine for the neighbouring strings of
//! the same note ringing in sympathy.
//!
//! # How It Works
//!
//! 1. Fundamental through a low-pass; below ~150 Hz it is a square wave with
//!    a tighter, more resonant filter so bass notes get their thump
//! 2. Harmonics 2-5 as sines at 0.6, 0.4, 0.3, 0.2 of velocity
//! 3. 5 ms of decaying noise for the hammer strike
//! 4. Resonance sine at ×1.003
//! 5. Everything summed and sent 30% to the reverb

use crate::dsp::noise::NoiseShape;
use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;
use crate::graph::oscillator::OscNode;

use super::parts::{adsr_gain, bus, hit_gain, level, noise_source, partial};
use super::Note;

/// Below this the fundamental switches to the bass-register model.
pub(crate) const BASS_REGISTER_HZ: f32 = 150.0;
const REVERB_SEND: f32 = 0.3;
/// Relative level of the fundamental and harmonics 2..=5.
const PARTIALS: [f32; 5] = [0.8, 0.6, 0.4, 0.3, 0.2];
const HAMMER_SECS: f32 = 0.005;
const RESONANCE_DETUNE: f32 = 1.003;

pub fn piano(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;
    let out = bus(b);

    let string = Adsr::new(0.005, 0.4, 0.35, 0.6).pedal(note.sustain, 0.12, 0.15);

    // Fundamental
    let bass = freq < BASS_REGISTER_HZ;
    let (waveform, cutoff, q) = if bass {
        (Waveform::Square, (freq * 5.0).max(300.0), 2.0)
    } else {
        (Waveform::Triangle, (freq * 8.0).min(9_000.0), 0.9)
    };
    let fundamental = b.add(OscNode::new(waveform, freq));
    let tone = b.add(FilterNode::lowpass(cutoff, q));
    let amp = adsr_gain(b, string, level(PARTIALS[0], vel), note)?;
    b.connect(fundamental, tone)?;
    b.connect(tone, amp)?;
    b.connect(amp, out)?;
    b.schedule(fundamental, note.start, note.end())?;

    // Harmonics decay faster the higher they are.
    for (n, &relative) in PARTIALS.iter().enumerate().skip(1) {
        let harmonic = (n + 1) as f32;
        let env = Adsr {
            decay: string.decay / harmonic as f64 * 2.0,
            ..string
        };
        partial(b, out, Waveform::Sine, freq * harmonic, env, level(relative, vel), note)?;
    }

    // Hammer
    let hammer = noise_source(b, HAMMER_SECS, NoiseShape::ExponentialDecay { time_constant: 0.0015 });
    let felt = b.add(FilterNode::bandpass((freq * 4.0).clamp(800.0, 5_000.0), 0.8));
    let strike = hit_gain(b, level(0.3, vel), note.start, 0.0005, HAMMER_SECS as f64)?;
    b.connect(hammer, felt)?;
    b.connect(felt, strike)?;
    b.connect(strike, out)?;
    b.schedule(hammer, note.start, note.end())?;

    // Sympathetic strings
    let resonance = Adsr::new(0.02, 0.6, 0.5, string.release);
    partial(b, out, Waveform::Sine, freq * RESONANCE_DETUNE, resonance, level(0.1, vel), note)?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::tests::{assert_well_formed, builder};
    use crate::voices::{build_instrument, Instrument};

    #[test]
    fn seven_generators_all_stopping_at_note_end() {
        let note = Note::new(440.0, 1.0, 0.7, 2.0, true).unwrap();
        let graph = build_instrument(Instrument::Piano, &note, builder()).unwrap();
        assert_well_formed(&graph, 2.0);

        assert_eq!(graph.generator_count(), 7);
        for node in graph.generators() {
            assert_eq!(node.playback().unwrap().stop_time(), Some(3.0));
        }
    }

    #[test]
    fn bass_register_uses_square_fundamental() {
        let low = Note::new(110.0, 1.0, 0.7, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Piano, &low, builder()).unwrap();
        let first = graph.generators().next().unwrap();
        assert_eq!(first.waveform(), Some(Waveform::Square));

        let high = Note::new(440.0, 1.0, 0.7, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Piano, &high, builder()).unwrap();
        let first = graph.generators().next().unwrap();
        assert_eq!(first.waveform(), Some(Waveform::Triangle));
    }
}
