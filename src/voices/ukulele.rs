//! Ukulele voice.
//!
//! The guitar pluck model with nylon-string tuning (snappier pick, brighter
//! start, shorter body), plus two slightly sharp upper partials at ×2.01 and
//! ×3.02 that beat against the body for a chorus-like shimmer, and a quiet
//! high sine "sparkle" on the attack.

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::oscillator::OscNode;

use super::guitar::{plucked_string, Pluck};
use super::parts::{hit_gain, level, partial};
use super::Note;

const REVERB_SEND: f32 = 0.2;

const UKULELE: Pluck = Pluck {
    pick_level: 0.4,
    pick_decay: 0.04,
    noise_level: 0.2,
    body_level: 0.45,
    bright: 14.0,
    dark: 2.5,
    body: Adsr::new(0.001, 0.3, 0.2, 0.25),
};

const UPPER_PARTIALS: [(f32, f32); 2] = [(2.01, 0.18), (3.02, 0.1)];

pub fn ukulele(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;
    let out = plucked_string(b, note, &UKULELE)?;

    let ring = Adsr::new(0.002, 0.25, 0.15, 0.2).pedal(note.sustain, 0.05, 0.1);
    for &(ratio, relative) in &UPPER_PARTIALS {
        partial(b, out, Waveform::Sine, freq * ratio, ring, level(relative, vel), note)?;
    }

    let sparkle = b.add(OscNode::sine((freq * 4.0).min(12_000.0)));
    let sparkle_amp = hit_gain(b, level(0.06, vel), note.start, 0.001, 0.12)?;
    b.connect(sparkle, sparkle_amp)?;
    b.connect(sparkle_amp, out)?;
    b.schedule(sparkle, note.start, note.end())?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::tests::builder;
    use crate::voices::{build_instrument, Instrument};

    #[test]
    fn adds_detuned_upper_partials_and_sparkle() {
        let note = Note::new(392.0, 0.8, 0.7, 0.0, true).unwrap();
        let graph = build_instrument(Instrument::Ukulele, &note, builder()).unwrap();
        assert_eq!(graph.generator_count(), 6);

        let ratios: Vec<f32> = graph
            .nodes()
            .iter()
            .filter_map(|n| n.as_oscillator())
            .map(|osc| osc.frequency_param().default_value() / 392.0)
            .collect();
        assert!(ratios.iter().any(|r| (r - 2.01).abs() < 1e-4));
        assert!(ratios.iter().any(|r| (r - 3.02).abs() < 1e-4));
    }
}
