//! Snare drum voice.
//!
//! Two layers, like the real drum:
//!
//! 1. The wires: noise through a high-pass, a fast-decaying sizzle
//! 2. The shell: a triangle falling from 250 Hz to 120 Hz for the "thwack"
//!
//! # Variations
//!
//! - Higher high-pass cutoff = tighter, brighter snare
//! - Longer noise decay = looser wires

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::parts::{bus, filtered_noise, level, pitched_hit};
use super::DrumHit;

const REVERB_SEND: f32 = 0.2;

/// Create a snare drum voice.
pub fn snare(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let out = bus(b);
    let vel = hit.velocity;

    let wires = filtered_noise(b, FilterNode::highpass(1_000.0, 0.7), level(0.7, vel), hit.start, 0.2)?;
    b.connect(wires, out)?;

    let shell = pitched_hit(b, Waveform::Triangle, 250.0, 120.0, 0.1, level(0.5, vel), hit.start, 0.1)?;
    b.connect(shell, out)?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
