//! Ride cymbal voice.
//!
//! A band of shimmering noise around 8 kHz plus a high sine for the "ping"
//! of the bell. Quieter and more focused than a crash.

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::parts::{bus, filtered_noise, level, pitched_hit};
use super::DrumHit;

const REVERB_SEND: f32 = 0.25;

/// Create a ride cymbal voice.
pub fn ride(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let out = bus(b);
    let vel = hit.velocity;

    let shimmer = filtered_noise(b, FilterNode::bandpass(8_000.0, 1.5), level(0.3, vel), hit.start, 0.8)?;
    b.connect(shimmer, out)?;

    let bell = pitched_hit(b, Waveform::Sine, 3_200.0, 3_150.0, 0.4, level(0.08, vel), hit.start, 0.4)?;
    b.connect(bell, out)?;

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
