//! Crash cymbal voice.
//!
//! Loud, bright and long: high-passed noise decaying over one and a half
//! seconds, with a healthy reverb send.

use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::parts::{filtered_noise, level};
use super::DrumHit;

const REVERB_SEND: f32 = 0.3;

/// Create a crash cymbal voice.
pub fn crash(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let amp = filtered_noise(
        b,
        FilterNode::highpass(5_000.0, 0.7),
        level(0.5, hit.velocity),
        hit.start,
        1.5,
    )?;
    b.reverb_send(amp, REVERB_SEND)?;
    Ok(())
}
