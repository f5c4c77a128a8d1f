//! Closed hi-hat voice.
//!
//! Metallic "tick" sound: noise through a high-pass at 7 kHz so only the
//! brightest frequencies remain, gone within 50 ms.

use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::parts::{filtered_noise, level};
use super::DrumHit;

pub(crate) const HAT_CUTOFF_HZ: f32 = 7_000.0;
pub(crate) const HAT_REVERB_SEND: f32 = 0.15;

/// Create a closed hi-hat voice.
pub fn hihat(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let amp = filtered_noise(
        b,
        FilterNode::highpass(HAT_CUTOFF_HZ, 1.0),
        level(0.4, hit.velocity),
        hit.start,
        0.05,
    )?;
    b.reverb_send(amp, HAT_REVERB_SEND)?;
    Ok(())
}
