//! Open hi-hat voice.
//!
//! Same filter as the closed hat; the cymbals are left to ring, so the
//! noise decays over 300 ms instead of 50.

use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::hihat::{HAT_CUTOFF_HZ, HAT_REVERB_SEND};
use super::parts::{filtered_noise, level};
use super::DrumHit;

/// Create an open hi-hat voice.
pub fn openhat(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let amp = filtered_noise(
        b,
        FilterNode::highpass(HAT_CUTOFF_HZ, 1.0),
        level(0.35, hit.velocity),
        hit.start,
        0.3,
    )?;
    b.reverb_send(amp, HAT_REVERB_SEND)?;
    Ok(())
}
