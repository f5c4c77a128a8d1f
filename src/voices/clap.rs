//! Clap voice.
//!
//! Several hands never clap at exactly the same moment. Four bursts of
//! band-passed noise, 10 ms apart, each centred a little higher than the
//! last, smear into one clap. The last burst is left to ring a bit longer
//! as the room tail.
//!
//! # Variations
//!
//! - Higher band-pass centres = thinner, more "crack"
//! - Wider spacing = looser, more human

use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::parts::{bus, filtered_noise, level};
use super::DrumHit;

const REVERB_SEND: f32 = 0.3;
pub(crate) const BURST_SPACING: f64 = 0.01;
pub(crate) const BURST_CENTRES: [f32; 4] = [1_000.0, 1_200.0, 1_400.0, 1_600.0];

/// Create a clap voice.
pub fn clap(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let out = bus(b);
    let last = BURST_CENTRES.len() - 1;

    for (i, &centre) in BURST_CENTRES.iter().enumerate() {
        let start = hit.start + i as f64 * BURST_SPACING;
        let decay = if i == last { 0.12 } else { 0.03 };
        let burst = filtered_noise(
            b,
            FilterNode::bandpass(centre, 3.0),
            level(0.6, hit.velocity),
            start,
            decay,
        )?;
        b.connect(burst, out)?;
    }

    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
