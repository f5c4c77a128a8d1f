//! Tom drum voice.
//!
//! A sine that drops in pitch from 200 Hz to 80 Hz as it decays, the
//! characteristic "doom" of a floor tom.
//!
//! # Variations
//!
//! - Higher start pitch = rack tom
//! - Faster glide = more electronic, "pew" character

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;

use super::parts::{level, pitched_hit};
use super::DrumHit;

const REVERB_SEND: f32 = 0.2;

/// Create a tom voice.
pub fn tom(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let amp = pitched_hit(b, Waveform::Sine, 200.0, 80.0, 0.3, level(0.8, hit.velocity), hit.start, 0.4)?;
    b.reverb_send(amp, REVERB_SEND)?;
    Ok(())
}
