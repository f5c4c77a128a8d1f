//! Kick drum voice.
//!
//! A sine whose pitch falls away from 80 Hz toward nothing over half a
//! second gives the body its "boom". A very short, very quiet triangle on
//! top marks the beater. It is kept deliberately faint: a louder click
//! turns harsh on small speakers.
//!
//! # Variations
//!
//! - Longer decay = boomy 808-style kick (see the bass drum)
//! - Higher start pitch = more punch

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::node::Sink;

use super::parts::{bus, level, pitched_hit};
use super::DrumHit;

pub(crate) const KICK_START_HZ: f32 = 80.0;
/// Exponential ramps cannot reach zero; this is "nothing" for the glide.
pub(crate) const KICK_END_HZ: f32 = 0.01;
pub(crate) const KICK_SECS: f64 = 0.5;

/// Create a kick drum voice. The kick is tuned by the voice itself and sits
/// straight on the master, with no reverb.
pub fn kick(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let out = bus(b);
    let vel = hit.velocity;

    let body = pitched_hit(
        b,
        Waveform::Sine,
        KICK_START_HZ,
        KICK_END_HZ,
        KICK_SECS,
        level(1.0, vel),
        hit.start,
        KICK_SECS,
    )?;
    b.connect(body, out)?;

    let click = pitched_hit(b, Waveform::Triangle, 1_200.0, 300.0, 0.015, level(0.06, vel), hit.start, 0.02)?;
    b.connect(click, out)?;

    b.connect_to(out, Sink::Master)?;
    Ok(())
}
