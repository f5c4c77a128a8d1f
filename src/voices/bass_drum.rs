//! Bass drum voice.
//!
//! A longer, deeper relative of the kick whose decay is set by the caller
//! (`Engine::bass_drum_duration`). A sine body glides from 60 Hz down to a
//! sub rumble, a triangle a little higher gives it some knock, and a
//! low-pass keeps the whole thing round.

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::filter::FilterNode;

use super::parts::{bus, level, pitched_hit};
use super::{DrumHit, BASS_DRUM_DURATION_RANGE};

const REVERB_SEND: f32 = 0.1;

pub fn bass_drum(b: &mut VoiceBuilder, hit: &DrumHit) -> Result<(), EngineError> {
    let (min, max) = BASS_DRUM_DURATION_RANGE;
    let duration = if hit.bass_drum_duration.is_nan() {
        min
    } else {
        hit.bass_drum_duration.clamp(min, max)
    };
    let vel = hit.velocity;

    let round = b.add(FilterNode::lowpass(180.0, 0.9));
    let body = pitched_hit(b, Waveform::Sine, 60.0, 30.0, duration * 0.6, level(1.0, vel), hit.start, duration)?;
    b.connect(body, round)?;
    let knock = pitched_hit(b, Waveform::Triangle, 110.0, 45.0, 0.05, level(0.3, vel), hit.start, 0.12)?;
    b.connect(knock, round)?;

    let out = bus(b);
    b.connect(round, out)?;
    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
