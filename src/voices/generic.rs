//! Fallback voice for instrument names with no recipe of their own.
//!
//! One triangle wave, a quick rise and an exponential decay across the
//! whole note.

use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::oscillator::OscNode;

use super::parts::{hit_gain, level};
use super::Note;

const REVERB_SEND: f32 = 0.2;

pub fn generic(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let osc = b.add(OscNode::triangle(note.frequency));
    let amp = hit_gain(b, level(0.5, note.velocity), note.start, 0.01_f64.min(note.duration), note.duration)?;
    b.connect(osc, amp)?;
    b.schedule(osc, note.start, note.end())?;
    b.reverb_send(amp, REVERB_SEND)?;
    Ok(())
}
