//! Recorder voice.
//!
//! Three sawtooth harmonics give the reedy, slightly nasal tone; a short
//! square "edge tone" models the air splitting on the labium at the start
//! of each note. A high-pass thins out the low end. This is the driest wind
//! recipe: a recorder is a small-room instrument.

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;
use crate::graph::oscillator::OscNode;

use super::parts::{bus, hit_gain, level, partial};
use super::Note;

const REVERB_SEND: f32 = 0.15;
const HARMONICS: [(f32, f32); 3] = [(1.0, 0.35), (2.0, 0.12), (3.0, 0.06)];

pub fn recorder(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;

    let thin = b.add(FilterNode::highpass((freq * 0.5).max(60.0), 0.7));
    let blow = Adsr::new(0.02, 0.05, 0.85, 0.08).pedal(note.sustain, 0.7, 0.05);

    for &(ratio, relative) in &HARMONICS {
        partial(b, thin, Waveform::Sawtooth, freq * ratio, blow, level(relative, vel), note)?;
    }

    let edge = b.add(OscNode::square(freq * 2.0));
    let edge_amp = hit_gain(b, level(0.08, vel), note.start, 0.003, 0.04)?;
    b.connect(edge, edge_amp)?;
    b.connect(edge_amp, thin)?;
    b.schedule(edge, note.start, note.end())?;

    let out = bus(b);
    b.connect(thin, out)?;
    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
