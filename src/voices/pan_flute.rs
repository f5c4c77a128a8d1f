//! Pan flute voice.
//!
//! Two square "tubes" detuned against each other, a triangle fundamental
//! and a breathy sawtooth, all through a wide band-pass. Pan pipes are
//! played outdoors and in big rooms, so this is the wettest of the three
//! wind recipes.

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;

use super::parts::{adsr_gain, bus, level, noise_bed, partial};
use super::Note;

const REVERB_SEND: f32 = 0.45;
const TUBES: [(f32, f32); 2] = [(0.998, 0.12), (1.002, 0.12)];

pub fn pan_flute(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;

    let pipe = b.add(FilterNode::bandpass((freq * 1.5).clamp(300.0, 8_000.0), 0.5));
    let blow = Adsr::new(0.04, 0.15, 0.7, 0.3).pedal(note.sustain, 0.5, 0.12);

    for &(detune, relative) in &TUBES {
        partial(b, pipe, Waveform::Square, freq * detune, blow, level(relative, vel), note)?;
    }
    partial(b, pipe, Waveform::Triangle, freq, blow, level(0.5, vel), note)?;
    partial(b, pipe, Waveform::Sawtooth, freq, blow, level(0.06, vel), note)?;

    let air = noise_bed(b, 0.5);
    let chiff = adsr_gain(b, Adsr::new(0.01, 0.08, 0.3, 0.1), level(0.08, vel), note)?;
    b.connect(air, chiff)?;
    b.connect(chiff, pipe)?;
    b.schedule(air, note.start, note.end())?;

    let out = bus(b);
    b.connect(pipe, out)?;
    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
