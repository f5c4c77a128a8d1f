//! Flute voice.
//!
//! Soft and round: a sine carries the pitch, a quiet sawtooth adds the buzz
//! of air over the embouchure hole, a triangle an octave up fills in the
//! upper body, and a faint noise bed is the breath. A low-pass keeps it all
//! mellow.

use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::Adsr;
use crate::graph::filter::FilterNode;

use super::parts::{adsr_gain, bus, level, noise_bed, partial};
use super::Note;

const REVERB_SEND: f32 = 0.35;

pub fn flute(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;

    let tone = b.add(FilterNode::lowpass((freq * 4.0).clamp(800.0, 10_000.0), 0.8));
    let breath = Adsr::new(0.06, 0.12, 0.8, 0.15).pedal(note.sustain, 0.6, 0.08);

    partial(b, tone, Waveform::Sine, freq, breath, level(0.6, vel), note)?;
    partial(b, tone, Waveform::Sawtooth, freq, breath, level(0.05, vel), note)?;
    partial(b, tone, Waveform::Triangle, freq * 2.0, breath, level(0.15, vel), note)?;

    let air = noise_bed(b, 0.5);
    let air_amp = adsr_gain(b, breath, level(0.03, vel), note)?;
    b.connect(air, air_amp)?;
    b.connect(air_amp, tone)?;
    b.schedule(air, note.start, note.end())?;

    let out = bus(b);
    b.connect(tone, out)?;
    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
