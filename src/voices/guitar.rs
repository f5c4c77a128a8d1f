//! Acoustic guitar voice.
//!
//! Pluck model in two layers:
//!
//! 1. Attack: a square wave and a burst of band-passed noise, both gone in a
//!    few tens of milliseconds. This is the pick leaving the string.
//! 2. Body: a sawtooth through a low-pass whose cutoff sweeps down across
//!    the note, the way a real string loses its upper harmonics first.
//!
//! The ukulele reuses this model with its own tuning.

use crate::dsp::noise::NoiseShape;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::{sweep, Adsr};
use crate::graph::filter::FilterNode;
use crate::graph::node::NodeId;
use crate::graph::oscillator::OscNode;

use super::parts::{adsr_gain, bus, hit_gain, level, noise_source};
use super::Note;

const REVERB_SEND: f32 = 0.1;

/// Tuning of the shared pluck model.
pub(crate) struct Pluck {
    pub pick_level: f32,
    pub pick_decay: f64,
    pub noise_level: f32,
    pub body_level: f32,
    /// Starting cutoff as a multiple of the note, and where it ends up.
    pub bright: f32,
    pub dark: f32,
    pub body: Adsr,
}

const GUITAR: Pluck = Pluck {
    pick_level: 0.45,
    pick_decay: 0.06,
    noise_level: 0.25,
    body_level: 0.5,
    bright: 10.0,
    dark: 1.5,
    body: Adsr::new(0.002, 0.5, 0.3, 0.4),
};

/// Build the two pluck layers into a fresh bus and return the bus.
pub(crate) fn plucked_string(b: &mut VoiceBuilder, note: &Note, tuning: &Pluck) -> Result<NodeId, EngineError> {
    let freq = note.frequency;
    let vel = note.velocity;
    let out = bus(b);

    // Pick attack
    let pick = b.add(OscNode::square(freq));
    let pick_amp = hit_gain(b, level(tuning.pick_level, vel), note.start, 0.001, tuning.pick_decay)?;
    b.connect(pick, pick_amp)?;
    b.connect(pick_amp, out)?;
    b.schedule(pick, note.start, note.end())?;

    let scrape = noise_source(b, 0.03, NoiseShape::LinearDecay);
    let edge = b.add(FilterNode::bandpass((freq * 3.0).clamp(1_000.0, 6_000.0), 1.2));
    let scrape_amp = hit_gain(b, level(tuning.noise_level, vel), note.start, 0.0005, 0.03)?;
    b.connect(scrape, edge)?;
    b.connect(edge, scrape_amp)?;
    b.connect(scrape_amp, out)?;
    b.schedule(scrape, note.start, note.end())?;

    // Ringing body, darkening over the note
    let body = b.add(OscNode::sawtooth(freq));
    let mut damping = FilterNode::lowpass(freq * tuning.bright, 1.0);
    sweep(
        damping.frequency(),
        (freq * tuning.bright).min(16_000.0),
        (freq * tuning.dark).max(80.0),
        note.start,
        note.duration,
    )?;
    let damping = b.add(damping);
    let env = tuning.body.pedal(note.sustain, 0.1, 0.15);
    let body_amp = adsr_gain(b, env, level(tuning.body_level, vel), note)?;
    b.connect(body, damping)?;
    b.connect(damping, body_amp)?;
    b.connect(body_amp, out)?;
    b.schedule(body, note.start, note.end())?;

    Ok(out)
}

pub fn guitar(b: &mut VoiceBuilder, note: &Note) -> Result<(), EngineError> {
    let out = plucked_string(b, note, &GUITAR)?;
    b.reverb_send(out, REVERB_SEND)?;
    Ok(())
}
