//! Building blocks shared by several recipes.

use crate::dsp::noise::NoiseShape;
use crate::dsp::oscillator::Waveform;
use crate::error::EngineError;
use crate::graph::buffer_source::BufferSourceNode;
use crate::graph::builder::VoiceBuilder;
use crate::graph::envelope::{percussive, sweep, Adsr};
use crate::graph::filter::FilterNode;
use crate::graph::gain::GainNode;
use crate::graph::node::NodeId;
use crate::graph::oscillator::OscNode;
use crate::MIN_GAIN;

use super::Note;

/// Unity gain stage every layer of a voice sums into before the reverb send.
pub(crate) fn bus(b: &mut VoiceBuilder) -> NodeId {
    b.add(GainNode::new(1.0))
}

/// Gain stage carrying an ADSR curve for `note`.
pub(crate) fn adsr_gain(
    b: &mut VoiceBuilder,
    env: Adsr,
    peak: f32,
    note: &Note,
) -> Result<NodeId, EngineError> {
    let mut gain = GainNode::new(MIN_GAIN);
    env.schedule(gain.gain(), peak, note.start, note.duration)?;
    Ok(b.add(gain))
}

/// Gain stage carrying a strike-and-decay curve.
pub(crate) fn hit_gain(
    b: &mut VoiceBuilder,
    peak: f32,
    start: f64,
    attack: f64,
    decay: f64,
) -> Result<NodeId, EngineError> {
    let mut gain = GainNode::new(MIN_GAIN);
    percussive(gain.gain(), peak, start, attack, decay)?;
    Ok(b.add(gain))
}

/// Oscillator through its own ADSR into `dest`, playing for the whole note.
pub(crate) fn partial(
    b: &mut VoiceBuilder,
    dest: NodeId,
    waveform: Waveform,
    frequency: f32,
    env: Adsr,
    peak: f32,
    note: &Note,
) -> Result<NodeId, EngineError> {
    let osc = b.add(OscNode::new(waveform, frequency));
    let amp = adsr_gain(b, env, peak, note)?;
    b.connect(osc, amp)?;
    b.connect(amp, dest)?;
    b.schedule(osc, note.start, note.end())?;
    Ok(osc)
}

/// One-shot noise burst. Returns the source; the caller wires it and
/// schedules its stop.
pub(crate) fn noise_source(
    b: &mut VoiceBuilder,
    length: f32,
    shape: NoiseShape,
) -> NodeId {
    let buffer = b.noise(length, shape);
    b.add(BufferSourceNode::new(buffer))
}

/// Looping noise bed for breath and wind layers.
pub(crate) fn noise_bed(b: &mut VoiceBuilder, length: f32) -> NodeId {
    let buffer = b.noise(length, NoiseShape::Flat);
    b.add(BufferSourceNode::new(buffer).looping(true))
}

/// Peak level for a layer: its relative level scaled by note velocity.
#[inline]
pub(crate) fn level(relative: f32, velocity: f32) -> f32 {
    relative * velocity
}

/// Decaying noise through `filter`, gated to `decay` seconds from `start`.
/// Returns the gain stage at the end of the chain.
pub(crate) fn filtered_noise(
    b: &mut VoiceBuilder,
    filter: FilterNode,
    peak: f32,
    start: f64,
    decay: f64,
) -> Result<NodeId, EngineError> {
    let source = noise_source(b, decay as f32, NoiseShape::Flat);
    let filter = b.add(filter);
    let amp = hit_gain(b, peak, start, 0.001, decay)?;
    b.connect(source, filter)?;
    b.connect(filter, amp)?;
    b.schedule(source, start, start + decay)?;
    Ok(amp)
}

/// Oscillator gliding from `from` to `to` Hz over `glide` seconds, struck
/// and decaying over `decay`. Returns the gain stage.
#[allow(clippy::too_many_arguments)]
pub(crate) fn pitched_hit(
    b: &mut VoiceBuilder,
    waveform: Waveform,
    from: f32,
    to: f32,
    glide: f64,
    peak: f32,
    start: f64,
    decay: f64,
) -> Result<NodeId, EngineError> {
    let mut osc = OscNode::new(waveform, from);
    sweep(osc.frequency(), from, to, start, glide)?;
    let osc = b.add(osc);
    let amp = hit_gain(b, peak, start, 0.001, decay)?;
    b.connect(osc, amp)?;
    b.schedule(osc, start, start + decay.max(glide))?;
    Ok(amp)
}
