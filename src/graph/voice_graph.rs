use std::mem;

use crate::dsp::amplify::mix_into;
use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::Waveform;
use crate::graph::buffer_source::BufferSourceNode;
use crate::graph::filter::FilterNode;
use crate::graph::gain::GainNode;
use crate::graph::generator::{Generator, GeneratorHandle, Playback};
use crate::graph::node::{GraphNode, NodeId, RenderCtx, Sink};
use crate::graph::oscillator::OscNode;

/// Every node kind a recipe can place in a voice.
pub enum Node {
    Oscillator(OscNode),
    BufferSource(BufferSourceNode),
    Filter(FilterNode),
    Gain(GainNode),
}

impl Node {
    pub fn is_generator(&self) -> bool {
        matches!(self, Node::Oscillator(_) | Node::BufferSource(_))
    }

    pub fn playback(&self) -> Option<&Playback> {
        match self {
            Node::Oscillator(osc) => Some(osc.playback()),
            Node::BufferSource(src) => Some(src.playback()),
            Node::Filter(_) | Node::Gain(_) => None,
        }
    }

    pub fn playback_mut(&mut self) -> Option<&mut Playback> {
        match self {
            Node::Oscillator(osc) => Some(osc.playback_mut()),
            Node::BufferSource(src) => Some(src.playback_mut()),
            Node::Filter(_) | Node::Gain(_) => None,
        }
    }

    pub fn waveform(&self) -> Option<Waveform> {
        match self {
            Node::Oscillator(osc) => Some(osc.waveform()),
            _ => None,
        }
    }

    pub fn filter_type(&self) -> Option<FilterType> {
        match self {
            Node::Filter(filter) => Some(filter.filter_type()),
            _ => None,
        }
    }

    pub fn as_oscillator(&self) -> Option<&OscNode> {
        match self {
            Node::Oscillator(osc) => Some(osc),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&FilterNode> {
        match self {
            Node::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn as_gain(&self) -> Option<&GainNode> {
        match self {
            Node::Gain(gain) => Some(gain),
            _ => None,
        }
    }
}

impl GraphNode for Node {
    #[inline]
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match self {
            Node::Oscillator(n) => n.render_block(out, ctx),
            Node::BufferSource(n) => n.render_block(out, ctx),
            Node::Filter(n) => n.render_block(out, ctx),
            Node::Gain(n) => n.render_block(out, ctx),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Node::Oscillator(n) => n.is_active(),
            Node::BufferSource(n) => n.is_active(),
            Node::Filter(n) => n.is_active(),
            Node::Gain(n) => n.is_active(),
        }
    }
}

impl From<OscNode> for Node {
    fn from(node: OscNode) -> Self {
        Node::Oscillator(node)
    }
}

impl From<BufferSourceNode> for Node {
    fn from(node: BufferSourceNode) -> Self {
        Node::BufferSource(node)
    }
}

impl From<FilterNode> for Node {
    fn from(node: FilterNode) -> Self {
        Node::Filter(node)
    }
}

impl From<GainNode> for Node {
    fn from(node: GainNode) -> Self {
        Node::Gain(node)
    }
}

/// A validated, topologically ordered voice ready for the audio thread.
///
/// Built by [`VoiceBuilder`](crate::graph::builder::VoiceBuilder). All buffers
/// are allocated up front; rendering only reads and writes them.
pub struct VoiceGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) order: Vec<usize>,
    pub(crate) inputs: Vec<Vec<usize>>,
    pub(crate) sinks: Vec<(usize, Sink)>,
    pub(crate) buffers: Vec<Box<[f32]>>,
    pub(crate) handles: Vec<GeneratorHandle>,
    pub(crate) start: f64,
    pub(crate) stop: f64,
}

impl VoiceGraph {
    /// Render one block, adding the voice's output into the dry and reverb buses.
    pub fn render(&mut self, ctx: &RenderCtx, dry: &mut [f32], wet: &mut [f32]) {
        let len = dry.len();
        if ctx.time_at(len) <= self.start {
            return;
        }

        for &idx in &self.order {
            let mut buf = mem::take(&mut self.buffers[idx]);
            let out = &mut buf[..len];
            out.fill(0.0);
            for &input in &self.inputs[idx] {
                mix_into(out, &self.buffers[input][..len]);
            }
            self.nodes[idx].render_block(out, ctx);
            self.buffers[idx] = buf;
        }

        for &(idx, sink) in &self.sinks {
            let source = &self.buffers[idx][..len];
            match sink {
                Sink::Master => mix_into(dry, source),
                Sink::Reverb => mix_into(wet, source),
            }
        }
    }

    /// True once every generator has stopped; the voice can be retired.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(GeneratorHandle::is_stopped)
    }

    /// Stop every generator at once, for a voice that will never be rendered.
    pub fn abandon(&self) {
        self.handles.iter().for_each(GeneratorHandle::abandon);
    }

    pub fn handles(&self) -> &[GeneratorHandle] {
        &self.handles
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn generators(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_generator())
    }

    pub fn generator_count(&self) -> usize {
        self.handles.len()
    }

    pub fn sinks(&self) -> impl Iterator<Item = (NodeId, Sink)> + '_ {
        self.sinks.iter().map(|&(idx, sink)| (NodeId(idx), sink))
    }

    pub fn inputs(&self, id: NodeId) -> &[usize] {
        self.inputs.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Earliest generator start.
    pub fn start_time(&self) -> f64 {
        self.start
    }

    /// Latest generator stop.
    pub fn stop_time(&self) -> f64 {
        self.stop
    }
}
