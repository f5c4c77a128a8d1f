use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dsp::noise::{noise_buffer, sample_count, NoiseShape};
use crate::error::GraphError;
use crate::graph::gain::GainNode;
use crate::graph::generator::Playback;
use crate::graph::node::{NodeId, Sink};
use crate::graph::voice_graph::{Node, VoiceGraph};
use crate::RENDER_QUANTUM;

/*
Voice Builder
=============

Recipes describe a voice the way a patch is wired on a modular synth: add
nodes, connect them, route the last stage to a sink.

  let mut b = VoiceBuilder::new(sample_rate);
  let osc = b.add(OscNode::triangle(freq));
  let env = b.add(gain);
  b.connect(osc, env)?;
  b.reverb_send(env, 0.3)?;
  b.schedule(osc, t, t + duration)?;
  let voice = b.build()?;

`build` runs on the control thread and does everything the audio thread
must never do: checks every generator has a start and a stop with
stop >= start, orders the nodes so each one renders after its inputs, and
allocates one block buffer per node.
*/

pub struct VoiceBuilder {
    sample_rate: f32,
    fade_samples: u32,
    rng: StdRng,
    nodes: Vec<Node>,
    edges: Vec<(usize, usize)>,
    sinks: Vec<(usize, Sink)>,
}

impl VoiceBuilder {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            fade_samples: 1,
            rng: StdRng::from_entropy(),
            nodes: Vec::new(),
            edges: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Use a fixed random source (reproducible noise in tests and benches).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Fade length used when a generator of this voice is stopped early.
    pub fn with_stop_fade(mut self, seconds: f32) -> Self {
        self.fade_samples = (seconds.max(0.0) * self.sample_rate).round().max(1.0) as u32;
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Fresh shaped noise for this voice only.
    pub fn noise(&mut self, duration: f32, shape: NoiseShape) -> Box<[f32]> {
        let len = sample_count(duration, self.sample_rate);
        noise_buffer(len, self.sample_rate, shape, &mut self.rng)
    }

    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let mut node = node.into();
        if let Some(playback) = node.playback_mut() {
            playback.set_fade_samples(self.fade_samples);
        }
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn check(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::UnknownNode(id))
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.check(from)?;
        if self.check(to)?.is_generator() {
            return Err(GraphError::GeneratorInput(to));
        }
        self.edges.push((from.0, to.0));
        Ok(())
    }

    pub fn connect_to(&mut self, from: NodeId, sink: Sink) -> Result<(), GraphError> {
        self.check(from)?;
        self.sinks.push((from.0, sink));
        Ok(())
    }

    /// Split `from` into a dry path to the master (1 - amount) and a wet
    /// path into the shared reverb (amount).
    pub fn reverb_send(&mut self, from: NodeId, amount: f32) -> Result<(), GraphError> {
        self.check(from)?;
        let amount = amount.clamp(0.0, 1.0);
        if amount <= 0.0 {
            return self.connect_to(from, Sink::Master);
        }
        if amount < 1.0 {
            let dry = self.add(GainNode::new(1.0 - amount));
            self.connect(from, dry)?;
            self.connect_to(dry, Sink::Master)?;
        }
        let wet = self.add(GainNode::new(amount));
        self.connect(from, wet)?;
        self.connect_to(wet, Sink::Reverb)
    }

    /// Start a generator that is already in the graph.
    pub fn start(&mut self, id: NodeId, time: f64) -> Result<(), GraphError> {
        self.playback_of(id)?.start_at(time);
        Ok(())
    }

    /// Schedule the stop of a generator that is already in the graph.
    pub fn stop(&mut self, id: NodeId, time: f64) -> Result<(), GraphError> {
        self.playback_of(id)?.stop_at(time);
        Ok(())
    }

    pub fn schedule(&mut self, id: NodeId, start: f64, stop: f64) -> Result<(), GraphError> {
        self.start(id, start)?;
        self.stop(id, stop)
    }

    fn playback_of(&mut self, id: NodeId) -> Result<&mut Playback, GraphError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(GraphError::UnknownNode(id))?
            .playback_mut()
            .ok_or(GraphError::NotAGenerator(id))
    }

    pub fn build(self) -> Result<VoiceGraph, GraphError> {
        let mut handles = Vec::new();
        let mut start = f64::INFINITY;
        let mut stop = f64::NEG_INFINITY;
        for (idx, node) in self.nodes.iter().enumerate() {
            let Some(playback) = node.playback() else {
                continue;
            };
            let id = NodeId(idx);
            let begin = playback.start_time().ok_or(GraphError::MissingStart(id))?;
            let end = playback.stop_time().ok_or(GraphError::MissingStop(id))?;
            if end < begin {
                return Err(GraphError::StopBeforeStart {
                    node: id,
                    start: begin,
                    stop: end,
                });
            }
            start = start.min(begin);
            stop = stop.max(end);
            handles.push(playback.handle());
        }
        if handles.is_empty() {
            start = 0.0;
            stop = 0.0;
        }

        let count = self.nodes.len();
        let mut inputs = vec![Vec::new(); count];
        for &(from, to) in &self.edges {
            inputs[to].push(from);
        }
        let order = topological_order(count, &self.edges)?;

        Ok(VoiceGraph {
            nodes: self.nodes,
            order,
            inputs,
            sinks: self.sinks,
            buffers: (0..count)
                .map(|_| vec![0.0; RENDER_QUANTUM].into_boxed_slice())
                .collect(),
            handles,
            start,
            stop,
        })
    }
}

/// Kahn's algorithm; fails on cycles.
fn topological_order(count: usize, edges: &[(usize, usize)]) -> Result<Vec<usize>, GraphError> {
    let mut in_degree = vec![0usize; count];
    let mut outputs = vec![Vec::new(); count];
    for &(from, to) in edges {
        in_degree[to] += 1;
        outputs[from].push(to);
    }

    let mut ready: VecDeque<usize> = (0..count).filter(|&n| in_degree[n] == 0).collect();
    let mut order = Vec::with_capacity(count);
    while let Some(node) = ready.pop_front() {
        order.push(node);
        for &next in &outputs[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push_back(next);
            }
        }
    }

    if order.len() == count {
        Ok(order)
    } else {
        Err(GraphError::Cycle)
    }
}
