use crate::graph::generator::GeneratorHandle;
use crate::graph::node::RenderCtx;
use crate::graph::voice_graph::VoiceGraph;

/// One note or drum hit: a scheduled graph plus what it was played as.
///
/// Built on the control thread, moved to the audio thread for rendering, and
/// moved back once finished so it is dropped off the realtime path.
pub struct Voice {
    label: &'static str,
    frequency: Option<f32>,
    graph: VoiceGraph,
}

impl Voice {
    pub fn new(label: &'static str, frequency: Option<f32>, graph: VoiceGraph) -> Self {
        Self {
            label,
            frequency,
            graph,
        }
    }

    /// Control-side record of this voice for the tracker.
    pub fn tracking(&self) -> TrackedVoice {
        TrackedVoice {
            label: self.label,
            frequency: self.frequency,
            start: self.graph.start_time(),
            stop: self.graph.stop_time(),
            handles: self.graph.handles().to_vec(),
        }
    }

    pub fn render(&mut self, ctx: &RenderCtx, dry: &mut [f32], wet: &mut [f32]) {
        self.graph.render(ctx, dry, wet);
    }

    pub fn is_finished(&self) -> bool {
        self.graph.is_finished()
    }

    pub fn abandon(&self) {
        self.graph.abandon();
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn graph(&self) -> &VoiceGraph {
        &self.graph
    }
}

/// What the control thread keeps of a voice after handing it off: enough to
/// report on it and to stop it.
#[derive(Debug, Clone)]
pub struct TrackedVoice {
    /// Instrument or drum name the voice was played as.
    pub label: &'static str,
    /// Base frequency for melodic voices.
    pub frequency: Option<f32>,
    pub start: f64,
    pub stop: f64,
    pub handles: Vec<GeneratorHandle>,
}

impl TrackedVoice {
    pub fn generator_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(GeneratorHandle::is_stopped)
    }
}
