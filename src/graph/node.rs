/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frame: absolute index of the first frame in this block
/// - time: absolute time of the first frame in seconds, on the engine clock
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frame: u64) -> Self {
        Self {
            sample_rate,
            frame,
            time: frame as f64 / sample_rate as f64,
        }
    }

    /// Absolute time of sample `index` within the block.
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }

    /// Seconds between consecutive samples.
    #[inline]
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }
}

/// Index of a node inside one voice graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Engine-level destinations a voice can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Straight into the master gain.
    Master,
    /// Into the shared convolution reverb, whose output joins the master gain.
    Reverb,
}

/// Core trait for audio processing graph nodes
///
/// Processing is in place: the graph sums every connected input into `out`
/// before calling `render_block`. Generators ignore that input (it is always
/// silence, they have no inputs) and overwrite it; processors transform it.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound.
    ///
    /// Processors default to active; generators report their playback state.
    fn is_active(&self) -> bool {
        true
    }
}
