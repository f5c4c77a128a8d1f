pub mod dsp;
pub mod engine; // Facade, configuration and output backends
pub mod error;
pub mod graph; // Schedulable nodes and per-voice graphs
pub mod synth; // Voice runtime: render loop and tracking
pub mod voices; // Instrument and drum recipes

pub use engine::config::EngineConfig;
pub use engine::{Engine, DEFAULT_DRUM_VELOCITY};
pub use error::{EngineError, GraphError, ParamError};
pub use voices::{DrumKind, Instrument};

/// Frames rendered per audio quantum.
pub const RENDER_QUANTUM: usize = 128;

/// Lowest gain any envelope reaches. Exponential ramps cannot touch zero.
pub const MIN_GAIN: f32 = 0.001;
