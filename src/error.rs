//! Error types shared across the engine.
//!
//! Only [`EngineError`] crosses the public facade, and only from
//! initialization. The other variants surface from lower layers and are
//! logged and absorbed by the facade.

use thiserror::Error;

use crate::graph::node::NodeId;

/// Errors raised while scheduling automation on an [`AudioParam`](crate::graph::param::AudioParam).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("automation event at {time}s precedes the last scheduled event at {last}s")]
    OutOfOrder { time: f64, last: f64 },

    #[error("exponential ramp target must be positive, got {0}")]
    NonPositiveTarget(f32),

    #[error("automation value or time is not finite")]
    NonFinite,
}

/// Errors raised while wiring a voice graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("voice graph contains a cycle")]
    Cycle,

    #[error("node {0:?} does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not a generator")]
    NotAGenerator(NodeId),

    #[error("generator {0:?} cannot take an input")]
    GeneratorInput(NodeId),

    #[error("generator {0:?} was never started")]
    MissingStart(NodeId),

    #[error("generator {0:?} has no scheduled stop")]
    MissingStop(NodeId),

    #[error("generator {node:?} stops at {stop}s before it starts at {start}s")]
    StopBeforeStart { node: NodeId, start: f64, stop: f64 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("unsupported device sample format: {0}")]
    UnsupportedFormat(String),

    #[error("audio thread exited before the stream started")]
    BackendGone,

    #[error("engine has not been initialized")]
    NotInitialized,

    #[error("node is not in a state that allows this operation")]
    InvalidState,

    #[error("invalid note: {0}")]
    InvalidNote(String),

    #[error("voice queue to the audio thread is full")]
    QueueFull,

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
