//! Schedulable nodes and the per-voice signal graph.
//!
//! Graph nodes wrap the low-level DSP primitives with what instrument recipes
//! need: automatable parameters on the engine clock, start/stop windows for
//! generators, and a builder that validates and orders a voice before it is
//! handed to the audio thread.

/// Scheduled gain/frequency curves (ADSR, strikes, sweeps).
pub mod envelope;
/// Wiring, validation and topological ordering of a voice.
pub mod builder;
/// One-shot and looping playback of noise buffers.
pub mod buffer_source;
/// State-variable filter node with automatable cutoff and Q.
pub mod filter;
/// Automatable gain stage.
pub mod gain;
/// Start/stop windows and the stop handle shared with the control thread.
pub mod generator;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators.
pub mod oscillator;
/// Breakpoint automation for node parameters.
pub mod param;
/// Shared convolution reverb fed by per-voice sends.
pub mod reverb;
/// A built voice: nodes in render order plus their buffers.
pub mod voice_graph;
