//! Real-world scenario benchmarks.
//!
//! These benchmarks model actual usage: building and rendering complete
//! instrument voices, and the renderer mixing many voices into a device
//! buffer.

mod mix;
mod voices;

pub use mix::bench_mix;
pub use voices::bench_voices;
