//! Benchmarks for low-level DSP primitives.

mod amplify;
mod convolution;
mod filter;
mod oscillator;
mod param;

pub use amplify::bench_amplify;
pub use convolution::bench_convolution;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use param::bench_param;
