//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here is allocation-free once constructed and safe to run on the
//! audio thread. The modules stay focused on signal math; scheduling, wiring
//! and musical decisions live in `graph` and `voices`.

/// Buffer summing and gain helpers.
pub mod amplify;
/// Uniformly partitioned FFT convolution (reverb).
pub mod convolution;
/// State-variable filter with low-pass, high-pass and band-pass taps.
pub mod filter;
/// Procedural noise buffers and the synthetic reverb impulse.
pub mod noise;
/// Phase-accumulator oscillators with PolyBLEP anti-aliasing.
pub mod oscillator;
