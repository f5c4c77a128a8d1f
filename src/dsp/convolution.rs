//! Uniformly partitioned FFT convolution.
//!
//! # Why partitioned
//!
//! A 2 second impulse response at 48 kHz is 96 000 taps. Direct convolution
//! would cost 96 000 multiplies per output sample. Instead the impulse is cut
//! into partitions of one render block each, every partition is transformed
//! once up front, and each block of input is transformed once and multiplied
//! against all partitions in the frequency domain.
//!
//! ```text
//! input block ─→ FFT ─→ [X₀ X₁ X₂ … X_P]   frequency-domain delay line
//!                          ×  ×  ×     ×
//!                         H₀ H₁ H₂ … H_P   impulse partitions (per channel)
//!                          └──── Σ ────┘
//!                               IFFT ─→ keep last B samples (overlap-save)
//! ```
//!
//! Latency is zero: the first partition contributes to the same block. All
//! buffers and FFT plans are allocated in [`PartitionedConvolver::new`];
//! [`PartitionedConvolver::process`] does not allocate.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Loudness calibration applied when normalizing an impulse response.
const GAIN_CALIBRATION: f32 = 0.001_25;
/// Sample rate the calibration constant was chosen at.
const GAIN_CALIBRATION_SAMPLE_RATE: f32 = 44_100.0;
/// Floor on impulse power so a near-silent response is not boosted to infinity.
const MIN_POWER: f32 = 0.000_125;

struct ChannelFilter {
    partitions: Vec<Box<[Complex<f32>]>>,
    accumulator: Box<[Complex<f32>]>,
}

pub struct PartitionedConvolver {
    block: usize,
    fft_size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    channels: [ChannelFilter; 2],

    /// Spectra of recent input windows, newest at `head`.
    history: Vec<Box<[Complex<f32>]>>,
    head: usize,

    /// Previous block followed by current block.
    window: Box<[f32]>,
    spectrum: Box<[Complex<f32>]>,
    scratch: Box<[Complex<f32>]>,

    silent_blocks: usize,
}

impl PartitionedConvolver {
    /// Build a stereo convolver for blocks of exactly `block` samples.
    ///
    /// When `normalize` is set the impulse is scaled by its inverse RMS power
    /// and a fixed calibration gain, so impulses of different lengths end up
    /// at a similar loudness.
    pub fn new(left: &[f32], right: &[f32], block: usize, sample_rate: f32, normalize: bool) -> Self {
        let block = block.max(1);
        let fft_size = block * 2;
        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::default(); scratch_len].into_boxed_slice();

        let scale = if normalize {
            normalization_scale(left, right, sample_rate)
        } else {
            1.0
        };

        let partition_count = left.len().max(right.len()).div_ceil(block).max(1);
        let mut partition = |ir: &[f32]| -> ChannelFilter {
            let partitions = (0..partition_count)
                .map(|p| {
                    let mut buf = vec![Complex::default(); fft_size].into_boxed_slice();
                    let start = (p * block).min(ir.len());
                    let end = (start + block).min(ir.len());
                    for (slot, &tap) in buf.iter_mut().zip(&ir[start..end]) {
                        *slot = Complex::new(tap * scale, 0.0);
                    }
                    forward.process_with_scratch(&mut buf, &mut scratch);
                    buf
                })
                .collect();
            ChannelFilter {
                partitions,
                accumulator: vec![Complex::default(); fft_size].into_boxed_slice(),
            }
        };
        let channels = [partition(left), partition(right)];

        Self {
            block,
            fft_size,
            forward,
            inverse,
            channels,
            history: (0..partition_count)
                .map(|_| vec![Complex::default(); fft_size].into_boxed_slice())
                .collect(),
            head: 0,
            window: vec![0.0; fft_size].into_boxed_slice(),
            spectrum: vec![Complex::default(); fft_size].into_boxed_slice(),
            scratch,
            silent_blocks: 0,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block
    }

    pub fn partition_count(&self) -> usize {
        self.history.len()
    }

    /// Convolve one block. All three slices must be exactly `block_size()` long.
    pub fn process(&mut self, input: &[f32], left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(input.len(), self.block);
        debug_assert_eq!(left.len(), self.block);
        debug_assert_eq!(right.len(), self.block);

        // Once the whole delay line has seen only silence, every stored
        // spectrum is zero and the output is exactly zero.
        if input.iter().all(|&s| s == 0.0) {
            self.silent_blocks = self.silent_blocks.saturating_add(1);
        } else {
            self.silent_blocks = 0;
        }
        if self.silent_blocks > self.history.len() + 1 {
            left.fill(0.0);
            right.fill(0.0);
            return;
        }

        let block = self.block;
        self.window.copy_within(block.., 0);
        self.window[block..].copy_from_slice(input);

        for (bin, &sample) in self.spectrum.iter_mut().zip(self.window.iter()) {
            *bin = Complex::new(sample, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let count = self.history.len();
        self.head = (self.head + 1) % count;
        self.history[self.head].copy_from_slice(&self.spectrum);

        let norm = 1.0 / self.fft_size as f32;
        for (channel, out) in self.channels.iter_mut().zip([left, right]) {
            channel.accumulator.fill(Complex::default());
            for (p, h) in channel.partitions.iter().enumerate() {
                let x = &self.history[(self.head + count - p) % count];
                for ((acc, &xk), &hk) in channel.accumulator.iter_mut().zip(x.iter()).zip(h.iter()) {
                    *acc += xk * hk;
                }
            }
            self.inverse
                .process_with_scratch(&mut channel.accumulator, &mut self.scratch);

            for (o, y) in out.iter_mut().zip(channel.accumulator[block..].iter()) {
                *o = y.re * norm;
            }
        }
    }

    pub fn reset(&mut self) {
        for spectrum in &mut self.history {
            spectrum.fill(Complex::default());
        }
        self.window.fill(0.0);
        self.silent_blocks = 0;
    }
}

/// Inverse RMS scale, calibrated so a unit noise burst reverberates at a
/// comfortable level.
fn normalization_scale(left: &[f32], right: &[f32], sample_rate: f32) -> f32 {
    let len = left.len().max(right.len());
    if len == 0 {
        return 1.0;
    }
    let energy: f32 = left.iter().chain(right.iter()).map(|s| s * s).sum();
    let power = (energy / (2 * len) as f32).sqrt().max(MIN_POWER);

    let mut scale = GAIN_CALIBRATION / power;
    if sample_rate > 0.0 {
        scale *= GAIN_CALIBRATION_SAMPLE_RATE / sample_rate;
    }
    scale
}
