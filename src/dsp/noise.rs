//! Procedural noise buffers.
//!
//! Every sample is `(random() * 2 - 1) * envelope(i)`. Buffers are one-shot
//! excitation signals (hammer strikes, bow scrape, breath, drum noise) and the
//! synthetic reverb impulse response. They are generated on the control thread
//! and never shared between voices.

use rand::Rng;

/// Amplitude shape applied across a noise buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseShape {
    /// Constant amplitude.
    Flat,
    /// Falls linearly from 1 to 0 across the buffer.
    LinearDecay,
    /// `exp(-t / time_constant)`, with `t` in seconds.
    ExponentialDecay { time_constant: f32 },
    /// `(1 - i / len) ^ exponent`.
    PowerDecay { exponent: f32 },
}

impl NoiseShape {
    #[inline]
    fn gain(&self, index: usize, len: usize, sample_rate: f32) -> f32 {
        let progress = index as f32 / len as f32;
        match *self {
            NoiseShape::Flat => 1.0,
            NoiseShape::LinearDecay => 1.0 - progress,
            NoiseShape::ExponentialDecay { time_constant } => {
                let t = index as f32 / sample_rate;
                (-t / time_constant.max(1e-6)).exp()
            }
            NoiseShape::PowerDecay { exponent } => (1.0 - progress).powf(exponent),
        }
    }
}

/// Number of whole samples covering `duration` seconds, at least one.
pub fn sample_count(duration: f32, sample_rate: f32) -> usize {
    ((duration.max(0.0) * sample_rate).round() as usize).max(1)
}

/// Fill a fresh mono buffer of `len` samples with shaped white noise.
pub fn noise_buffer<R: Rng + ?Sized>(
    len: usize,
    sample_rate: f32,
    shape: NoiseShape,
    rng: &mut R,
) -> Box<[f32]> {
    (0..len)
        .map(|i| (rng.gen::<f32>() * 2.0 - 1.0) * shape.gain(i, len, sample_rate))
        .collect()
}

/// Two-channel synthetic impulse response for the shared reverb.
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    pub left: Box<[f32]>,
    pub right: Box<[f32]>,
    pub sample_rate: f32,
}

impl ImpulseResponse {
    /// Decaying stereo noise: `(random() * 2 - 1) * (1 - i / len)^2`, with
    /// independent noise per channel for width.
    pub fn synthetic<R: Rng + ?Sized>(seconds: f32, sample_rate: f32, rng: &mut R) -> Self {
        let len = sample_count(seconds, sample_rate);
        let shape = NoiseShape::PowerDecay { exponent: 2.0 };
        Self {
            left: noise_buffer(len, sample_rate, shape, rng),
            right: noise_buffer(len, sample_rate, shape, rng),
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn duration(&self) -> f32 {
        self.len() as f32 / self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn samples_stay_within_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let buffer = noise_buffer(4_800, 48_000.0, NoiseShape::Flat, &mut rng);
        assert_eq!(buffer.len(), 4_800);
        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(buffer.iter().any(|s| s.abs() > 0.5), "noise should not be silent");
    }

    #[test]
    fn decays_toward_the_end() {
        let mut rng = StdRng::seed_from_u64(11);
        for shape in [
            NoiseShape::LinearDecay,
            NoiseShape::ExponentialDecay { time_constant: 0.005 },
            NoiseShape::PowerDecay { exponent: 2.0 },
        ] {
            let buffer = noise_buffer(4_800, 48_000.0, shape, &mut rng);
            let energy = |s: &[f32]| s.iter().map(|x| x * x).sum::<f32>();
            let head = energy(&buffer[..480]);
            let tail = energy(&buffer[4_320..]);
            assert!(head > tail * 10.0, "{shape:?}: head={head}, tail={tail}");
        }
    }

    #[test]
    fn impulse_response_is_stereo_and_sized() {
        let mut rng = StdRng::seed_from_u64(3);
        let ir = ImpulseResponse::synthetic(2.0, 8_000.0, &mut rng);
        assert_eq!(ir.len(), 16_000);
        assert_eq!(ir.right.len(), 16_000);
        assert!((ir.duration() - 2.0).abs() < 1e-6);
        assert_ne!(ir.left[..64], ir.right[..64], "channels should decorrelate");
    }

    #[test]
    fn sample_count_never_returns_zero() {
        assert_eq!(sample_count(0.0, 48_000.0), 1);
        assert_eq!(sample_count(0.005, 48_000.0), 240);
    }
}
