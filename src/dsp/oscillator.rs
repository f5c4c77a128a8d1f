#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulator Oscillator
============================

Every periodic waveform is generated from one number: the phase, a position
within the current cycle in [0, 1). Each sample the phase advances by

    increment = frequency / sample_rate

and wraps back to 0 when it passes 1. The waveform is a function of phase:

  Sine:      sin(2π · phase)
  Sawtooth:  2 · phase - 1                     (ramp, jumps at the wrap)
  Square:    +1 for phase < 0.5, -1 otherwise  (jumps twice per cycle)
  Triangle:  folded ramp, continuous, corners only

The jumps in saw and square alias badly at high pitches. PolyBLEP replaces
the hard step with a short polynomial around each discontinuity, which
removes most of the audible aliasing for the cost of a couple of branches.

Frequency is supplied per sample, so a frequency ramp (kick drum pitch drop,
tom sweep) stays phase-continuous.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample at `frequency` and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        // Negative frequencies would run the phase backwards; clamp to Nyquist too.
        let increment = (frequency / sample_rate).clamp(0.0, 0.5);
        let phase = self.phase;

        let value = match self.waveform {
            Waveform::Sine => (std::f32::consts::TAU * phase).sin(),
            Waveform::Sawtooth => 2.0 * phase - 1.0 - poly_blep(phase, increment),
            Waveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(phase, increment) - poly_blep((phase + 0.5).fract(), increment)
            }
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Polynomial band-limited step correction around a wrap at phase 0.
#[inline]
fn poly_blep(phase: f32, increment: f32) -> f32 {
    if increment <= 0.0 {
        return 0.0;
    }
    if phase < increment {
        let t = phase / increment;
        2.0 * t - t * t - 1.0
    } else if phase > 1.0 - increment {
        let t = (phase - 1.0) / increment;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn valid_sine() {
        let mut osc = Oscillator::new(Waveform::Sine);
        let samples: Vec<f32> = (0..128).map(|_| osc.next_sample(440.0, SAMPLE_RATE)).collect();

        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / SAMPLE_RATE).sin();
        let actual = samples[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn waveforms_stay_in_range() {
        for waveform in [Waveform::Sine, Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
            let mut osc = Oscillator::new(waveform);
            for _ in 0..4_800 {
                let s = osc.next_sample(1_234.0, SAMPLE_RATE);
                assert!(s.is_finite());
                assert!(s.abs() <= 1.01, "{waveform:?} produced {s}");
            }
        }
    }

    #[test]
    fn square_has_no_dc_offset() {
        let mut osc = Oscillator::new(Waveform::Square);
        let sum: f32 = (0..48_000).map(|_| osc.next_sample(100.0, SAMPLE_RATE)).sum();
        assert!((sum / 48_000.0).abs() < 0.01);
    }

    #[test]
    fn zero_frequency_holds_phase() {
        let mut osc = Oscillator::new(Waveform::Triangle);
        let first = osc.next_sample(0.0, SAMPLE_RATE);
        let second = osc.next_sample(0.0, SAMPLE_RATE);
        assert_eq!(first, second);
    }
}
