use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | passes          | rejects      | output tap      |
| --------- | --------------- | ------------ | --------------- |
| low-pass  | below cutoff    | above cutoff | v2              |
| high-pass | above cutoff    | below cutoff | x - k·v1 - v2   |
| band-pass | around cutoff   | both sides   | k·v1 (unity at the centre) |

Two-pole state-variable filter in topology-preserving (trapezoidal) form.
It has the same magnitude response as the RBJ biquad of the same type and Q,
but its coefficients can be recomputed every sample without zipper noise or
blowing up, which matters because cutoff sweeps (guitar string damping) are
automated per sample.

  g = tan(π · cutoff / sample_rate)
  k = 1 / Q
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone)]
pub struct SvFilter {
    ic1eq: f32,
    ic2eq: f32,

    g: f32,
    k: f32,
    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,
}

impl SvFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 1.0,
            cutoff_hz: f32::NAN,
            q: f32::NAN,
            filter_type,
        }
    }

    pub fn lowpass() -> Self {
        Self::new(FilterType::LowPass)
    }

    pub fn highpass() -> Self {
        Self::new(FilterType::HighPass)
    }

    pub fn bandpass() -> Self {
        Self::new(FilterType::BandPass)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Update cutoff and Q. Cheap when the values did not change.
    #[inline]
    pub fn set(&mut self, cutoff_hz: f32, q: f32, sample_rate: f32) {
        if cutoff_hz == self.cutoff_hz && q == self.q {
            return;
        }
        self.cutoff_hz = cutoff_hz;
        self.q = q;

        let nyquist_guard = sample_rate * 0.49;
        let cutoff = cutoff_hz.clamp(10.0, nyquist_guard);
        self.g = (PI * cutoff / sample_rate).tan();
        self.k = 1.0 / q.max(0.05);
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> FilterOutputs {
        let g = self.g;
        let k = self.k;
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let k = self.k;
        let outputs = self.next_sample(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => k * outputs.bandpass,
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
