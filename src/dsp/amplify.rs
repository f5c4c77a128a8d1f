//! Buffer arithmetic used when summing node outputs.

/*
Summing and Gain
================

Audio graphs are built from two operations on buffers:

  summing      Several connections into one input are added sample-by-sample.
               Three oscillators wired into one gain node arrive as
               a[i] + b[i] + c[i].

  gain         Multiplying by a control signal. An envelope is a gain signal
               that changes over time:

                 Oscillator: [ 0.8, -0.6,  0.9, -0.7, ...]
                 Envelope:   [ 0.2,  0.5,  0.8,  1.0, ...]
                 Output:     [0.16, -0.3, 0.72, -0.7, ...]

Both are stateless, so they are free functions over slices.
*/

/// Add `source` into `dest` sample-by-sample.
#[inline]
pub fn mix_into(dest: &mut [f32], source: &[f32]) {
    debug_assert_eq!(dest.len(), source.len());

    for (d, &s) in dest.iter_mut().zip(source.iter()) {
        *d += s;
    }
}

/// Multiply a signal by a constant gain factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a per-sample gain curve (in-place).
#[inline]
pub fn multiply_in_place(signal: &mut [f32], modulator: &[f32]) {
    debug_assert_eq!(signal.len(), modulator.len());

    for (s, &m) in signal.iter_mut().zip(modulator.iter()) {
        *s *= m;
    }
}
