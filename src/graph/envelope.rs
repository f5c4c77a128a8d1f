use crate::error::ParamError;
use crate::graph::param::AudioParam;
use crate::MIN_GAIN;

/*
ADSR Envelope Scheduling
========================

Envelopes here are not running state machines. A note's whole gain curve is
known the moment it is played (start time, duration, velocity), so it is
written into an AudioParam as breakpoints up front:

  peak ─ ─ ─ ─ ╱╲
              ╱  ╲___________________  sustain
             ╱                       ╲
  floor ────╱                         ╲────
           start  +a   +a+d     end-r  end
           │ set  │lin │ exp    │ set  │ exp
                                 (hold)

  1. set the floor at start
  2. linear ramp to peak at start + attack
  3. exponential ramp to sustain at start + attack + decay
  4. re-assert sustain at end - release (the release ramp starts from here)
  5. exponential ramp back to the floor at end

Short notes:
  - attack and decay breakpoints are clipped to the note end, so a note
    shorter than its attack still rises and then releases in order
  - the hold breakpoint (4) is skipped when the note is shorter than
    attack + decay + release; it would land before the decay breakpoint

Gains never reach zero: exponential ramps cannot target zero, so every level
is floored at MIN_GAIN (-60 dB, inaudible under the master gain).
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: f64,
    pub decay: f64,
    /// Sustain level as a fraction of the peak.
    pub sustain: f32,
    pub release: f64,
}

impl Adsr {
    pub const fn new(attack: f64, decay: f64, sustain: f32, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Swap in a lower sustain and shorter release when the sustain pedal is up.
    pub fn pedal(self, sustain_enabled: bool, damped_sustain: f32, damped_release: f64) -> Self {
        if sustain_enabled {
            self
        } else {
            Self {
                sustain: damped_sustain,
                release: damped_release,
                ..self
            }
        }
    }

    /// Release stretched with the note length, bounded to `[min, max]`.
    pub fn proportional_release(self, duration: f64, fraction: f64, min: f64, max: f64) -> Self {
        Self {
            release: (duration * fraction).clamp(min, max),
            ..self
        }
    }

    /// Write the curve for a note at `start` lasting `duration` seconds.
    pub fn schedule(
        &self,
        param: &mut AudioParam,
        peak: f32,
        start: f64,
        duration: f64,
    ) -> Result<(), ParamError> {
        let peak = floor_gain(peak);
        let sustain = floor_gain(peak * self.sustain);
        let attack = self.attack.max(0.0);
        let decay = self.decay.max(0.0);
        let release = self.release.max(0.0);
        let duration = duration.max(0.0);
        let end = start + duration;

        param.set_value_at_time(MIN_GAIN, start)?;
        param.linear_ramp_to_value_at_time(peak, (start + attack).min(end))?;
        param.exponential_ramp_to_value_at_time(sustain, (start + attack + decay).min(end))?;
        if duration >= attack + decay + release {
            param.set_value_at_time(sustain, end - release)?;
        }
        param.exponential_ramp_to_value_at_time(MIN_GAIN, end)?;
        Ok(())
    }
}

/// Strike-and-decay curve for plucks, hammers and drums.
///
/// Peaks after `attack` and reaches the floor `decay` seconds after `start`.
pub fn percussive(
    param: &mut AudioParam,
    peak: f32,
    start: f64,
    attack: f64,
    decay: f64,
) -> Result<(), ParamError> {
    let attack = attack.max(0.0);
    param.set_value_at_time(MIN_GAIN, start)?;
    param.linear_ramp_to_value_at_time(floor_gain(peak), start + attack)?;
    param.exponential_ramp_to_value_at_time(MIN_GAIN, start + attack.max(decay))?;
    Ok(())
}

/// Exponential glide from `from` to `to` (frequency drops, cutoff sweeps).
pub fn sweep(
    param: &mut AudioParam,
    from: f32,
    to: f32,
    start: f64,
    time: f64,
) -> Result<(), ParamError> {
    param.set_value_at_time(from, start)?;
    param.exponential_ramp_to_value_at_time(to, start + time.max(0.0))?;
    Ok(())
}

#[inline]
pub fn floor_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        MIN_GAIN
    } else {
        gain.max(MIN_GAIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::param::AutomationKind;

    fn times(param: &AudioParam) -> Vec<f64> {
        param.events().iter().map(|e| e.time).collect()
    }

    #[test]
    fn full_length_note_has_five_breakpoints() {
        let mut gain = AudioParam::new(MIN_GAIN);
        Adsr::new(0.01, 0.2, 0.5, 0.3)
            .schedule(&mut gain, 0.8, 1.0, 1.0)
            .unwrap();

        let kinds: Vec<_> = gain.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                AutomationKind::SetValue,
                AutomationKind::LinearRamp,
                AutomationKind::ExponentialRamp,
                AutomationKind::SetValue,
                AutomationKind::ExponentialRamp,
            ]
        );
        let expected = [1.0, 1.01, 1.21, 1.7, 2.0];
        for (t, e) in times(&gain).iter().zip(expected) {
            assert!((t - e).abs() < 1e-9, "{t} vs {e}");
        }
        assert!((gain.value_at(1.01) - 0.8).abs() < 1e-6);
        assert!((gain.value_at(1.5) - 0.4).abs() < 1e-6);
        assert!((gain.value_at(2.0) - MIN_GAIN).abs() < 1e-9);
    }

    #[test]
    fn short_note_skips_hold_and_stays_ordered() {
        let mut gain = AudioParam::new(MIN_GAIN);
        let env = Adsr::new(0.08, 0.2, 0.7, 0.5);
        env.schedule(&mut gain, 1.0, 0.0, 0.1).unwrap();

        let t = times(&gain);
        assert_eq!(t.len(), 4);
        assert!(t.windows(2).all(|w| w[0] <= w[1]), "{t:?}");
        assert!(t.iter().all(|&x| x <= 0.1 + 1e-12));
    }

    #[test]
    fn zero_velocity_stays_above_floor() {
        let mut gain = AudioParam::new(MIN_GAIN);
        Adsr::new(0.01, 0.1, 0.5, 0.1)
            .schedule(&mut gain, 0.0, 0.0, 0.5)
            .unwrap();
        assert!(gain.events().iter().all(|e| e.value >= MIN_GAIN));
    }

    #[test]
    fn pedal_up_uses_damped_shape() {
        let env = Adsr::new(0.01, 0.1, 0.6, 1.0).pedal(false, 0.2, 0.3);
        assert_eq!(env.sustain, 0.2);
        assert_eq!(env.release, 0.3);
        let env = Adsr::new(0.01, 0.1, 0.6, 1.0).pedal(true, 0.2, 0.3);
        assert_eq!(env.sustain, 0.6);
    }

    #[test]
    fn percussive_decays_to_floor() {
        let mut gain = AudioParam::new(MIN_GAIN);
        percussive(&mut gain, 0.9, 0.5, 0.002, 0.3).unwrap();
        assert!((gain.value_at(0.502) - 0.9).abs() < 1e-6);
        assert!(gain.value_at(0.6) < 0.9);
        assert!((gain.value_at(0.8) - MIN_GAIN).abs() < 1e-9);
    }

    #[test]
    fn sweep_rejects_zero_target() {
        let mut freq = AudioParam::new(80.0);
        assert!(sweep(&mut freq, 80.0, 0.0, 0.0, 0.5).is_err());
        assert!(sweep(&mut freq, 80.0, 0.01, 0.0, 0.5).is_ok());
    }
}
