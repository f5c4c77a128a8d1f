use crate::error::ParamError;
use crate::graph::node::RenderCtx;

/*
Parameter Automation
====================

A parameter (gain, oscillator frequency, filter cutoff) is a value that
changes over time along a list of breakpoints scheduled on the engine clock.

Breakpoint kinds
----------------

  SetValue(v, t)            jump to v at time t, hold afterwards
  LinearRamp(v, t)          straight line from the previous breakpoint to v at t
  ExponentialRamp(v, t)     constant-ratio curve from the previous breakpoint
                            to v at t:  v0 · (v1 / v0)^((t - t0) / (t1 - t0))

Ramps always start from the previous breakpoint's (time, value). That is why
envelopes first *set* a value at the note start, and re-assert the sustain
value before the release ramp: otherwise the release would start sliding
down from the end of the decay.

Before the first breakpoint the parameter holds its default value. After the
last breakpoint it holds that breakpoint's value.

Ordering
--------

Breakpoints must be appended in non-decreasing time order. An out-of-order
append is rejected instead of being sorted in, because a ramp inserted
before an existing breakpoint silently changes the shape of every later
segment.

Exponential ramps need a strictly positive target: v0 · (0 / v0)^x is zero
only at the very end and the ratio math breaks down, so gains fade to a small
floor instead of to zero.

Rendering
---------

`fill` walks the breakpoint list with a cursor that only moves forward, so
evaluating a block costs O(block + breakpoints passed) and never allocates.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationKind {
    SetValue,
    LinearRamp,
    ExponentialRamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutomationEvent {
    pub kind: AutomationKind,
    pub time: f64,
    pub value: f32,
}

#[derive(Debug, Clone)]
pub struct AudioParam {
    default_value: f32,
    events: Vec<AutomationEvent>,
    /// Index of the first event later than the last rendered sample.
    cursor: usize,
}

impl AudioParam {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::new(),
            cursor: 0,
        }
    }

    /// Value held before any breakpoint.
    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    /// Replace the value held before the first breakpoint.
    pub fn set_value(&mut self, value: f32) -> Result<(), ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NonFinite);
        }
        self.default_value = value;
        Ok(())
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> Result<(), ParamError> {
        self.push(AutomationKind::SetValue, value, time)
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> Result<(), ParamError> {
        self.push(AutomationKind::LinearRamp, value, time)
    }

    pub fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> Result<(), ParamError> {
        if value.is_finite() && value <= 0.0 {
            return Err(ParamError::NonPositiveTarget(value));
        }
        self.push(AutomationKind::ExponentialRamp, value, time)
    }

    fn push(&mut self, kind: AutomationKind, value: f32, time: f64) -> Result<(), ParamError> {
        if !value.is_finite() || !time.is_finite() || time < 0.0 {
            return Err(ParamError::NonFinite);
        }
        if let Some(last) = self.events.last() {
            if time < last.time {
                return Err(ParamError::OutOfOrder {
                    time,
                    last: last.time,
                });
            }
        }
        self.events.push(AutomationEvent { kind, time, value });
        Ok(())
    }

    /// Value at absolute time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        let next = self.events.partition_point(|e| e.time <= t);
        self.value_between(next, t)
    }

    /// Evaluate with `next` = index of the first event strictly after `t`.
    #[inline]
    fn value_between(&self, next: usize, t: f64) -> f32 {
        let (t0, v0) = match next.checked_sub(1).map(|i| &self.events[i]) {
            Some(prev) => (prev.time, prev.value),
            None => (0.0, self.default_value),
        };

        let Some(target) = self.events.get(next) else {
            return v0;
        };
        let span = target.time - t0;
        if span <= 0.0 {
            return v0;
        }
        let progress = ((t - t0) / span) as f32;

        match target.kind {
            AutomationKind::SetValue => v0,
            AutomationKind::LinearRamp => v0 + (target.value - v0) * progress,
            AutomationKind::ExponentialRamp => {
                if v0 == 0.0 || (v0 > 0.0) != (target.value > 0.0) {
                    v0
                } else {
                    v0 * (target.value / v0).powf(progress)
                }
            }
        }
    }

    /// Render the parameter's value for every sample in the block.
    pub fn fill(&mut self, ctx: &RenderCtx, out: &mut [f32]) {
        if self.events.is_empty() {
            out.fill(self.default_value);
            return;
        }

        // Past the last breakpoint the value is constant.
        if self.cursor >= self.events.len() {
            let last = self.events[self.events.len() - 1].value;
            out.fill(last);
            return;
        }

        for (i, slot) in out.iter_mut().enumerate() {
            let t = ctx.time_at(i);
            while self.cursor < self.events.len() && self.events[self.cursor].time <= t {
                self.cursor += 1;
            }
            *slot = self.value_between(self.cursor, t);
        }
    }

    /// Whether `fill` would produce the same value for every sample from now on.
    pub fn is_settled(&self) -> bool {
        self.cursor >= self.events.len()
    }
}
