use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::error::EngineError;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Generator Lifecycle
===================

Oscillators and buffer sources are scheduled, not triggered: each one gets a
start time and a stop time on the engine clock before it is handed to the
audio thread. The renderer then gates every sample against that window.

          start                         stop
  ──────────┼────────────────────────────┼──────────→ t
  Scheduled │          Playing           │ Stopped
            │                            │
                    ↑ stop() from the control thread
                    │
                    StopRequested ──(short fade)──→ Stopped

The state lives in an atomic shared between the node (audio thread) and its
GeneratorHandle (control thread), so the tracker can force a voice silent
without locking the audio thread. A forced stop fades out over a few
milliseconds instead of cutting the waveform mid-cycle, which would click.
*/

/// Where a generator is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlaybackState {
    Scheduled = 0,
    Playing = 1,
    StopRequested = 2,
    Stopped = 3,
}

impl PlaybackState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PlaybackState::Scheduled,
            1 => PlaybackState::Playing,
            2 => PlaybackState::StopRequested,
            _ => PlaybackState::Stopped,
        }
    }
}

/// Control-thread view of one generator.
#[derive(Debug, Clone)]
pub struct GeneratorHandle {
    state: Arc<AtomicU8>,
}

impl GeneratorHandle {
    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == PlaybackState::Stopped
    }

    /// Ask the generator to stop as soon as possible.
    ///
    /// Fails with [`EngineError::InvalidState`] when it has already stopped,
    /// either naturally or from an earlier call.
    pub fn stop(&self) -> Result<(), EngineError> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            match PlaybackState::from_u8(current) {
                PlaybackState::Stopped => return Err(EngineError::InvalidState),
                PlaybackState::StopRequested => return Ok(()),
                PlaybackState::Scheduled | PlaybackState::Playing => {}
            }
            match self.state.compare_exchange_weak(
                current,
                PlaybackState::StopRequested as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Mark the generator stopped without it ever rendering.
    pub(crate) fn abandon(&self) {
        self.state
            .store(PlaybackState::Stopped as u8, Ordering::Release);
    }
}

/// Audio-thread side of the lifecycle: start/stop window plus forced-stop fade.
#[derive(Debug)]
pub struct Playback {
    start: Option<f64>,
    stop: Option<f64>,
    state: Arc<AtomicU8>,
    fade_len: u32,
    fade_remaining: Option<u32>,
    reached_stop: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            start: None,
            stop: None,
            state: Arc::new(AtomicU8::new(PlaybackState::Scheduled as u8)),
            fade_len: 1,
            fade_remaining: None,
            reached_stop: false,
        }
    }

    pub fn start_at(&mut self, time: f64) {
        self.start = Some(time);
    }

    pub fn stop_at(&mut self, time: f64) {
        self.stop = Some(time);
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop
    }

    /// Length of the fade applied when a stop is forced early.
    pub fn set_fade_samples(&mut self, samples: u32) {
        self.fade_len = samples.max(1);
    }

    pub fn handle(&self) -> GeneratorHandle {
        GeneratorHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn mark_stopped(&self) {
        self.state
            .store(PlaybackState::Stopped as u8, Ordering::Release);
    }

    /// Samples of this block the generator should produce, or `None` when it
    /// is silent for the whole block.
    pub fn active_range(&mut self, ctx: &RenderCtx, len: usize) -> Option<Range<usize>> {
        let state = self.state();
        if state == PlaybackState::Stopped {
            return None;
        }
        let (Some(start), Some(stop)) = (self.start, self.stop) else {
            return None;
        };

        let sr = ctx.sample_rate as f64;
        // First sample at or after `at`, tolerant of rounding in the clock.
        let first_index =
            |at: f64| ((at - ctx.time) * sr - 1e-6).ceil().clamp(0.0, len as f64) as usize;
        let begin = first_index(start);
        let end = first_index(stop);

        if state == PlaybackState::StopRequested {
            if begin > 0 && self.fade_remaining.is_none() {
                // Never made a sound; nothing to fade.
                self.mark_stopped();
                return None;
            }
            if self.fade_remaining.is_none() {
                self.fade_remaining = Some(self.fade_len);
            }
        }

        if end < len {
            self.reached_stop = true;
        }
        if begin >= end {
            if self.reached_stop {
                self.mark_stopped();
            }
            return None;
        }

        if state == PlaybackState::Scheduled {
            let _ = self.state.compare_exchange(
                PlaybackState::Scheduled as u8,
                PlaybackState::Playing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
        Some(begin..end)
    }

    /// Treat the current block as the last one, e.g. when a one-shot buffer ran out.
    pub fn end_now(&mut self) {
        self.reached_stop = true;
    }

    /// Apply any pending fade to what the generator rendered and settle the
    /// state for the next block.
    pub fn finish_block(&mut self, out: &mut [f32], range: Range<usize>) {
        if let Some(remaining) = self.fade_remaining.as_mut() {
            let step = 1.0 / self.fade_len as f32;
            for sample in &mut out[range] {
                *sample *= *remaining as f32 * step;
                *remaining = remaining.saturating_sub(1);
            }
            if *remaining == 0 {
                self.mark_stopped();
                return;
            }
        }
        if self.reached_stop {
            self.mark_stopped();
        }
    }
}

/// A graph node with a start/stop window.
pub trait Generator: GraphNode {
    fn playback(&self) -> &Playback;
    fn playback_mut(&mut self) -> &mut Playback;

    fn start(&mut self, time: f64) {
        self.playback_mut().start_at(time);
    }

    fn stop(&mut self, time: f64) {
        self.playback_mut().stop_at(time);
    }
}
