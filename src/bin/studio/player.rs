//! PatternPlayer - steps a 16-step pattern against the engine
//!
//! Steps are fired from a tokio interval on the control side; the engine
//! schedules each note at its own clock, so timer jitter only shifts whole
//! notes and never tears the audio.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use studio_synth::Engine;

pub const STEPS_PER_BAR: usize = 16;

/// One sixteenth note
#[derive(Debug, Clone, Default)]
pub struct Step {
    pub drums: Vec<&'static str>,
    /// Melody note in Hz
    pub note: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub instrument: String,
    pub steps: Vec<Step>,
}

impl Pattern {
    /// Four-on-the-floor beat under a C minor arpeggio
    pub fn demo(instrument: impl Into<String>) -> Self {
        const ARPEGGIO: [f32; 8] = [261.63, 311.13, 392.0, 466.16, 523.25, 466.16, 392.0, 311.13];

        let steps = (0..STEPS_PER_BAR)
            .map(|i| {
                let mut drums = Vec::new();
                if i % 4 == 0 {
                    drums.push("kick");
                }
                if i == 4 || i == 12 {
                    drums.push("snare");
                }
                if i == 12 {
                    drums.push("clap");
                }
                if i % 2 == 0 && i != 14 {
                    drums.push("hihat");
                }
                if i == 14 {
                    drums.push("openhat");
                }
                if i == 0 {
                    drums.push("crash");
                }
                let note = (i % 2 == 0).then(|| ARPEGGIO[i / 2]);
                Step { drums, note }
            })
            .collect();

        Self {
            instrument: instrument.into(),
            steps,
        }
    }
}

pub struct PatternPlayer {
    engine: Arc<Engine>,
    pattern: Pattern,
    step: Duration,
}

impl PatternPlayer {
    pub fn new(engine: Arc<Engine>, pattern: Pattern, bpm: f64) -> Self {
        // 4 steps per beat
        let step = Duration::from_secs_f64(60.0 / bpm.max(1.0) / 4.0);
        Self {
            engine,
            pattern,
            step,
        }
    }

    /// Start playing `bars` bars in the background.
    pub fn spawn(self, bars: usize) -> PlayerHandle {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(self.step);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let total = bars * self.pattern.steps.len();
            let note_length = self.step.as_secs_f64() * 2.0;

            let mut played = 0;
            while played < total {
                tokio::select! {
                    _ = &mut cancel_rx => break,
                    _ = ticker.tick() => {}
                }
                let step = &self.pattern.steps[played % self.pattern.steps.len()];
                for drum in &step.drums {
                    if let Err(err) = self.engine.play_drum(drum, 0.8) {
                        warn!("{drum}: {err}");
                    }
                }
                if let Some(freq) = step.note {
                    if let Err(err) = self
                        .engine
                        .play_note(freq, note_length, 0.6, &self.pattern.instrument, true)
                        .await
                    {
                        warn!("{}: {err}", self.pattern.instrument);
                    }
                }
                played += 1;
            }
            played
        });

        PlayerHandle {
            cancel: Some(cancel_tx),
            task,
        }
    }
}

/// Owns the player task. Dropping it cancels playback.
pub struct PlayerHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<usize>,
}

impl PlayerHandle {
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Wait for the player to finish; returns the number of steps played.
    pub async fn join(mut self) -> usize {
        let played = (&mut self.task).await.unwrap_or(0);
        drop(self.cancel.take());
        played
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
