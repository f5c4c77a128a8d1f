use log::{trace, warn};
use rtrb::Consumer;

use crate::error::EngineError;
use crate::synth::voice::{TrackedVoice, Voice};

/// Control-thread bookkeeping of every voice handed to the audio thread.
///
/// Entries are only records: stopping goes through the generators' shared
/// handles, and the graphs themselves live on the audio thread until they
/// come back through the graveyard ring.
#[derive(Debug, Default)]
pub struct VoiceTracker {
    voices: Vec<TrackedVoice>,
}

impl VoiceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, voice: TrackedVoice) {
        self.voices.push(voice);
    }

    /// Forget voices that are past their stop time or already silent.
    /// Returns how many entries were removed.
    pub fn sweep(&mut self, now: f64) -> usize {
        let before = self.voices.len();
        self.voices.retain(|v| v.stop > now && !v.is_finished());
        before - self.voices.len()
    }

    /// Drop finished voices returned by the audio thread.
    pub fn reclaim(&mut self, graveyard: &mut Consumer<Box<Voice>>) -> usize {
        let mut count = 0;
        while let Ok(voice) = graveyard.pop() {
            drop(voice);
            count += 1;
        }
        count
    }

    /// Stop every generator of every tracked voice and clear the tracker.
    ///
    /// Generators that already stopped refuse with
    /// [`EngineError::InvalidState`]; that is expected and ignored. Returns
    /// the number of generators actually asked to stop.
    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for voice in self.voices.drain(..) {
            for handle in &voice.handles {
                match handle.stop() {
                    Ok(()) => stopped += 1,
                    Err(EngineError::InvalidState) => {
                        trace!("{} generator already stopped", voice.label);
                    }
                    Err(err) => warn!("failed to stop {} generator: {err}", voice.label),
                }
            }
        }
        stopped
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Number of live entries played as `label`.
    pub fn count_for(&self, label: &str) -> usize {
        self.voices.iter().filter(|v| v.label == label).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedVoice> {
        self.voices.iter()
    }
}

#[cfg(test)]
mod tests {
    use rtrb::RingBuffer;

    use super::*;
    use crate::graph::builder::VoiceBuilder;
    use crate::graph::generator::PlaybackState;
    use crate::graph::node::{RenderCtx, Sink};
    use crate::graph::oscillator::OscNode;

    fn voice(label: &'static str, start: f64, stop: f64) -> Voice {
        let mut b = VoiceBuilder::new(48_000.0);
        let osc = b.add(OscNode::sine(220.0));
        b.connect_to(osc, Sink::Master).unwrap();
        b.schedule(osc, start, stop).unwrap();
        Voice::new(label, Some(220.0), b.build().unwrap())
    }

    #[test]
    fn stop_all_twice_is_harmless() {
        let mut tracker = VoiceTracker::new();
        let a = voice("piano", 0.0, 1.0);
        let b = voice("organ", 0.5, 2.0);
        let handles: Vec<_> = a.tracking().handles.into_iter().chain(b.tracking().handles).collect();
        tracker.track(a.tracking());
        tracker.track(b.tracking());

        assert_eq!(tracker.stop_all(), 2);
        assert!(tracker.is_empty());
        assert!(handles.iter().all(|h| h.state() == PlaybackState::StopRequested));

        assert_eq!(tracker.stop_all(), 0);
    }

    #[test]
    fn stopped_generators_are_skipped_quietly() {
        let mut tracker = VoiceTracker::new();
        let mut v = voice("kick", 0.0, 0.001);
        tracker.track(v.tracking());

        let (mut dry, mut wet) = (vec![0.0; 128], vec![0.0; 128]);
        v.render(&RenderCtx::new(48_000.0, 0), &mut dry, &mut wet);
        assert!(v.is_finished());

        assert_eq!(tracker.stop_all(), 0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn sweep_drops_expired_voices() {
        let mut tracker = VoiceTracker::new();
        tracker.track(voice("piano", 0.0, 1.0).tracking());
        tracker.track(voice("piano", 0.0, 3.0).tracking());
        tracker.track(voice("snare", 0.0, 0.2).tracking());

        assert_eq!(tracker.sweep(0.5), 1);
        assert_eq!(tracker.count_for("piano"), 2);
        assert_eq!(tracker.count_for("snare"), 0);
        assert_eq!(tracker.sweep(2.0), 1);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn reclaim_empties_the_graveyard() {
        let (mut tx, mut rx) = RingBuffer::<Box<Voice>>::new(4);
        for _ in 0..3 {
            tx.push(Box::new(voice("tom", 0.0, 0.1))).ok();
        }
        let mut tracker = VoiceTracker::new();
        assert_eq!(tracker.reclaim(&mut rx), 3);
        assert_eq!(tracker.reclaim(&mut rx), 0);
    }
}
