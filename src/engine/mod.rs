//! The public face of the synthesizer.
//!
//! An [`Engine`] is constructed explicitly and passed around; there is no
//! global instance. The output device is opened lazily by
//! [`Engine::initialize`] (or the first [`Engine::play_note`]), exactly once
//! even when several tasks race to do it.
//!
//! ```ignore
//! let engine = Engine::new();
//! engine.initialize().await?;
//! engine.play_note(440.0, 1.0, 0.7, "piano", true).await?;
//! engine.play_drum("kick", DEFAULT_DRUM_VELOCITY)?;
//! engine.set_master_volume(0.5);
//! engine.stop_all_instruments();
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod cpal_backend;

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::OnceCell;

use self::backend::AudioBackend;
use self::config::EngineConfig;
use self::context::AudioContext;
use self::cpal_backend::CpalBackend;
use crate::error::EngineError;
use crate::synth::renderer::RenderShared;
use crate::synth::voice::{TrackedVoice, Voice};
use crate::voices::{self, DrumHit, DrumKind, Instrument, Note, BASS_DRUM_DURATION_RANGE};

/// Velocity used by callers that do not pick one for a drum hit.
pub const DEFAULT_DRUM_VELOCITY: f32 = 0.7;

pub struct Engine {
    /// Decay of the bass drum, seconds. Clamped to 0.3..=2.0 when played.
    pub bass_drum_duration: f32,
    config: EngineConfig,
    backend: Arc<dyn AudioBackend>,
    shared: Arc<RenderShared>,
    context: OnceCell<AudioContext>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine on the default output device with default settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_backend(config, Arc::new(CpalBackend))
    }

    pub fn with_backend(config: EngineConfig, backend: Arc<dyn AudioBackend>) -> Self {
        let shared = Arc::new(RenderShared::new(clamp_volume(config.master_volume)));
        Self {
            bass_drum_duration: 0.8,
            config,
            backend,
            shared,
            context: OnceCell::new(),
        }
    }

    /// Open the output device. Safe to call any number of times from any
    /// number of tasks: only the first successful call does anything. A
    /// failure leaves the engine uninitialized so a later call can retry.
    pub async fn initialize(&self) -> Result<(), EngineError> {
        self.context().await.map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.context.initialized()
    }

    async fn context(&self) -> Result<&AudioContext, EngineError> {
        self.context
            .get_or_try_init(|| async {
                let backend = Arc::clone(&self.backend);
                let config = self.config.clone();
                let shared = Arc::clone(&self.shared);
                tokio::task::spawn_blocking(move || {
                    AudioContext::open(backend.as_ref(), &config, shared)
                })
                .await
                .map_err(|e| EngineError::Device(e.to_string()))?
            })
            .await
    }

    /// Play one note now.
    ///
    /// Initializes the engine first if needed, and that is the only error
    /// returned. Unknown instrument names play the generic tone; a note that
    /// cannot be built is logged and skipped.
    pub async fn play_note(
        &self,
        frequency: f32,
        duration: f64,
        velocity: f32,
        instrument: &str,
        sustain: bool,
    ) -> Result<(), EngineError> {
        let context = self.context().await?;
        let instrument = Instrument::from_name(instrument);
        if let Err(err) = self.schedule_note(context, instrument, frequency, duration, velocity, sustain) {
            warn!("{instrument} note at {frequency} Hz skipped: {err}");
        }
        Ok(())
    }

    fn schedule_note(
        &self,
        context: &AudioContext,
        instrument: Instrument,
        frequency: f32,
        duration: f64,
        velocity: f32,
        sustain: bool,
    ) -> Result<(), EngineError> {
        let now = self.current_time();
        let note = Note::new(frequency, duration, velocity, now, sustain)?;
        let graph = voices::build_instrument(instrument, &note, context.builder())?;
        context.submit(Voice::new(instrument.into(), Some(frequency), graph), now)
    }

    /// Trigger a drum now.
    ///
    /// Fails only with [`EngineError::NotInitialized`]. Unknown drum names are
    /// logged and ignored.
    pub fn play_drum(&self, kind: &str, velocity: f32) -> Result<(), EngineError> {
        let context = self.context.get().ok_or(EngineError::NotInitialized)?;
        let Some(drum) = DrumKind::from_name(kind) else {
            warn!("unknown drum {kind:?} ignored");
            return Ok(());
        };
        if let Err(err) = self.schedule_drum(context, drum, velocity) {
            warn!("{drum} hit skipped: {err}");
        }
        Ok(())
    }

    fn schedule_drum(&self, context: &AudioContext, drum: DrumKind, velocity: f32) -> Result<(), EngineError> {
        let now = self.current_time();
        let (min, max) = BASS_DRUM_DURATION_RANGE;
        let bass = if self.bass_drum_duration.is_nan() {
            min
        } else {
            (self.bass_drum_duration as f64).clamp(min, max)
        };
        let hit = DrumHit::new(velocity, now).with_bass_drum_duration(bass);
        let graph = voices::build_drum(drum, &hit, context.builder())?;
        context.submit(Voice::new(drum.into(), None, graph), now)
    }

    /// Clamped to 0..=1 and heard from the next render quantum.
    pub fn set_master_volume(&self, volume: f32) {
        self.shared.set_master_volume(clamp_volume(volume));
    }

    pub fn master_volume(&self) -> f32 {
        self.shared.master_volume()
    }

    /// Stop everything that is playing or scheduled. Never fails; calling it
    /// again with nothing left to stop is a no-op.
    pub fn stop_all_instruments(&self) {
        if let Some(context) = self.context.get() {
            let stopped = context.stop_all();
            debug!("stopped {stopped} generators");
        }
    }

    /// Seconds of audio rendered since the device started.
    pub fn current_time(&self) -> f64 {
        match self.context.get() {
            Some(context) => self.shared.frames() as f64 / context.sample_rate() as f64,
            None => 0.0,
        }
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.context.get().map(AudioContext::sample_rate)
    }

    /// Voices played and not yet finished.
    pub fn active_voice_count(&self) -> usize {
        self.active_voices().len()
    }

    /// Snapshot of the voices played and not yet finished.
    pub fn active_voices(&self) -> Vec<TrackedVoice> {
        match self.context.get() {
            Some(context) => context.live_voices(self.current_time()),
            None => Vec::new(),
        }
    }

    /// Voices the audio thread turned away because it was at capacity.
    pub fn rejected_voice_count(&self) -> u64 {
        self.shared.rejected_voices()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
