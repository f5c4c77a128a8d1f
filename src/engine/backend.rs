use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::EngineError;
use crate::synth::renderer::Renderer;

/// What the device actually gave us.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamConfig {
    pub sample_rate: f32,
    pub channels: usize,
}

/// Builds the renderer once the device's format is known. Called exactly once
/// per successful start.
pub type RendererFactory = Box<dyn FnOnce(StreamConfig) -> Renderer + Send>;

/// A running output. Dropping it stops the audio.
pub trait OutputStream: Send + Sync {
    fn config(&self) -> StreamConfig;
}

/// Where rendered audio goes.
pub trait AudioBackend: Send + Sync {
    fn start(&self, build: RendererFactory) -> Result<Box<dyn OutputStream>, EngineError>;
}

/// Backend with no hardware: keeps the renderer so the caller can pull audio
/// from it on demand. Used by tests, benches and offline bouncing.
pub struct OfflineBackend {
    config: StreamConfig,
    renderer: Mutex<Option<Renderer>>,
    starts: AtomicUsize,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32, channels: usize) -> Self {
        Self {
            config: StreamConfig {
                sample_rate,
                channels,
            },
            renderer: Mutex::new(None),
            starts: AtomicUsize::new(0),
        }
    }

    /// How many times an engine has started this backend.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::Acquire)
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    /// Render into an interleaved buffer using the backend's channel count.
    pub fn render_interleaved(&self, data: &mut [f32]) -> Result<(), EngineError> {
        let mut guard = self.renderer.lock().unwrap_or_else(PoisonError::into_inner);
        let renderer = guard.as_mut().ok_or(EngineError::NotInitialized)?;
        renderer.render_interleaved(data, self.config.channels);
        Ok(())
    }

    /// Render `seconds` of audio and return it interleaved.
    pub fn render_seconds(&self, seconds: f64) -> Result<Vec<f32>, EngineError> {
        let frames = (seconds * self.config.sample_rate as f64).ceil() as usize;
        let mut data = vec![0.0; frames * self.config.channels];
        self.render_interleaved(&mut data)?;
        Ok(data)
    }
}

impl Default for OfflineBackend {
    fn default() -> Self {
        Self::new(48_000.0, 2)
    }
}

struct OfflineStream {
    config: StreamConfig,
}

impl OutputStream for OfflineStream {
    fn config(&self) -> StreamConfig {
        self.config
    }
}

impl AudioBackend for OfflineBackend {
    fn start(&self, build: RendererFactory) -> Result<Box<dyn OutputStream>, EngineError> {
        self.starts.fetch_add(1, Ordering::AcqRel);
        let renderer = build(self.config);
        *self.renderer.lock().unwrap_or_else(PoisonError::into_inner) = Some(renderer);
        Ok(Box::new(OfflineStream {
            config: self.config,
        }))
    }
}
