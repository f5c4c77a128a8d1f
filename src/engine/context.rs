use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rtrb::{Consumer, Producer};

use crate::engine::backend::{AudioBackend, OutputStream, RendererFactory, StreamConfig};
use crate::engine::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::builder::VoiceBuilder;
use crate::graph::reverb::ReverbBus;
use crate::synth::message::{Command, CommandSender};
use crate::synth::renderer::{RenderShared, Renderer};
use crate::synth::tracker::VoiceTracker;
use crate::synth::voice::{TrackedVoice, Voice};
use crate::RENDER_QUANTUM;

/// Everything that exists only once the output is running: the stream, the
/// control ends of the rings, and the voice tracker.
pub struct AudioContext {
    config: StreamConfig,
    stop_fade_secs: f32,
    control: Mutex<Control>,
    _stream: Box<dyn OutputStream>,
}

struct Control {
    commands: Producer<Command>,
    graveyard: Consumer<Box<Voice>>,
    tracker: VoiceTracker,
}

impl AudioContext {
    /// Start `backend` and wire a renderer to it. Blocks until the device is
    /// running.
    pub fn open(
        backend: &dyn AudioBackend,
        config: &EngineConfig,
        shared: Arc<RenderShared>,
    ) -> Result<Self, EngineError> {
        let (handle_tx, handle_rx) = crossbeam_channel::bounded(1);
        let voice_capacity = config.voice_capacity;
        let command_capacity = config.command_capacity;
        let reverb_seconds = config.reverb_seconds;

        let factory: RendererFactory = Box::new(move |stream: StreamConfig| {
            let mut rng = StdRng::from_entropy();
            let reverb = ReverbBus::synthetic(reverb_seconds, stream.sample_rate, RENDER_QUANTUM, &mut rng);
            let (renderer, handle) =
                Renderer::new(stream.sample_rate, voice_capacity, command_capacity, reverb, shared);
            let _ = handle_tx.send(handle);
            renderer
        });

        let stream = backend.start(factory)?;
        let handle = handle_rx.try_recv().map_err(|_| EngineError::BackendGone)?;
        let stream_config = stream.config();
        debug!(
            "audio context running at {} Hz, {} channels",
            stream_config.sample_rate, stream_config.channels
        );

        Ok(Self {
            config: stream_config,
            stop_fade_secs: config.stop_fade_secs,
            control: Mutex::new(Control {
                commands: handle.commands,
                graveyard: handle.graveyard,
                tracker: VoiceTracker::new(),
            }),
            _stream: stream,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.config.channels
    }

    /// A builder for one voice at this context's sample rate.
    pub fn builder(&self) -> VoiceBuilder {
        VoiceBuilder::new(self.config.sample_rate).with_stop_fade(self.stop_fade_secs)
    }

    /// Hand a built voice to the audio thread and start tracking it.
    pub fn submit(&self, voice: Voice, now: f64) -> Result<(), EngineError> {
        let mut control = self.control();
        let Control {
            commands,
            graveyard,
            tracker,
        } = &mut *control;
        tracker.reclaim(graveyard);
        tracker.sweep(now);

        let tracked = voice.tracking();
        commands.send(Command::Start(Box::new(voice)))?;
        tracker.track(tracked);
        Ok(())
    }

    /// Stop every tracked voice. Returns the number of generators stopped.
    pub fn stop_all(&self) -> usize {
        self.control().tracker.stop_all()
    }

    /// Tracked voices still sounding at `now`.
    pub fn live_voices(&self, now: f64) -> Vec<TrackedVoice> {
        let mut control = self.control();
        let Control {
            graveyard, tracker, ..
        } = &mut *control;
        tracker.reclaim(graveyard);
        tracker.sweep(now);
        tracker.iter().cloned().collect()
    }

    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
