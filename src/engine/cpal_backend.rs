use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};
use crossbeam_channel::{bounded, Sender};
use log::{debug, error};

use crate::engine::backend::{AudioBackend, OutputStream, RendererFactory, StreamConfig};
use crate::error::EngineError;
use crate::synth::renderer::Renderer;

/*
cpal streams are not Send, so the stream lives on a thread of its own:

  control thread                  audio-owner thread
  ──────────────                  ──────────────────
  start() ── spawn ─────────────→ open device, build renderer, play
          ←── ready(config) ────
  ...                             park on shutdown channel
  drop(CpalStream) ── close ────→ drop stream, exit
*/

/// Default output device through cpal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalBackend;

struct CpalStream {
    config: StreamConfig,
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl OutputStream for CpalStream {
    fn config(&self) -> StreamConfig {
        self.config
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        drop(self.shutdown.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl AudioBackend for CpalBackend {
    fn start(&self, build: RendererFactory) -> Result<Box<dyn OutputStream>, EngineError> {
        let (ready_tx, ready_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let thread = thread::Builder::new()
            .name("studio-audio".into())
            .spawn(move || match open_stream(build) {
                Ok((stream, config)) => {
                    let _ = ready_tx.send(Ok(config));
                    // Returns once the sender is dropped.
                    let _ = shutdown_rx.recv();
                    drop(stream);
                }
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                }
            })
            .map_err(|e| EngineError::Device(e.to_string()))?;

        let config = match ready_rx.recv() {
            Ok(result) => result?,
            Err(_) => return Err(EngineError::BackendGone),
        };

        Ok(Box::new(CpalStream {
            config,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }))
    }
}

fn open_stream(build: RendererFactory) -> Result<(cpal::Stream, StreamConfig), EngineError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;
    let supported = device
        .default_output_config()
        .map_err(|e| EngineError::Device(e.to_string()))?;

    let format = supported.sample_format();
    if !matches!(format, SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16) {
        return Err(EngineError::UnsupportedFormat(format!("{format:?}")));
    }

    let config = StreamConfig {
        sample_rate: supported.sample_rate().0 as f32,
        channels: supported.channels() as usize,
    };
    debug!(
        "opening {} at {} Hz, {} channels, {format:?}",
        device.name().unwrap_or_else(|_| "output device".into()),
        config.sample_rate,
        config.channels,
    );

    let stream_config: cpal::StreamConfig = supported.into();
    let renderer = build(config);
    let stream = match format {
        SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, renderer, config.channels),
        SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, renderer, config.channels),
        _ => build_stream::<f32>(&device, &stream_config, renderer, config.channels),
    }?;
    stream
        .play()
        .map_err(|e| EngineError::Device(e.to_string()))?;
    Ok((stream, config))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut renderer: Renderer,
    channels: usize,
) -> Result<cpal::Stream, EngineError>
where
    T: SizedSample + FromSample<f32>,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                renderer.render_mapped(data, channels, |s| T::from_sample(s));
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .map_err(|e| EngineError::Device(e.to_string()))
}
