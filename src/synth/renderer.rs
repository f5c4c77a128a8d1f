use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::dsp::amplify::apply_gain;
use crate::graph::node::RenderCtx;
use crate::graph::reverb::ReverbBus;
use crate::synth::message::{Command, CommandReceiver};
use crate::synth::voice::Voice;
use crate::RENDER_QUANTUM;

/*
Render Loop
===========

The device asks for buffers of whatever size it likes; the engine renders in
fixed quanta of 128 frames and hands them out frame by frame.

  per quantum:
    1. take new voices off the command ring (reject beyond capacity)
    2. render every voice into the dry bus and the reverb send bus
    3. send finished voices back on the graveyard ring
    4. dry → left/right, reverb tail added on top
    5. master gain
    6. advance the frame clock

Nothing here allocates, locks or frees. Voices arrive fully built and leave
whole; the control thread drops them.
*/

/// State the audio thread publishes for the control thread, and the one
/// value (master volume) it reads back.
#[derive(Debug)]
pub struct RenderShared {
    frames: AtomicU64,
    master_volume: AtomicU32,
    rejected: AtomicU64,
    active: AtomicUsize,
}

impl RenderShared {
    pub fn new(master_volume: f32) -> Self {
        Self {
            frames: AtomicU64::new(0),
            master_volume: AtomicU32::new(master_volume.to_bits()),
            rejected: AtomicU64::new(0),
            active: AtomicUsize::new(0),
        }
    }

    /// Frames rendered so far; the engine clock.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn master_volume(&self) -> f32 {
        f32::from_bits(self.master_volume.load(Ordering::Relaxed))
    }

    pub fn set_master_volume(&self, volume: f32) {
        self.master_volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    /// Voices turned away because the renderer was at capacity.
    pub fn rejected_voices(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Voices the audio thread rendered in its last quantum.
    pub fn active_voices(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

/// Control-thread ends of the two rings.
pub struct RendererHandle {
    pub commands: Producer<Command>,
    pub graveyard: Consumer<Box<Voice>>,
}

pub struct Renderer {
    sample_rate: f32,
    capacity: usize,
    commands: Consumer<Command>,
    graveyard: Producer<Box<Voice>>,
    voices: Vec<Box<Voice>>,
    reverb: ReverbBus,
    shared: Arc<RenderShared>,
    dry: Vec<f32>,
    wet: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
    scratch_left: Vec<f32>,
    scratch_right: Vec<f32>,
    cursor: usize,
}

impl Renderer {
    pub fn new(
        sample_rate: f32,
        voice_capacity: usize,
        command_capacity: usize,
        reverb: ReverbBus,
        shared: Arc<RenderShared>,
    ) -> (Self, RendererHandle) {
        let (command_tx, command_rx) = RingBuffer::new(command_capacity.max(1));
        // Room for every rendering voice plus a full command queue of rejects.
        let (grave_tx, grave_rx) = RingBuffer::new(voice_capacity + command_capacity.max(1));

        let renderer = Self {
            sample_rate,
            capacity: voice_capacity,
            commands: command_rx,
            graveyard: grave_tx,
            voices: Vec::with_capacity(voice_capacity),
            reverb,
            shared,
            dry: vec![0.0; RENDER_QUANTUM],
            wet: vec![0.0; RENDER_QUANTUM],
            left: vec![0.0; RENDER_QUANTUM],
            right: vec![0.0; RENDER_QUANTUM],
            scratch_left: vec![0.0; RENDER_QUANTUM],
            scratch_right: vec![0.0; RENDER_QUANTUM],
            cursor: RENDER_QUANTUM,
        };
        let handle = RendererHandle {
            commands: command_tx,
            graveyard: grave_rx,
        };
        (renderer, handle)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fill an interleaved f32 device buffer.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        self.render_mapped(data, channels, |s| s);
    }

    /// Fill an interleaved device buffer of any sample type.
    ///
    /// Mono devices get the average of both channels; extra channels beyond
    /// two alternate left and right.
    pub fn render_mapped<T>(&mut self, data: &mut [T], channels: usize, convert: impl Fn(f32) -> T) {
        if channels == 0 {
            return;
        }
        for frame in data.chunks_mut(channels) {
            if self.cursor == RENDER_QUANTUM {
                self.render_quantum();
                self.cursor = 0;
            }
            let left = self.left[self.cursor];
            let right = self.right[self.cursor];
            self.cursor += 1;

            if let [mono] = frame {
                *mono = convert(0.5 * (left + right));
            } else {
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = convert(if ch % 2 == 0 { left } else { right });
                }
            }
        }
    }

    fn render_quantum(&mut self) {
        self.receive();

        let ctx = RenderCtx::new(self.sample_rate, self.shared.frames());
        self.dry.fill(0.0);
        self.wet.fill(0.0);
        for voice in &mut self.voices {
            voice.render(&ctx, &mut self.dry, &mut self.wet);
        }
        self.retire();

        self.left.copy_from_slice(&self.dry);
        self.right.copy_from_slice(&self.dry);
        self.reverb.process(
            &self.wet,
            &mut self.scratch_left,
            &mut self.scratch_right,
            &mut self.left,
            &mut self.right,
        );

        let gain = self.shared.master_volume();
        apply_gain(&mut self.left, gain);
        apply_gain(&mut self.right, gain);

        self.shared.active.store(self.voices.len(), Ordering::Relaxed);
        self.shared
            .frames
            .fetch_add(RENDER_QUANTUM as u64, Ordering::AcqRel);
    }

    fn receive(&mut self) {
        while let Some(command) = self.commands.next_command() {
            match command {
                Command::Start(voice) => {
                    if self.voices.len() < self.capacity {
                        self.voices.push(voice);
                    } else {
                        self.shared.rejected.fetch_add(1, Ordering::Relaxed);
                        voice.abandon();
                        // Sized so this cannot fail while the control side drains it.
                        let _ = self.graveyard.push(voice);
                    }
                }
            }
        }
    }

    fn retire(&mut self) {
        let mut i = 0;
        while i < self.voices.len() {
            if self.voices[i].is_finished() && !self.graveyard.is_full() {
                let voice = self.voices.swap_remove(i);
                let _ = self.graveyard.push(voice);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::graph::builder::VoiceBuilder;
    use crate::graph::node::Sink;
    use crate::graph::oscillator::OscNode;
    use crate::synth::message::CommandSender;

    const SR: f32 = 48_000.0;

    fn renderer(capacity: usize) -> (Renderer, RendererHandle, Arc<RenderShared>) {
        let mut rng = StdRng::seed_from_u64(9);
        let reverb = ReverbBus::synthetic(0.05, SR, RENDER_QUANTUM, &mut rng);
        let shared = Arc::new(RenderShared::new(1.0));
        let (r, h) = Renderer::new(SR, capacity, 8, reverb, shared.clone());
        (r, h, shared)
    }

    fn tone(start: f64, stop: f64) -> Box<Voice> {
        let mut b = VoiceBuilder::new(SR);
        let osc = b.add(OscNode::square(440.0));
        b.connect_to(osc, Sink::Master).unwrap();
        b.schedule(osc, start, stop).unwrap();
        Box::new(Voice::new("test", Some(440.0), b.build().unwrap()))
    }

    #[test]
    fn clock_advances_in_whole_quanta() {
        let (mut r, _h, shared) = renderer(4);
        let mut out = vec![1.0; 300 * 2];
        r.render_interleaved(&mut out, 2);
        assert_eq!(shared.frames(), 3 * RENDER_QUANTUM as u64);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn voices_play_then_return_to_the_graveyard() {
        let (mut r, mut h, shared) = renderer(4);
        h.commands.send(Command::Start(tone(0.0, 0.01))).unwrap();

        let mut out = vec![0.0; 4_800 * 2];
        r.render_interleaved(&mut out, 2);

        assert!(out.iter().any(|s| s.abs() > 0.5));
        assert_eq!(shared.active_voices(), 0);
        assert!(h.graveyard.pop().is_ok());
    }

    #[test]
    fn voices_beyond_capacity_are_rejected() {
        let (mut r, mut h, shared) = renderer(1);
        h.commands.send(Command::Start(tone(0.0, 1.0))).unwrap();
        h.commands.send(Command::Start(tone(0.0, 1.0))).unwrap();

        let mut out = vec![0.0; RENDER_QUANTUM];
        r.render_interleaved(&mut out, 1);

        assert_eq!(shared.rejected_voices(), 1);
        assert_eq!(shared.active_voices(), 1);
        let rejected = h.graveyard.pop().unwrap();
        assert!(rejected.is_finished());
        assert!(rejected.graph().handles().iter().all(|h| h.is_stopped()));
    }

    #[test]
    fn master_volume_scales_the_output() {
        let (mut r, mut h, shared) = renderer(4);
        h.commands.send(Command::Start(tone(0.0, 1.0))).unwrap();
        shared.set_master_volume(0.0);

        let mut out = vec![0.0; RENDER_QUANTUM * 2];
        r.render_interleaved(&mut out, 2);
        assert!(out.iter().all(|&s| s == 0.0));

        shared.set_master_volume(0.5);
        r.render_interleaved(&mut out, 2);
        let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.2 && peak <= 0.5 + 1e-6);
    }

    #[test]
    fn mono_and_multichannel_layouts() {
        let (mut r, mut h, _shared) = renderer(4);
        h.commands.send(Command::Start(tone(0.0, 1.0))).unwrap();

        let mut quad = vec![0.0; 64 * 4];
        r.render_interleaved(&mut quad, 4);
        for frame in quad.chunks(4) {
            assert_eq!(frame[0], frame[2]);
            assert_eq!(frame[1], frame[3]);
        }

        let mut mono = vec![0.0; 64];
        r.render_interleaved(&mut mono, 1);
        assert!(mono.iter().any(|&s| s != 0.0));
    }
}
