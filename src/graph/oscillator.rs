use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::graph::generator::{Generator, Playback, PlaybackState};
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::param::AudioParam;
use crate::RENDER_QUANTUM;

/*
Audio Oscillator
================

An oscillator is the fundamental sound source in every instrument recipe. It
generates a repeating waveform at a frequency (pitch), producing the raw
material that filters and gain envelopes shape.

Waveform Types and Their Character:
-----------------------------------

Sine: The purest tone, a single frequency with no harmonics.
  - Use: organ drawbars, kick body, bell partials

Sawtooth: Contains all harmonics, amplitude falling off as 1/n.
  - Use: bowed strings, recorder, pan flute breath

Square: Only odd harmonics, falling off as 1/n.
  - Use: low piano register, plucked guitar attack

Triangle: Odd harmonics falling off as 1/n², much softer than square.
  - Use: piano fundamental, flute body, drum clicks

Frequency is an automatable parameter, so a drum can glide its pitch:

  let mut osc = OscNode::new(Waveform::Sine, 80.0);
  osc.frequency().set_value_at_time(80.0, t)?;
  osc.frequency().exponential_ramp_to_value_at_time(0.01, t + 0.5)?;
  osc.start(t);
  osc.stop(t + 0.5);
*/

pub struct OscNode {
    osc: Oscillator,
    frequency: AudioParam,
    playback: Playback,
    freq_buf: Box<[f32]>,
}

impl OscNode {
    pub fn new(waveform: Waveform, frequency_hz: f32) -> Self {
        Self {
            osc: Oscillator::new(waveform),
            frequency: AudioParam::new(frequency_hz),
            playback: Playback::new(),
            freq_buf: vec![0.0; RENDER_QUANTUM].into_boxed_slice(),
        }
    }

    pub fn sine(frequency_hz: f32) -> Self {
        Self::new(Waveform::Sine, frequency_hz)
    }

    pub fn square(frequency_hz: f32) -> Self {
        Self::new(Waveform::Square, frequency_hz)
    }

    pub fn sawtooth(frequency_hz: f32) -> Self {
        Self::new(Waveform::Sawtooth, frequency_hz)
    }

    pub fn triangle(frequency_hz: f32) -> Self {
        Self::new(Waveform::Triangle, frequency_hz)
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    /// Frequency in Hz, automatable.
    pub fn frequency(&mut self) -> &mut AudioParam {
        &mut self.frequency
    }

    pub fn frequency_param(&self) -> &AudioParam {
        &self.frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(self.freq_buf.len());
        let freq = &mut self.freq_buf[..len];
        self.frequency.fill(ctx, freq);

        out.fill(0.0);
        let Some(range) = self.playback.active_range(ctx, len) else {
            return;
        };
        for i in range.clone() {
            out[i] = self.osc.next_sample(freq[i], ctx.sample_rate);
        }
        self.playback.finish_block(out, range);
    }

    fn is_active(&self) -> bool {
        self.playback.state() != PlaybackState::Stopped
    }
}

impl Generator for OscNode {
    fn playback(&self) -> &Playback {
        &self.playback
    }

    fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::new(sample_rate, 0);
        let mut osc = OscNode::sine(440.0);
        osc.start(0.0);
        osc.stop(1.0);

        let mut buffer = vec![0.0f32; RENDER_QUANTUM];
        osc.render_block(&mut buffer, &ctx);

        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn silent_outside_its_window() {
        let sample_rate = 1_000.0;
        let mut osc = OscNode::square(100.0);
        osc.start(0.064);
        osc.stop(0.2);

        let mut buffer = vec![1.0f32; RENDER_QUANTUM];
        osc.render_block(&mut buffer, &RenderCtx::new(sample_rate, 0));
        assert!(buffer[..64].iter().all(|&s| s == 0.0));
        assert!(buffer[64..].iter().any(|&s| s != 0.0));

        osc.render_block(&mut buffer, &RenderCtx::new(sample_rate, 128));
        assert!(buffer[72..].iter().all(|&s| s == 0.0));
        assert!(!osc.is_active());
    }

    #[test]
    fn follows_frequency_automation() {
        let sample_rate = 8_000.0;
        let mut osc = OscNode::sine(100.0);
        osc.frequency().set_value_at_time(100.0, 0.0).unwrap();
        osc.frequency()
            .exponential_ramp_to_value_at_time(0.01, 0.5)
            .unwrap();
        osc.start(0.0);
        osc.stop(0.5);

        // geometric midpoint of 100 -> 0.01
        assert!((osc.frequency_param().value_at(0.25) - 1.0).abs() < 1e-3);

        // 0.2 s of output; the falling pitch shows up as fewer crossings later on
        let mut rendered = Vec::new();
        let mut buffer = vec![0.0f32; RENDER_QUANTUM];
        for block in 0..13u64 {
            osc.render_block(&mut buffer, &RenderCtx::new(sample_rate, block * RENDER_QUANTUM as u64));
            rendered.extend_from_slice(&buffer);
        }
        let rising = |samples: &[f32]| samples.windows(2).filter(|w| w[0] < 0.0 && w[1] >= 0.0).count();
        let early = rising(&rendered[..800]);
        let late = rising(&rendered[800..1600]);
        assert!(early >= 3, "expected several cycles early on, got {early}");
        assert!(late < early, "pitch did not fall: {early} then {late}");
    }
}
