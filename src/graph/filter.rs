use crate::dsp::filter::{FilterType, SvFilter};
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::param::AudioParam;
use crate::RENDER_QUANTUM;

/*
State-Variable Filter Node
==========================

Recipes use three responses:

Lowpass: Passes frequencies below the cutoff.
  - Piano fundamental, flute body, guitar sustain sweeping darker over time

Highpass: Passes frequencies above the cutoff.
  - Hi-hats and cymbals at several kHz, recorder edge tone, snare rattle

Bandpass: Passes a band around the centre frequency.
  - Violin body formants, pan flute breath, clap bursts, ride shimmer

Parameters:
-----------

Frequency (Hz): cutoff or band centre. Automatable, so a cutoff can fall as
a plucked string loses its brightness.

Q: resonance. Around 0.7 is a smooth rolloff, 5 and above rings at the
cutoff. For the bandpass the peak gain stays at unity and Q only narrows
the band.

Both parameters are evaluated per sample; the coefficient update is skipped
while they hold still.
*/

pub struct FilterNode {
    filter: SvFilter,
    frequency: AudioParam,
    q: AudioParam,
    freq_buf: Box<[f32]>,
    q_buf: Box<[f32]>,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, frequency_hz: f32, q: f32) -> Self {
        Self {
            filter: SvFilter::new(filter_type),
            frequency: AudioParam::new(frequency_hz),
            q: AudioParam::new(q),
            freq_buf: vec![0.0; RENDER_QUANTUM].into_boxed_slice(),
            q_buf: vec![0.0; RENDER_QUANTUM].into_boxed_slice(),
        }
    }

    pub fn lowpass(frequency_hz: f32, q: f32) -> Self {
        Self::new(FilterType::LowPass, frequency_hz, q)
    }

    pub fn highpass(frequency_hz: f32, q: f32) -> Self {
        Self::new(FilterType::HighPass, frequency_hz, q)
    }

    pub fn bandpass(frequency_hz: f32, q: f32) -> Self {
        Self::new(FilterType::BandPass, frequency_hz, q)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    pub fn frequency(&mut self) -> &mut AudioParam {
        &mut self.frequency
    }

    pub fn q(&mut self) -> &mut AudioParam {
        &mut self.q
    }

    pub fn frequency_param(&self) -> &AudioParam {
        &self.frequency
    }

    pub fn q_param(&self) -> &AudioParam {
        &self.q
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(self.freq_buf.len());
        let freq = &mut self.freq_buf[..len];
        let q = &mut self.q_buf[..len];
        self.frequency.fill(ctx, freq);
        self.q.fill(ctx, q);

        for ((sample, &f), &q) in out.iter_mut().zip(freq.iter()).zip(q.iter()) {
            self.filter.set(f, q, ctx.sample_rate);
            *sample = self.filter.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::oscillator::OscNode;
    use crate::graph::generator::Generator;

    fn rms(buf: &[f32]) -> f32 {
        (buf.iter().map(|s| s * s).sum::<f32>() / buf.len() as f32).sqrt()
    }

    fn render_through(filter: &mut FilterNode, tone_hz: f32) -> f32 {
        let sample_rate = 48_000.0;
        let mut osc = OscNode::sine(tone_hz);
        osc.start(0.0);
        osc.stop(10.0);

        let mut energy = 0.0;
        let mut buf = vec![0.0; RENDER_QUANTUM];
        for block in 0..40u64 {
            let ctx = RenderCtx::new(sample_rate, block * RENDER_QUANTUM as u64);
            osc.render_block(&mut buf, &ctx);
            filter.render_block(&mut buf, &ctx);
            if block >= 20 {
                energy += rms(&buf);
            }
        }
        energy / 20.0
    }

    #[test]
    fn lowpass_keeps_lows_and_cuts_highs() {
        let low = render_through(&mut FilterNode::lowpass(1_000.0, 0.7), 100.0);
        let high = render_through(&mut FilterNode::lowpass(1_000.0, 0.7), 8_000.0);
        assert!(low > 0.6, "low tone rms {low}");
        assert!(high < 0.05, "high tone rms {high}");
    }

    #[test]
    fn cutoff_automation_darkens_the_tone() {
        let mut open = FilterNode::lowpass(8_000.0, 0.7);
        let bright = render_through(&mut open, 3_000.0);

        let mut closing = FilterNode::lowpass(8_000.0, 0.7);
        closing.frequency().set_value_at_time(8_000.0, 0.0).unwrap();
        closing
            .frequency()
            .exponential_ramp_to_value_at_time(300.0, 0.02)
            .unwrap();
        let dark = render_through(&mut closing, 3_000.0);

        assert!(dark < bright * 0.2, "bright {bright}, dark {dark}");
    }
}
