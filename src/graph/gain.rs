use crate::dsp::amplify::multiply_in_place;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::param::AudioParam;
use crate::RENDER_QUANTUM;

/// Multiplies its input by an automatable gain, usually an envelope.
pub struct GainNode {
    gain: AudioParam,
    gain_buf: Box<[f32]>,
}

impl GainNode {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: AudioParam::new(gain),
            gain_buf: vec![0.0; RENDER_QUANTUM].into_boxed_slice(),
        }
    }

    pub fn gain(&mut self) -> &mut AudioParam {
        &mut self.gain
    }

    pub fn gain_param(&self) -> &AudioParam {
        &self.gain
    }
}

impl Default for GainNode {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(self.gain_buf.len());
        let gain = &mut self.gain_buf[..len];
        self.gain.fill(ctx, gain);
        multiply_in_place(&mut out[..len], gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_scheduled_gain() {
        let mut node = GainNode::new(1.0);
        node.gain().set_value_at_time(0.5, 0.004).unwrap();

        let mut out = [1.0; 8];
        node.render_block(&mut out, &RenderCtx::new(1_000.0, 0));
        assert_eq!(out, [1.0, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.5]);
    }
}
