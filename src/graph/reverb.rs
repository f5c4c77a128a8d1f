use rand::Rng;

use crate::dsp::convolution::PartitionedConvolver;
use crate::dsp::noise::ImpulseResponse;

/*
Reverb Send Bus
===============

One convolution reverb shared by every voice. Voices do not own a reverb;
they split their output into two gains (see VoiceBuilder::reverb_send):

  voice ──┬── dry gain (1 - amount) ──────────────────┐
          │                                          ├──→ master gain
          └── wet gain (amount) ──→ [ ReverbBus ] ───┘
                                     (shared, stereo)

All wet sends are summed into one mono bus per block, so the convolution
cost does not grow with the number of voices.

Impulse Response
----------------

Built once at initialization: two channels of independent white noise with
a (1 - i/len)² decay, two seconds long by default. Independent noise per
channel gives the tail its stereo width. The response is never changed
afterwards.

Amount is a per-recipe constant:
  0.1  guitar (dry pluck)        0.5  grand piano
  0.3  piano                     0.6  organ (cathedral)
*/

pub struct ReverbBus {
    convolver: PartitionedConvolver,
    impulse_len: usize,
}

impl ReverbBus {
    /// Generate a synthetic impulse and prepare the convolver for `block`-sized input.
    pub fn synthetic<R: Rng + ?Sized>(seconds: f32, sample_rate: f32, block: usize, rng: &mut R) -> Self {
        let impulse = ImpulseResponse::synthetic(seconds, sample_rate, rng);
        Self::from_impulse(&impulse, block)
    }

    pub fn from_impulse(impulse: &ImpulseResponse, block: usize) -> Self {
        Self {
            convolver: PartitionedConvolver::new(
                &impulse.left,
                &impulse.right,
                block,
                impulse.sample_rate,
                true,
            ),
            impulse_len: impulse.len(),
        }
    }

    pub fn impulse_len(&self) -> usize {
        self.impulse_len
    }

    /// Convolve the summed wet sends and add the stereo result to `left`/`right`.
    pub fn process(&mut self, wet: &[f32], scratch_left: &mut [f32], scratch_right: &mut [f32], left: &mut [f32], right: &mut [f32]) {
        self.convolver.process(wet, scratch_left, scratch_right);
        for (out, &tail) in left.iter_mut().zip(scratch_left.iter()) {
            *out += tail;
        }
        for (out, &tail) in right.iter_mut().zip(scratch_right.iter()) {
            *out += tail;
        }
    }

    pub fn reset(&mut self) {
        self.convolver.reset();
    }
}
