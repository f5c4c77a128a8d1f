use crate::graph::generator::{Generator, Playback, PlaybackState};
use crate::graph::node::{GraphNode, RenderCtx};

/// Plays a pre-rendered mono buffer (usually shaped noise) from its start time.
///
/// A one-shot source goes quiet once the buffer runs out even if its stop
/// time is later; a looping source wraps until it is stopped.
pub struct BufferSourceNode {
    buffer: Box<[f32]>,
    position: usize,
    looping: bool,
    playback: Playback,
}

impl BufferSourceNode {
    pub fn new(buffer: Box<[f32]>) -> Self {
        Self {
            buffer,
            position: 0,
            looping: false,
            playback: Playback::new(),
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl GraphNode for BufferSourceNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let Some(range) = self.playback.active_range(ctx, out.len()) else {
            return;
        };

        let len = self.buffer.len();
        for i in range.clone() {
            if self.position >= len {
                if self.looping && len > 0 {
                    self.position = 0;
                } else {
                    self.playback.end_now();
                    break;
                }
            }
            out[i] = self.buffer[self.position];
            self.position += 1;
        }
        self.playback.finish_block(out, range);
    }

    fn is_active(&self) -> bool {
        self.playback.state() != PlaybackState::Stopped
    }
}

impl Generator for BufferSourceNode {
    fn playback(&self) -> &Playback {
        &self.playback
    }

    fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }
}
