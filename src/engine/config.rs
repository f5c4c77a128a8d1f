#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine settings fixed at construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Initial master gain, 0..=1.
    pub master_volume: f32,
    /// Voices the audio thread renders at once; more are rejected.
    pub voice_capacity: usize,
    /// Size of the control → audio voice queue.
    pub command_capacity: usize,
    /// Length of the synthetic reverb impulse, seconds.
    pub reverb_seconds: f32,
    /// Fade applied when voices are stopped early, seconds.
    pub stop_fade_secs: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.3,
            voice_capacity: 256,
            command_capacity: 512,
            reverb_seconds: 2.0,
            stop_fade_secs: 0.005,
        }
    }
}

impl EngineConfig {
    pub fn master_volume(mut self, volume: f32) -> Self {
        self.master_volume = volume;
        self
    }

    pub fn voice_capacity(mut self, voices: usize) -> Self {
        self.voice_capacity = voices;
        self
    }

    pub fn reverb_seconds(mut self, seconds: f32) -> Self {
        self.reverb_seconds = seconds;
        self
    }
}
