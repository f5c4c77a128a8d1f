// Purpose: Voice runtime between the recipes and the audio device
// Voices are built on the control thread, rendered on the audio thread, and tracked for stopping

pub mod message;
pub mod renderer;
pub mod tracker;
pub mod voice;
