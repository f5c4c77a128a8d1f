use rtrb::{Consumer, Producer};

use crate::error::EngineError;
use crate::synth::voice::Voice;

/// Control thread → audio thread.
pub enum Command {
    /// A fully built voice, ready to render from its scheduled start.
    Start(Box<Voice>),
}

pub trait CommandReceiver {
    fn next_command(&mut self) -> Option<Command>;
}

impl CommandReceiver for Consumer<Command> {
    fn next_command(&mut self) -> Option<Command> {
        self.pop().ok()
    }
}

pub trait CommandSender {
    fn send(&mut self, command: Command) -> Result<(), EngineError>;
}

impl CommandSender for Producer<Command> {
    fn send(&mut self, command: Command) -> Result<(), EngineError> {
        self.push(command).map_err(|_| EngineError::QueueFull)
    }
}
