use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use crate::error::Chip8Error;

/// Supplies key presses to an instruction that has to wait for one.
///
/// `wait_for_key` blocks until the next key press and returns its virtual code (0x0..0xF).
/// It's passed into the machine on every cycle so the core never needs to know where key
/// presses come from.
pub trait KeyInput {
    fn wait_for_key(&mut self) -> Result<u8, Chip8Error>;
}

/// Blocks on the channel; a disconnected sender means no key will ever arrive
impl KeyInput for Receiver<u8> {
    fn wait_for_key(&mut self) -> Result<u8, Chip8Error> {
        self.recv().map_err(|_| Chip8Error::InputClosed)
    }
}

/// A scripted sequence of key presses, useful for running headless
#[derive(Debug, Default, Clone)]
pub struct QueuedKeys {
    keys: VecDeque<u8>,
}

impl QueuedKeys {
    pub fn new(keys: &[u8]) -> Self {
        QueuedKeys {
            keys: keys.iter().copied().collect(),
        }
    }

    pub fn push(&mut self, key: u8) {
        self.keys.push_back(key);
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyInput for QueuedKeys {
    fn wait_for_key(&mut self) -> Result<u8, Chip8Error> {
        self.keys.pop_front().ok_or(Chip8Error::InputClosed)
    }
}
