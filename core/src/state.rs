use crate::keyboard::Keyboard;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::screen::Screen;
use crate::stack::CallStack;

/// Everything one machine owns.
///
/// ## CPU
/// - `registers` V0..VF, I, the program counter and both timers
/// - `stack` return addresses and the stack pointer
///
/// ## Memory
/// - 4096 bytes of addressable memory with the font in the reserved area
///
/// ## IO
/// - `screen` the 64x32 frame drawn by sprites
/// - `keyboard` pressed keys and the host's keymap
///
/// None of it is shared, so any number of machines can run side by side.
#[derive(Clone)]
pub struct State<K> {
    pub memory: Memory,
    pub registers: Registers,
    pub stack: CallStack,
    pub screen: Screen,
    pub keyboard: Keyboard<K>,
}

impl<K: PartialEq> State<K> {
    pub fn new() -> Self {
        State {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: CallStack::new(),
            screen: Screen::new(),
            keyboard: Keyboard::new(),
        }
    }
}

impl<K: PartialEq> Default for State<K> {
    fn default() -> Self {
        Self::new()
    }
}
