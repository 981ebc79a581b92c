use std::fmt;

use thiserror::Error;

/// The part of the machine an out of bounds access was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Memory,
    Register,
    Stack,
    Display,
    Keyboard,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Memory => "memory address",
            Region::Register => "register",
            Region::Stack => "stack slot",
            Region::Display => "display coordinate",
            Region::Keyboard => "key",
        };
        f.write_str(name)
    }
}

/// Everything that can go wrong while loading or running a program.
///
/// Apart from `UnsupportedOpcode`, which is only ever logged, each of these aborts the
/// instruction that raised it and is handed back to whoever is driving the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("{region} {index:#05X} is out of bounds")]
    OutOfBounds { region: Region, index: usize },

    #[error("stack overflow: subroutines nested more than 16 deep")]
    StackOverflow,

    #[error("stack underflow: return without a matching call")]
    StackUnderflow,

    #[error("unsupported opcode {0:#06X}")]
    UnsupportedOpcode(u16),

    #[error("ROM is {size} bytes but only {capacity} bytes of program memory are available")]
    RomTooLarge { size: usize, capacity: usize },

    #[error("key input closed while waiting for a key press")]
    InputClosed,
}

impl Chip8Error {
    pub(crate) fn out_of_bounds(region: Region, index: usize) -> Self {
        Chip8Error::OutOfBounds { region, index }
    }
}
