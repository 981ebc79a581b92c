use crate::constants::STACK_DEPTH;
use crate::error::Chip8Error;

/// # Call Stack
/// Return addresses for up to 16 levels of nested subroutines.
///
/// `sp` indexes the next free slot: pushes store then increment, pops decrement then load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallStack {
    frames: [u16; STACK_DEPTH],
    sp: u8,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            frames: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// The stack pointer; also the number of return addresses currently held
    pub fn pointer(&self) -> u8 {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        let slot = self
            .frames
            .get_mut(self.sp as usize)
            .ok_or(Chip8Error::StackOverflow)?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.frames[self.sp as usize])
    }

    /// The most recently pushed address
    pub fn peek(&self) -> Option<u16> {
        (self.sp as usize)
            .checked_sub(1)
            .map(|top| self.frames[top])
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
