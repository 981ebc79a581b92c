use crate::constants::{FONT_SET, FONT_START, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Chip8Error, Region};

/// # Memory
/// 4096 bytes of byte addressable RAM.
///
/// ```text
/// 0x000 - 0x04F  font sprite sheet
/// 0x050 - 0x1FF  reserved for the interpreter
/// 0x200 - 0xFFF  program and data space
/// ```
///
/// Every access is bounds checked; addresses never wrap.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the font copied into the reserved area
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        bytes[font..font + FONT_SET.len()].copy_from_slice(&FONT_SET);
        Memory { bytes }
    }

    pub fn get(&self, address: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address)
            .copied()
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Memory, address))
    }

    pub fn set(&mut self, address: usize, value: u8) -> Result<(), Chip8Error> {
        let cell = self
            .bytes
            .get_mut(address)
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Memory, address))?;
        *cell = value;
        Ok(())
    }

    /// Reads the big-endian word at `address` and `address + 1`.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn get_word(&self, address: usize) -> Result<u16, Chip8Error> {
        let high = u16::from(self.get(address)?);
        let low = u16::from(self.get(address + 1)?);
        Ok(high << 8 | low)
    }

    /// Borrows `len` bytes starting at `address`
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = Memory::checked_end(address, len)?;
        Ok(&self.bytes[address..end])
    }

    /// Copies `data` into memory starting at `address`.
    /// Nothing is written unless the whole range fits.
    pub fn write(&mut self, address: usize, data: &[u8]) -> Result<(), Chip8Error> {
        let end = Memory::checked_end(address, data.len())?;
        self.bytes[address..end].copy_from_slice(data);
        Ok(())
    }

    /// Copies a program image into memory at `PROGRAM_START`
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let capacity = MEMORY_SIZE - PROGRAM_START as usize;
        if program.len() > capacity {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                capacity,
            });
        }
        self.write(PROGRAM_START as usize, program)
    }

    /// The exclusive end of `address..address + len`, or the first offending address
    fn checked_end(address: usize, len: usize) -> Result<usize, Chip8Error> {
        match address.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(end),
            _ => Err(Chip8Error::out_of_bounds(
                Region::Memory,
                address.max(MEMORY_SIZE),
            )),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
