use crate::constants::KEY_COUNT;
use crate::error::{Chip8Error, Region};

/// # Keyboard
/// The original machines had a 16-key hexadecimal keypad:
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// Keys are tracked by their virtual code 0x0..0xF. The host installs a table whose slot `i`
/// holds the host key (of whatever type the host uses) that stands in for virtual key `i`.
#[derive(Debug, Clone)]
pub struct Keyboard<K> {
    pressed: [bool; KEY_COUNT],
    keymap: Option<[K; KEY_COUNT]>,
}

impl<K: PartialEq> Keyboard<K> {
    pub fn new() -> Self {
        Keyboard {
            pressed: [false; KEY_COUNT],
            keymap: None,
        }
    }

    pub fn set_mapping(&mut self, keymap: [K; KEY_COUNT]) {
        self.keymap = Some(keymap);
    }

    pub fn mapping(&self) -> Option<&[K; KEY_COUNT]> {
        self.keymap.as_ref()
    }

    /// Finds the virtual key bound to `host_key`, if any
    pub fn virtual_code_of(&self, host_key: &K) -> Option<u8> {
        self.keymap
            .as_ref()?
            .iter()
            .position(|k| k == host_key)
            .map(|code| code as u8)
    }

    pub fn press(&mut self, code: u8) -> Result<(), Chip8Error> {
        *self.key_mut(code)? = true;
        Ok(())
    }

    pub fn release(&mut self, code: u8) -> Result<(), Chip8Error> {
        *self.key_mut(code)? = false;
        Ok(())
    }

    pub fn is_pressed(&self, code: u8) -> Result<bool, Chip8Error> {
        self.pressed
            .get(code as usize)
            .copied()
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Keyboard, code.into()))
    }

    fn key_mut(&mut self, code: u8) -> Result<&mut bool, Chip8Error> {
        self.pressed
            .get_mut(code as usize)
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Keyboard, code.into()))
    }
}

impl<K: PartialEq> Default for Keyboard<K> {
    fn default() -> Self {
        Self::new()
    }
}
