use std::fmt;

/// # Opcode
///
/// A raw 16-bit instruction word, stored most significant byte first.
///
/// Which operation it encodes is decided by some combination of:
/// - `(n, _, _, _)` the family; applies to every opcode
/// - `(_, _, _, n)` or `(_, _, n, n)` the operation within the `8`, `E` and `F` families
/// - `(n, n, n, n)` the two fixed operations `00E0` and `00EE`
///
/// The remaining nibbles carry operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx, or the last register of the range V0..=Vx
/// - `(_, _, n, _)` the register Vy
/// - `(_, _, _, n)` a nibble, e.g. the number of rows in a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// All four nibbles, most significant first
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.nibble())
    }

    /// `[f___]`
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    /// `[___n]`
    pub fn nibble(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// `[__kk]`
    pub fn byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// `[_nnn]`
    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode(word)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}
