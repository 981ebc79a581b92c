use crate::constants::{FLAG_REGISTER, PROGRAM_START, REGISTER_COUNT};
use crate::error::{Chip8Error, Region};

/// How the sound timer behaves when the host ticks the timers.
///
/// `Countdown` decrements it once per tick like the delay timer, sounding until it reaches 0.
/// `SinglePulse` sounds once and immediately zeroes it, which is how some interpreters
/// drive a blocking beep of the requested length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundTimerMode {
    Countdown,
    SinglePulse,
}

impl Default for SoundTimerMode {
    fn default() -> Self {
        SoundTimerMode::Countdown
    }
}

/// # Registers
/// - 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag, only ever written as a side effect
/// - (i) a 16-bit memory address register, only the lower 12 bits address memory
/// - (pc) a 16-bit program counter
///
/// ## Timers
/// - 2 8-bit timers (delay & sound)
/// - they're never decremented on their own, the host calls `tick_timers` at 60Hz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// Vx
    pub fn get(&self, index: u8) -> Result<u8, Chip8Error> {
        self.v
            .get(index as usize)
            .copied()
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Register, index.into()))
    }

    /// Vx = value
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), Chip8Error> {
        let register = self
            .v
            .get_mut(index as usize)
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Register, index.into()))?;
        *register = value;
        Ok(())
    }

    /// VF
    pub fn flag(&self) -> u8 {
        self.v[FLAG_REGISTER as usize]
    }

    /// VF = 1 if set else 0
    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG_REGISTER as usize] = u8::from(set);
    }

    /// V0..=Vx
    pub fn range(&self, last: u8) -> Result<&[u8], Chip8Error> {
        self.v
            .get(..=last as usize)
            .ok_or_else(|| Chip8Error::out_of_bounds(Region::Register, last.into()))
    }

    /// V0..=V(values.len() - 1) = values
    pub fn load_range(&mut self, values: &[u8]) -> Result<(), Chip8Error> {
        if values.len() > REGISTER_COUNT {
            return Err(Chip8Error::out_of_bounds(Region::Register, values.len() - 1));
        }
        self.v[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// pc += 2
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Advances both timers by one host tick.
    ///
    /// Returns whether the sound timer was running, i.e. whether the host should be beeping.
    pub fn tick_timers(&mut self, mode: SoundTimerMode) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer == 0 {
            return false;
        }
        match mode {
            SoundTimerMode::Countdown => self.sound_timer -= 1,
            SoundTimerMode::SinglePulse => self.sound_timer = 0,
        }
        true
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_program() {
        let registers = Registers::new();
        assert_eq!(registers.pc, 0x200);
        assert_eq!(registers.i, 0x0);
    }

    #[test]
    fn test_get_and_set() {
        let mut registers = Registers::new();
        registers.set(0xE, 0x42).unwrap();
        assert_eq!(registers.get(0xE).unwrap(), 0x42);
    }

    #[test]
    fn test_index_out_of_bounds() {
        let mut registers = Registers::new();
        let expected = Err(Chip8Error::out_of_bounds(Region::Register, 0x10));
        assert_eq!(registers.get(0x10), expected);
        assert_eq!(registers.set(0x10, 0x1), expected.map(|_| ()));
    }

    #[test]
    fn test_flag() {
        let mut registers = Registers::new();
        registers.set_flag(true);
        assert_eq!(registers.get(0xF).unwrap(), 0x1);
        registers.set_flag(false);
        assert_eq!(registers.flag(), 0x0);
    }

    #[test]
    fn test_range() {
        let mut registers = Registers::new();
        registers.load_range(&[0x1, 0x2, 0x3]).unwrap();
        assert_eq!(registers.range(0x2).unwrap(), &[0x1, 0x2, 0x3]);
        assert!(registers.range(0x10).is_err());
    }

    #[test]
    fn test_skip_wraps() {
        let mut registers = Registers::new();
        registers.pc = 0xFFFF;
        registers.skip();
        assert_eq!(registers.pc, 0x1);
    }

    #[test]
    fn test_tick_countdown() {
        let mut registers = Registers::new();
        registers.delay_timer = 0x2;
        registers.sound_timer = 0x2;
        assert!(registers.tick_timers(SoundTimerMode::Countdown));
        assert_eq!((registers.delay_timer, registers.sound_timer), (0x1, 0x1));
        assert!(registers.tick_timers(SoundTimerMode::Countdown));
        assert!(!registers.tick_timers(SoundTimerMode::Countdown));
        assert_eq!((registers.delay_timer, registers.sound_timer), (0x0, 0x0));
    }

    #[test]
    fn test_tick_single_pulse() {
        let mut registers = Registers::new();
        registers.delay_timer = 0x2;
        registers.sound_timer = 0x9;
        assert!(registers.tick_timers(SoundTimerMode::SinglePulse));
        assert_eq!((registers.delay_timer, registers.sound_timer), (0x1, 0x0));
        assert!(!registers.tick_timers(SoundTimerMode::SinglePulse));
    }
}
