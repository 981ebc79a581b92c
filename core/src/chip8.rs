use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{KEY_COUNT, PROGRAM_START};
use crate::error::Chip8Error;
use crate::input::KeyInput;
use crate::instruction::Instruction;
use crate::operations;
use crate::registers::SoundTimerMode;
use crate::screen::Screen;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `rng` feeding the random instruction
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys through a host keymap
/// - advancing the CPU
/// - advancing its timers
/// - inspecting its screen for rendering by some display
///
/// `K` is whatever the host identifies its keys with.
pub struct Chip8<K> {
    state: State<K>,
    rng: Box<dyn RngCore + Send>,
}

impl<K: PartialEq> Chip8<K> {
    pub fn new() -> Self {
        Chip8::with_rng(StdRng::from_entropy())
    }

    /// A machine whose random instruction draws from `rng`
    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Chip8 {
            state: State::new(),
            rng: Box::new(rng),
        }
    }

    /// Maps host keys to virtual key codes; `keymap[code]` is the host key for `code`
    pub fn set_keymap(&mut self, keymap: [K; KEY_COUNT]) {
        self.state.keyboard.set_mapping(keymap);
    }

    /// Load a rom image into program space and point the pc at it
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.state.memory.load_program(rom)?;
        self.state.registers.pc = PROGRAM_START;
        log::debug!("loaded {} byte rom at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Marks the virtual key mapped to `key` as pressed.
    /// Returns its code, or None if `key` isn't mapped.
    pub fn key_down(&mut self, key: &K) -> Option<u8> {
        let code = self.state.keyboard.virtual_code_of(key)?;
        self.state.keyboard.press(code).ok()?;
        Some(code)
    }

    /// Marks the virtual key mapped to `key` as released.
    /// Returns its code, or None if `key` isn't mapped.
    pub fn key_up(&mut self, key: &K) -> Option<u8> {
        let code = self.state.keyboard.virtual_code_of(key)?;
        self.state.keyboard.release(code).ok()?;
        Some(code)
    }

    /// Gets the opcode currently pointed at by the pc
    pub fn fetch(&self) -> Result<u16, Chip8Error> {
        self.state.memory.get_word(self.state.registers.pc as usize)
    }

    /// Advances the CPU by a single cycle
    /// - gets the next opcode
    /// - moves the pc past it
    /// - executes it
    pub fn step(&mut self, input: &mut dyn KeyInput) -> Result<(), Chip8Error> {
        let word = self.fetch()?;
        self.state.registers.skip();
        self.execute(word, input)
    }

    /// Decodes and executes `word` without touching the pc first
    pub fn execute(&mut self, word: u16, input: &mut dyn KeyInput) -> Result<(), Chip8Error> {
        let instruction = Instruction::from(word);
        operations::execute(&mut self.state, self.rng.as_mut(), input, instruction)
    }

    /// Advances both timers by one tick; returns whether the host should be beeping
    pub fn tick_timers(&mut self, mode: SoundTimerMode) -> bool {
        self.state.registers.tick_timers(mode)
    }

    pub fn screen(&self) -> &Screen {
        &self.state.screen
    }

    /// Whether the screen changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        self.state.screen.take_redraw()
    }

    pub fn state(&self) -> &State<K> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State<K> {
        &mut self.state
    }
}

impl<K: PartialEq> Default for Chip8<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEMORY_SIZE;
    use crate::input::QueuedKeys;
    use rand::rngs::mock::StepRng;
    use std::thread;

    const KEYMAP: [char; KEY_COUNT] = [
        'x', '1', '2', '3', 'q', 'w', 'e', 'a', 's', 'd', 'z', 'c', '4', 'r', 'f', 'v',
    ];

    fn chip8() -> Chip8<char> {
        let mut chip8 = Chip8::with_rng(StepRng::new(0xAB, 0));
        chip8.set_keymap(KEYMAP);
        chip8
    }

    #[test]
    fn test_chip8_fetches_op() {
        let mut chip8 = chip8();
        chip8.load_rom(&[0xAA, 0xBB]).unwrap();
        assert_eq!(chip8.fetch(), Ok(0xAABB));
    }

    #[test]
    fn test_fetch_past_memory() {
        let mut chip8 = chip8();
        chip8.state_mut().registers.pc = 0xFFF;
        assert!(chip8.fetch().is_err());
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8();
        chip8.load_rom(&[0x00, 0xE0]).unwrap();
        chip8.step(&mut QueuedKeys::default()).unwrap();
        assert_eq!(chip8.state().registers.pc, PROGRAM_START + 2);
    }

    #[test]
    fn test_step_advances_before_executing() {
        let mut chip8 = chip8();
        // CALL 0x300 pushes the address after itself
        chip8.load_rom(&[0x23, 0x00]).unwrap();
        chip8.step(&mut QueuedKeys::default()).unwrap();
        assert_eq!(chip8.state().registers.pc, 0x300);
        assert_eq!(chip8.state().stack.peek(), Some(PROGRAM_START + 2));
    }

    #[test]
    fn test_failed_step_keeps_advanced_pc() {
        let mut chip8 = chip8();
        chip8.load_rom(&[0x00, 0xEE]).unwrap();
        assert_eq!(
            chip8.step(&mut QueuedKeys::default()),
            Err(Chip8Error::StackUnderflow)
        );
        assert_eq!(chip8.state().registers.pc, PROGRAM_START + 2);
    }

    #[test]
    fn test_execute_leaves_pc() {
        let mut chip8 = chip8();
        chip8.execute(0x6142, &mut QueuedKeys::default()).unwrap();
        assert_eq!(chip8.state().registers.pc, PROGRAM_START);
        assert_eq!(chip8.state().registers.get(0x1), Ok(0x42));
    }

    #[test]
    fn test_load_rom_resets_pc() {
        let mut chip8 = chip8();
        chip8.state_mut().registers.pc = 0x400;
        chip8.load_rom(&[0x12, 0x34]).unwrap();
        assert_eq!(chip8.state().registers.pc, PROGRAM_START);
        assert_eq!(chip8.state().memory.slice(0x200, 2).unwrap(), &[0x12, 0x34]);
    }

    #[test]
    fn test_load_rom_fills_program_space() {
        let mut chip8 = chip8();
        let rom = vec![0x1; MEMORY_SIZE - PROGRAM_START as usize];
        assert!(chip8.load_rom(&rom).is_ok());
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut chip8 = chip8();
        let rom = vec![0x1; MEMORY_SIZE - PROGRAM_START as usize + 1];
        assert_eq!(
            chip8.load_rom(&rom),
            Err(Chip8Error::RomTooLarge {
                size: 0xE01,
                capacity: 0xE00,
            })
        );
        assert_eq!(chip8.state().memory.get(0x200), Ok(0x0));
    }

    #[test]
    fn test_key_down_resolves_keymap() {
        let mut chip8 = chip8();
        assert_eq!(chip8.key_down(&'x'), Some(0x0));
        assert_eq!(chip8.key_down(&'v'), Some(0xF));
        assert_eq!(chip8.state().keyboard.is_pressed(0x0), Ok(true));
        assert_eq!(chip8.state().keyboard.is_pressed(0xF), Ok(true));
        assert_eq!(chip8.key_up(&'x'), Some(0x0));
        assert_eq!(chip8.state().keyboard.is_pressed(0x0), Ok(false));
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut chip8 = chip8();
        assert_eq!(chip8.key_down(&'p'), None);
        assert_eq!(chip8.key_up(&'p'), None);
        for code in 0..KEY_COUNT as u8 {
            assert_eq!(chip8.state().keyboard.is_pressed(code), Ok(false));
        }
    }

    #[test]
    fn test_keys_without_keymap_are_ignored() {
        let mut chip8: Chip8<char> = Chip8::with_rng(StepRng::new(0, 0));
        assert_eq!(chip8.key_down(&'x'), None);
    }

    #[test]
    fn test_tick_timers() {
        let mut chip8 = chip8();
        chip8.state_mut().registers.delay_timer = 2;
        chip8.state_mut().registers.sound_timer = 2;
        assert!(chip8.tick_timers(SoundTimerMode::Countdown));
        assert_eq!(chip8.state().registers.delay_timer, 1);
        assert_eq!(chip8.state().registers.sound_timer, 1);
        assert!(chip8.tick_timers(SoundTimerMode::SinglePulse));
        assert_eq!(chip8.state().registers.delay_timer, 0);
        assert_eq!(chip8.state().registers.sound_timer, 0);
        assert!(!chip8.tick_timers(SoundTimerMode::Countdown));
    }

    #[test]
    fn test_runs_a_program() {
        let rom = [
            0x60, 0x05, // LD V0, 0x05
            0x61, 0x03, // LD V1, 0x03
            0x80, 0x14, // ADD V0, V1
            0xC2, 0xFF, // RND V2, 0xFF
            0xF3, 0x0A, // LD V3, K
            0xA3, 0x00, // LD I, 0x300
            0xF0, 0x33, // LD B, V0
            0xF0, 0x29, // LD F, V0
            0xD1, 0x15, // DRW V1, V1, 5
        ];
        let mut chip8 = chip8();
        chip8.load_rom(&rom).unwrap();
        let mut input = QueuedKeys::new(&[0x7]);
        for _ in 0..rom.len() / 2 {
            chip8.step(&mut input).unwrap();
        }

        let state = chip8.state();
        assert_eq!(state.registers.range(0x3).unwrap(), &[0x8, 0x3, 0xAB, 0x7]);
        assert_eq!(state.memory.slice(0x300, 3).unwrap(), &[0, 0, 8]);
        assert_eq!(state.registers.i, 0x28);
        assert_eq!(state.registers.pc, PROGRAM_START + rom.len() as u16);
        assert_eq!(state.registers.flag(), 0x0);
        // top row of the 8 glyph, 0xF0, drawn at (3, 3)
        assert_eq!(state.screen.frame()[3][3..7], [true, true, true, true]);
        assert!(chip8.take_redraw());
        assert!(!chip8.take_redraw());
    }

    #[test]
    fn test_machines_are_independent() {
        let handles: Vec<_> = (0..4u8)
            .map(|n| {
                thread::spawn(move || {
                    let mut chip8 = chip8();
                    chip8.load_rom(&[0x60, n, 0x70, 0x01]).unwrap();
                    let mut input = QueuedKeys::default();
                    chip8.step(&mut input).unwrap();
                    chip8.step(&mut input).unwrap();
                    chip8.state().registers.get(0x0).unwrap()
                })
            })
            .collect();

        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), n as u8 + 1);
        }
    }
}
