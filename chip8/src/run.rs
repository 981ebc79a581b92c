use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use chip8_core::constants::TIMER_FREQUENCY;
use chip8_core::{Chip8, Chip8Error, KeyInput, SoundTimerMode};
use chip8_display::Display;

use crate::keymap::{self, KEYMAP};

/// How the driver paces the machine
pub struct Config {
    pub scale: u32,
    /// CPU cycles per second
    pub clock_speed: u64,
    pub sound_timer: SoundTimerMode,
}

/// A host keyboard event the driver cares about
#[derive(Debug, Clone, Copy, PartialEq)]
enum HostKey {
    Quit,
    Down(Keycode),
    Up(Keycode),
}

/// Window close and Escape both quit
fn host_key(event: &Event) -> Option<HostKey> {
    match *event {
        Event::Quit { .. }
        | Event::KeyDown {
            keycode: Some(Keycode::Escape),
            ..
        } => Some(HostKey::Quit),
        Event::KeyDown {
            keycode: Some(key), ..
        } => Some(HostKey::Down(key)),
        Event::KeyUp {
            keycode: Some(key), ..
        } => Some(HostKey::Up(key)),
        _ => None,
    }
}

/// Consumes `events` until a mapped key goes down and returns its code.
///
/// Every key event consumed along the way is pushed onto `pending` so the machine's
/// keyboard can catch up once the waiting instruction has finished.
fn await_key<I>(events: I, pending: &mut Vec<HostKey>) -> Result<u8, Chip8Error>
where
    I: IntoIterator<Item = HostKey>,
{
    for event in events {
        match event {
            HostKey::Quit => return Err(Chip8Error::InputClosed),
            HostKey::Down(key) => {
                pending.push(event);
                if let Some(code) = keymap::code_of(key) {
                    return Ok(code);
                }
            }
            HostKey::Up(_) => pending.push(event),
        }
    }
    Err(Chip8Error::InputClosed)
}

/// Applies key events held back during a key wait, oldest first
fn replay(chip8: &mut Chip8<Keycode>, pending: &mut Vec<HostKey>) {
    for event in pending.drain(..) {
        match event {
            HostKey::Down(key) => {
                chip8.key_down(&key);
            }
            HostKey::Up(key) => {
                chip8.key_up(&key);
            }
            HostKey::Quit => {}
        }
    }
}

/// Blocks on the SDL event queue until a mapped key goes down.
///
/// The machine is mutably borrowed for the whole wait, so the returned key is resolved
/// through the host keymap directly and every key event seen is left in `pending`
/// for `replay`.
struct SdlKeyWait<'a> {
    events: &'a mut EventPump,
    pending: &'a mut Vec<HostKey>,
}

impl KeyInput for SdlKeyWait<'_> {
    fn wait_for_key(&mut self) -> Result<u8, Chip8Error> {
        let events = self.events.wait_iter().filter_map(|event| host_key(&event));
        await_key(events, self.pending)
    }
}

pub fn run(rom: &Path, mut chip8: Chip8<Keycode>, config: Config) -> Result<(), Box<dyn Error>> {
    chip8.set_keymap(KEYMAP);

    // Load ROM
    let image = fs::read(rom)?;
    chip8.load_rom(&image)?;
    log::info!("loaded {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut display = Display::new(&sdl, config.scale)?;
    let mut events = sdl.event_pump()?;

    // Set initial timing
    let cycle_time = Duration::from_nanos(1_000_000_000 / config.clock_speed.max(1));
    let timer_period = Duration::from_nanos(1_000_000_000 / TIMER_FREQUENCY);
    let mut last_cycle = Instant::now();
    let mut last_tick = Instant::now();
    let mut beeping = false;
    let mut pending = Vec::new();

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match host_key(&event) {
                Some(HostKey::Quit) => break 'event,
                Some(HostKey::Down(key)) => {
                    chip8.key_down(&key);
                }
                Some(HostKey::Up(key)) => {
                    chip8.key_up(&key);
                }
                None => continue,
            };
        }

        // Update state
        let mut input = SdlKeyWait {
            events: &mut events,
            pending: &mut pending,
        };
        let result = chip8.step(&mut input);
        replay(&mut chip8, &mut pending);
        match result {
            Ok(()) => {}
            Err(Chip8Error::InputClosed) => break 'event,
            Err(e) => {
                log::error!(
                    "halting at {:#05X}: {}",
                    chip8.state().registers.pc.wrapping_sub(2),
                    e
                );
                return Err(e.into());
            }
        }

        while last_tick.elapsed() >= timer_period {
            last_tick += timer_period;
            let sounding = chip8.tick_timers(config.sound_timer);
            if sounding != beeping {
                log::debug!("sound {}", if sounding { "on" } else { "off" });
                beeping = sounding;
            }
        }

        // If the screen changed, render the current frame
        if chip8.take_redraw() {
            display.render(chip8.screen())?;
        }

        // Handle timing
        let elapsed_cycle_time = last_cycle.elapsed();
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    log::info!("exiting");
    Ok(())
}
