mod keymap;
mod run;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use chip8_core::constants::CLOCK_SPEED;
use chip8_core::{Chip8, SoundTimerMode};

use crate::run::Config;

/// Runs a Chip-8 ROM in an SDL window
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the ROM image
    rom: PathBuf,

    /// Size of each Chip-8 pixel in window pixels
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// CPU cycles per second
    #[arg(short, long, default_value_t = 1_000_000_000 / CLOCK_SPEED)]
    clock_speed: u64,

    /// How the sound timer behaves once set
    #[arg(long, value_enum, default_value_t = SoundTimer::Countdown)]
    sound_timer: SoundTimer,

    /// Seed for the random instruction, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SoundTimer {
    /// Beep until the timer counts down to zero
    Countdown,
    /// Beep for a single tick whatever the timer was set to
    SinglePulse,
}

impl From<SoundTimer> for SoundTimerMode {
    fn from(mode: SoundTimer) -> Self {
        match mode {
            SoundTimer::Countdown => SoundTimerMode::Countdown,
            SoundTimer::SinglePulse => SoundTimerMode::SinglePulse,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    let chip8 = match args.seed {
        Some(seed) => {
            log::info!("seeding random instruction with {}", seed);
            Chip8::with_rng(StdRng::seed_from_u64(seed))
        }
        None => Chip8::new(),
    };
    let config = Config {
        scale: args.scale,
        clock_speed: args.clock_speed,
        sound_timer: args.sound_timer.into(),
    };

    run::run(&args.rom, chip8, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["chip8", "pong.ch8"]).unwrap();
        assert_eq!(args.rom, PathBuf::from("pong.ch8"));
        assert_eq!(args.scale, 10);
        assert_eq!(args.clock_speed, 500);
        assert_eq!(args.sound_timer, SoundTimer::Countdown);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "chip8",
            "pong.ch8",
            "--scale",
            "4",
            "--clock-speed",
            "700",
            "--sound-timer",
            "single-pulse",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(args.scale, 4);
        assert_eq!(args.clock_speed, 700);
        let mode = SoundTimerMode::from(args.sound_timer);
        assert_eq!(mode, SoundTimerMode::SinglePulse);
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn test_args_require_rom() {
        assert!(Args::try_parse_from(["chip8"]).is_err());
    }
}
