pub use chip8::Chip8;
pub use error::{Chip8Error, Region};
pub use input::{KeyInput, QueuedKeys};
pub use instruction::{AluOp, Instruction, KeyOp, MiscOp};
pub use opcode::Opcode;
pub use registers::SoundTimerMode;
pub use screen::{FrameBuffer, Screen};
pub use state::State;

mod chip8;
pub mod constants;
mod error;
mod input;
mod instruction;
pub mod keyboard;
pub mod memory;
mod opcode;
mod operations;
pub mod registers;
mod screen;
pub mod stack;
pub mod state;
