use rand::{Rng, RngCore};

use crate::constants::{FONT_SPRITE_HEIGHT, FONT_START, KEY_COUNT};
use crate::error::{Chip8Error, Region};
use crate::input::KeyInput;
use crate::instruction::{AluOp, Instruction, KeyOp, MiscOp};
use crate::state::State;

/// Executes a single decoded instruction against `state`.
///
/// The program counter is expected to already point past the instruction.
/// `rng` feeds `RND` and `input` is only consulted by `LD Vx, K`, which blocks on it.
///
/// Unsupported instructions are logged and otherwise ignored. Any other error aborts the
/// instruction and is returned.
pub fn execute<K: PartialEq>(
    state: &mut State<K>,
    rng: &mut dyn RngCore,
    input: &mut dyn KeyInput,
    instruction: Instruction,
) -> Result<(), Chip8Error> {
    log::trace!(
        "{} i{:04X} pc{:04X} sp{:X}",
        instruction,
        state.registers.i,
        state.registers.pc,
        state.stack.pointer()
    );

    match instruction {
        Instruction::ClearDisplay => cls(state),
        Instruction::Return => ret(state)?,
        Instruction::Jump(addr) => jump(state, addr),
        Instruction::Call(addr) => call(state, addr)?,
        Instruction::SkipEqByte { x, byte } => {
            let vx = state.registers.get(x)?;
            skip_if(state, vx == byte)
        }
        Instruction::SkipNeByte { x, byte } => {
            let vx = state.registers.get(x)?;
            skip_if(state, vx != byte)
        }
        Instruction::SkipEqReg { x, y } => {
            let (vx, vy) = (state.registers.get(x)?, state.registers.get(y)?);
            skip_if(state, vx == vy)
        }
        Instruction::LoadByte { x, byte } => state.registers.set(x, byte)?,
        Instruction::AddByte { x, byte } => add(state, x, byte)?,
        Instruction::Alu { x, y, op } => alu(state, x, y, op)?,
        Instruction::SkipNeReg { x, y } => {
            let (vx, vy) = (state.registers.get(x)?, state.registers.get(y)?);
            skip_if(state, vx != vy)
        }
        Instruction::LoadAddress(addr) => state.registers.i = addr,
        Instruction::JumpIndexed(addr) => jumpi(state, addr)?,
        Instruction::Random { x, byte } => rnd(state, rng, x, byte)?,
        Instruction::Draw { x, y, rows } => draw(state, x, y, rows)?,
        Instruction::Key { x, op } => key(state, x, op)?,
        Instruction::Misc { x, op } => misc(state, input, x, op)?,
        Instruction::Unsupported(word) => log::warn!(
            "{} at {:#05X}, skipping",
            Chip8Error::UnsupportedOpcode(word),
            state.registers.pc.wrapping_sub(2)
        ),
    }
    Ok(())
}

/// clear
fn cls<K>(state: &mut State<K>) {
    state.screen.clear();
}

/// PC = STACK.pop()
fn ret<K>(state: &mut State<K>) -> Result<(), Chip8Error> {
    state.registers.pc = state.stack.pop()?;
    Ok(())
}

/// PC = addr
fn jump<K>(state: &mut State<K>, addr: u16) {
    state.registers.pc = addr;
}

/// STACK.push(PC); PC = addr
fn call<K>(state: &mut State<K>, addr: u16) -> Result<(), Chip8Error> {
    state.stack.push(state.registers.pc)?;
    state.registers.pc = addr;
    Ok(())
}

/// if condition then PC += 2
fn skip_if<K>(state: &mut State<K>, condition: bool) {
    if condition {
        state.registers.skip();
    }
}

/// Vx += kk
/// Overflow is dropped and VF is left alone
fn add<K>(state: &mut State<K>, x: u8, byte: u8) -> Result<(), Chip8Error> {
    let vx = state.registers.get(x)?;
    state.registers.set(x, vx.wrapping_add(byte))
}

/// Vx = Vx op Vy, with VF set by the arithmetic ones.
/// VF is written after Vx so the flag survives when x is F.
fn alu<K>(state: &mut State<K>, x: u8, y: u8, op: AluOp) -> Result<(), Chip8Error> {
    let vx = state.registers.get(x)?;
    let vy = state.registers.get(y)?;

    let (result, flag) = match op {
        AluOp::Load => (vy, None),
        AluOp::Or => (vx | vy, None),
        AluOp::And => (vx & vy, None),
        AluOp::Xor => (vx ^ vy, None),
        // VF = carry
        AluOp::Add => {
            let (sum, carry) = vx.overflowing_add(vy);
            (sum, Some(carry))
        }
        // VF = not borrow
        AluOp::Sub => (vx.wrapping_sub(vy), Some(vx > vy)),
        // VF = lsb
        AluOp::ShiftRight => (vx >> 1, Some(vx & 0x01 != 0)),
        // VF = not borrow
        AluOp::SubN => (vy.wrapping_sub(vx), Some(vx < vy)),
        // VF = msb
        AluOp::ShiftLeft => (vx << 1, Some(vx & 0x80 != 0)),
    };

    state.registers.set(x, result)?;
    if let Some(flag) = flag {
        state.registers.set_flag(flag);
    }
    Ok(())
}

/// PC = V0 + addr
fn jumpi<K>(state: &mut State<K>, addr: u16) -> Result<(), Chip8Error> {
    let v0 = state.registers.get(0x0)?;
    state.registers.pc = addr.wrapping_add(u16::from(v0));
    Ok(())
}

/// Vx = rand_byte & kk
fn rnd<K>(state: &mut State<K>, rng: &mut dyn RngCore, x: u8, byte: u8) -> Result<(), Chip8Error> {
    let rand_byte: u8 = rng.gen();
    state.registers.set(x, rand_byte & byte)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n byte sprite at I onto the screen at (Vx, Vy), VF = collision
fn draw<K>(state: &mut State<K>, x: u8, y: u8, rows: u8) -> Result<(), Chip8Error> {
    let vx = state.registers.get(x)?;
    let vy = state.registers.get(y)?;
    let sprite = state
        .memory
        .slice(state.registers.i as usize, rows as usize)?;
    let collision = state.screen.draw_sprite(vx as usize, vy as usize, sprite);
    state.registers.set_flag(collision);
    Ok(())
}

/// if Vx.pressed then PC += 2
/// if !Vx.pressed then PC += 2
fn key<K: PartialEq>(state: &mut State<K>, x: u8, op: KeyOp) -> Result<(), Chip8Error> {
    let vx = state.registers.get(x)?;
    let pressed = state.keyboard.is_pressed(vx)?;
    let skip = match op {
        KeyOp::SkipPressed => pressed,
        KeyOp::SkipNotPressed => !pressed,
    };
    skip_if(state, skip);
    Ok(())
}

fn misc<K>(
    state: &mut State<K>,
    input: &mut dyn KeyInput,
    x: u8,
    op: MiscOp,
) -> Result<(), Chip8Error> {
    let vx = state.registers.get(x)?;
    let i = state.registers.i;

    match op {
        // Vx = DT
        MiscOp::LoadDelay => {
            let delay = state.registers.delay_timer;
            state.registers.set(x, delay)?;
        }
        // Vx = next key press
        MiscOp::WaitKey => {
            log::debug!("waiting for a key press for V{:X}", x);
            let key = input.wait_for_key()?;
            if key as usize >= KEY_COUNT {
                return Err(Chip8Error::out_of_bounds(Region::Keyboard, key as usize));
            }
            log::debug!("key {:X} pressed", key);
            state.registers.set(x, key)?;
        }
        // DT = Vx
        MiscOp::SetDelay => state.registers.delay_timer = vx,
        // ST = Vx
        MiscOp::SetSound => state.registers.sound_timer = vx,
        // I += Vx
        MiscOp::AddAddress => state.registers.i = i.wrapping_add(u16::from(vx)),
        // I = address of the font glyph for Vx
        MiscOp::FontAddress => state.registers.i = FONT_START + u16::from(vx) * FONT_SPRITE_HEIGHT,
        // mem[I..I+3] = bcd(Vx)
        MiscOp::StoreBcd => {
            let bcd = [vx / 100, vx / 10 % 10, vx % 10];
            state.memory.write(i as usize, &bcd)?;
        }
        // mem[I..=I+x] = V0..=Vx
        MiscOp::StoreRegisters => {
            let values = state.registers.range(x)?;
            state.memory.write(i as usize, values)?;
        }
        // V0..=Vx = mem[I..=I+x]
        MiscOp::LoadRegisters => {
            let values = state.memory.slice(i as usize, x as usize + 1)?;
            state.registers.load_range(values)?;
        }
    }
    Ok(())
}
