use std::fmt;

use crate::opcode::Opcode;

/// Register to register arithmetic and logic, the `8xyN` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Load,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubN,
    ShiftLeft,
}

/// Keypad tests, the `ExNN` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    SkipPressed,
    SkipNotPressed,
}

/// Timers, key waits, the address register and block memory access, the `FxNN` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    LoadDelay,
    WaitKey,
    SetDelay,
    SetSound,
    AddAddress,
    FontAddress,
    StoreBcd,
    StoreRegisters,
    LoadRegisters,
}

/// A decoded opcode with its operands pulled out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearDisplay,
    Return,
    Jump(u16),
    Call(u16),
    SkipEqByte { x: u8, byte: u8 },
    SkipNeByte { x: u8, byte: u8 },
    SkipEqReg { x: u8, y: u8 },
    LoadByte { x: u8, byte: u8 },
    AddByte { x: u8, byte: u8 },
    Alu { x: u8, y: u8, op: AluOp },
    SkipNeReg { x: u8, y: u8 },
    LoadAddress(u16),
    JumpIndexed(u16),
    Random { x: u8, byte: u8 },
    Draw { x: u8, y: u8, rows: u8 },
    Key { x: u8, op: KeyOp },
    Misc { x: u8, op: MiscOp },
    Unsupported(u16),
}

impl Instruction {
    /// Decodes an opcode.
    ///
    /// `00E0` and `00EE` are matched in full first, after that the high nibble picks the family
    /// and `8`, `E` and `F` are narrowed down again by their low nibble or byte.
    /// Anything left over is `Unsupported`.
    pub fn decode(op: Opcode) -> Instruction {
        use Instruction::*;

        let (x, y, byte, addr) = (op.x(), op.y(), op.byte(), op.addr());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => ClearDisplay,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x1, ..) => Jump(addr),
            (0x2, ..) => Call(addr),
            (0x3, ..) => SkipEqByte { x, byte },
            (0x4, ..) => SkipNeByte { x, byte },
            (0x5, ..) => SkipEqReg { x, y },
            (0x6, ..) => LoadByte { x, byte },
            (0x7, ..) => AddByte { x, byte },
            (0x8, .., n) => match Instruction::alu_op(n) {
                Some(alu) => Alu { x, y, op: alu },
                None => Unsupported(op.0),
            },
            (0x9, ..) => SkipNeReg { x, y },
            (0xA, ..) => LoadAddress(addr),
            (0xB, ..) => JumpIndexed(addr),
            (0xC, ..) => Random { x, byte },
            (0xD, .., n) => Draw { x, y, rows: n },
            (0xE, ..) => match Instruction::key_op(byte) {
                Some(key) => Key { x, op: key },
                None => Unsupported(op.0),
            },
            (0xF, ..) => match Instruction::misc_op(byte) {
                Some(misc) => Misc { x, op: misc },
                None => Unsupported(op.0),
            },
            _ => Unsupported(op.0),
        }
    }

    fn alu_op(n: u8) -> Option<AluOp> {
        let op = match n {
            0x0 => AluOp::Load,
            0x1 => AluOp::Or,
            0x2 => AluOp::And,
            0x3 => AluOp::Xor,
            0x4 => AluOp::Add,
            0x5 => AluOp::Sub,
            0x6 => AluOp::ShiftRight,
            0x7 => AluOp::SubN,
            0xE => AluOp::ShiftLeft,
            _ => return None,
        };
        Some(op)
    }

    fn key_op(byte: u8) -> Option<KeyOp> {
        match byte {
            0x9E => Some(KeyOp::SkipPressed),
            0xA1 => Some(KeyOp::SkipNotPressed),
            _ => None,
        }
    }

    fn misc_op(byte: u8) -> Option<MiscOp> {
        let op = match byte {
            0x07 => MiscOp::LoadDelay,
            0x0A => MiscOp::WaitKey,
            0x15 => MiscOp::SetDelay,
            0x18 => MiscOp::SetSound,
            0x1E => MiscOp::AddAddress,
            0x29 => MiscOp::FontAddress,
            0x33 => MiscOp::StoreBcd,
            0x55 => MiscOp::StoreRegisters,
            0x65 => MiscOp::LoadRegisters,
            _ => return None,
        };
        Some(op)
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Instruction::decode(Opcode(word))
    }
}

/// Conventional assembler mnemonics, e.g. `LD V1, 0x22`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearDisplay => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SkipEqByte { x, byte } => write!(f, "SE V{:X}, {:#04X}", x, byte),
            SkipNeByte { x, byte } => write!(f, "SNE V{:X}, {:#04X}", x, byte),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, byte } => write!(f, "LD V{:X}, {:#04X}", x, byte),
            AddByte { x, byte } => write!(f, "ADD V{:X}, {:#04X}", x, byte),
            Alu { x, y, op } => {
                let mnemonic = match op {
                    AluOp::Load => "LD",
                    AluOp::Or => "OR",
                    AluOp::And => "AND",
                    AluOp::Xor => "XOR",
                    AluOp::Add => "ADD",
                    AluOp::Sub => "SUB",
                    AluOp::ShiftRight => "SHR",
                    AluOp::SubN => "SUBN",
                    AluOp::ShiftLeft => "SHL",
                };
                write!(f, "{} V{:X}, V{:X}", mnemonic, x, y)
            }
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadAddress(addr) => write!(f, "LD I, {:#05X}", addr),
            JumpIndexed(addr) => write!(f, "JP V0, {:#05X}", addr),
            Random { x, byte } => write!(f, "RND V{:X}, {:#04X}", x, byte),
            Draw { x, y, rows } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, rows),
            Key { x, op } => match op {
                KeyOp::SkipPressed => write!(f, "SKP V{:X}", x),
                KeyOp::SkipNotPressed => write!(f, "SKNP V{:X}", x),
            },
            Misc { x, op } => match op {
                MiscOp::LoadDelay => write!(f, "LD V{:X}, DT", x),
                MiscOp::WaitKey => write!(f, "LD V{:X}, K", x),
                MiscOp::SetDelay => write!(f, "LD DT, V{:X}", x),
                MiscOp::SetSound => write!(f, "LD ST, V{:X}", x),
                MiscOp::AddAddress => write!(f, "ADD I, V{:X}", x),
                MiscOp::FontAddress => write!(f, "LD F, V{:X}", x),
                MiscOp::StoreBcd => write!(f, "LD B, V{:X}", x),
                MiscOp::StoreRegisters => write!(f, "LD [I], V{:X}", x),
                MiscOp::LoadRegisters => write!(f, "LD V{:X}, [I]", x),
            },
            Unsupported(word) => write!(f, "??? {:04X}", word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    fn decode(word: u16) -> Instruction {
        Instruction::from(word)
    }

    #[test]
    fn test_fixed_opcodes() {
        assert_eq!(decode(0x00E0), ClearDisplay);
        assert_eq!(decode(0x00EE), Return);
    }

    #[test]
    fn test_sys_call_unsupported() {
        assert_eq!(decode(0x0123), Unsupported(0x0123));
        assert_eq!(decode(0x00E1), Unsupported(0x00E1));
    }

    #[test]
    fn test_address_families() {
        assert_eq!(decode(0x1ABC), Jump(0xABC));
        assert_eq!(decode(0x2123), Call(0x123));
        assert_eq!(decode(0xA333), LoadAddress(0x333));
        assert_eq!(decode(0xB333), JumpIndexed(0x333));
    }

    #[test]
    fn test_byte_families() {
        assert_eq!(decode(0x3122), SkipEqByte { x: 0x1, byte: 0x22 });
        assert_eq!(decode(0x4122), SkipNeByte { x: 0x1, byte: 0x22 });
        assert_eq!(decode(0x6755), LoadByte { x: 0x7, byte: 0x55 });
        assert_eq!(decode(0x7722), AddByte { x: 0x7, byte: 0x22 });
        assert_eq!(decode(0xC00F), Random { x: 0x0, byte: 0x0F });
    }

    #[test]
    fn test_register_families_ignore_low_nibble() {
        assert_eq!(decode(0x5120), SkipEqReg { x: 0x1, y: 0x2 });
        assert_eq!(decode(0x5127), SkipEqReg { x: 0x1, y: 0x2 });
        assert_eq!(decode(0x9120), SkipNeReg { x: 0x1, y: 0x2 });
        assert_eq!(decode(0x912F), SkipNeReg { x: 0x1, y: 0x2 });
    }

    #[test]
    fn test_alu_family() {
        let ops = [
            (0x0, AluOp::Load),
            (0x1, AluOp::Or),
            (0x2, AluOp::And),
            (0x3, AluOp::Xor),
            (0x4, AluOp::Add),
            (0x5, AluOp::Sub),
            (0x6, AluOp::ShiftRight),
            (0x7, AluOp::SubN),
            (0xE, AluOp::ShiftLeft),
        ];
        for &(n, op) in ops.iter() {
            assert_eq!(decode(0x8120 | n), Alu { x: 0x1, y: 0x2, op });
        }
        assert_eq!(decode(0x8128), Unsupported(0x8128));
        assert_eq!(decode(0x812F), Unsupported(0x812F));
    }

    #[test]
    fn test_draw() {
        assert_eq!(
            decode(0xD015),
            Draw {
                x: 0x0,
                y: 0x1,
                rows: 0x5,
            }
        );
    }

    #[test]
    fn test_key_family() {
        let ops = [(0x9E, KeyOp::SkipPressed), (0xA1, KeyOp::SkipNotPressed)];
        for &(byte, op) in ops.iter() {
            assert_eq!(decode(0xE100 | byte), Key { x: 0x1, op });
        }
        assert_eq!(decode(0xE19F), Unsupported(0xE19F));
    }

    #[test]
    fn test_misc_family() {
        let ops = [
            (0x07, MiscOp::LoadDelay),
            (0x0A, MiscOp::WaitKey),
            (0x15, MiscOp::SetDelay),
            (0x18, MiscOp::SetSound),
            (0x1E, MiscOp::AddAddress),
            (0x29, MiscOp::FontAddress),
            (0x33, MiscOp::StoreBcd),
            (0x55, MiscOp::StoreRegisters),
            (0x65, MiscOp::LoadRegisters),
        ];
        for &(byte, op) in ops.iter() {
            assert_eq!(decode(0xF400 | byte), Misc { x: 0x4, op });
        }
        assert_eq!(decode(0xF1FF), Unsupported(0xF1FF));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(decode(0x00E0).to_string(), "CLS");
        assert_eq!(decode(0x6122).to_string(), "LD V1, 0x22");
        assert_eq!(decode(0x1555).to_string(), "JP 0x555");
        assert_eq!(decode(0x8AB5).to_string(), "SUB VA, VB");
        assert_eq!(decode(0xD015).to_string(), "DRW V0, V1, 5");
        assert_eq!(decode(0xF255).to_string(), "LD [I], V2");
        assert_eq!(decode(0x0123).to_string(), "??? 0123");
    }
}
