use std::fmt;

/// Operand fields of a raw 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }

    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }
}

/// Register ALU operations (8XY*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Ld,
    Or,
    And,
    Xor,
    Add,
    Sub,
    Shr,
    Subn,
    Shl,
}

/// Every operation the interpreter understands, decoded from one word.
///
/// Words that select a family but no operation within it decode to
/// [`Instruction::Unsupported`] and execute as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Cls,                                 // 00E0
    Ret,                                 // 00EE
    Jp { addr: u16 },                    // 1NNN
    Call { addr: u16 },                  // 2NNN
    SeByte { x: usize, kk: u8 },         // 3XKK
    SneByte { x: usize, kk: u8 },        // 4XKK
    SeReg { x: usize, y: usize },        // 5XY0
    LdByte { x: usize, kk: u8 },         // 6XKK
    AddByte { x: usize, kk: u8 },        // 7XKK
    Alu { op: AluOp, x: usize, y: usize }, // 8XY*
    SneReg { x: usize, y: usize },       // 9XY0
    LdI { addr: u16 },                   // ANNN
    JpV0 { addr: u16 },                  // BNNN
    Rnd { x: usize, kk: u8 },            // CXKK
    Drw { x: usize, y: usize, n: u8 },   // DXYN
    Skp { x: usize },                    // EX9E
    Sknp { x: usize },                   // EXA1
    LdVxDt { x: usize },                 // FX07
    LdKey { x: usize },                  // FX0A
    LdDtVx { x: usize },                 // FX15
    LdStVx { x: usize },                 // FX18
    AddI { x: usize },                   // FX1E
    LdFont { x: usize },                 // FX29
    Bcd { x: usize },                    // FX33
    Store { x: usize },                  // FX55
    Restore { x: usize },                // FX65
    Unsupported(u16),
}

impl Instruction {
    pub fn decode(word: u16) -> Self {
        use Instruction::*;

        let op = Opcode(word);
        let (x, y) = (op.x(), op.y());
        match op.family() {
            0x0 => match word {
                0x00E0 => Cls,
                0x00EE => Ret,
                // 0NNN machine code routines aren't supported
                _ => Unsupported(word),
            },
            0x1 => Jp { addr: op.nnn() },
            0x2 => Call { addr: op.nnn() },
            0x3 => SeByte { x, kk: op.kk() },
            0x4 => SneByte { x, kk: op.kk() },
            0x5 => SeReg { x, y },
            0x6 => LdByte { x, kk: op.kk() },
            0x7 => AddByte { x, kk: op.kk() },
            0x8 => {
                let alu = match op.n() {
                    0x0 => AluOp::Ld,
                    0x1 => AluOp::Or,
                    0x2 => AluOp::And,
                    0x3 => AluOp::Xor,
                    0x4 => AluOp::Add,
                    0x5 => AluOp::Sub,
                    0x6 => AluOp::Shr,
                    0x7 => AluOp::Subn,
                    0xE => AluOp::Shl,
                    _ => return Unsupported(word),
                };
                Alu { op: alu, x, y }
            }
            0x9 => SneReg { x, y },
            0xA => LdI { addr: op.nnn() },
            0xB => JpV0 { addr: op.nnn() },
            0xC => Rnd { x, kk: op.kk() },
            0xD => Drw { x, y, n: op.n() },
            0xE => match op.kk() {
                0x9E => Skp { x },
                0xA1 => Sknp { x },
                _ => Unsupported(word),
            },
            _ => match op.kk() {
                0x07 => LdVxDt { x },
                0x0A => LdKey { x },
                0x15 => LdDtVx { x },
                0x18 => LdStVx { x },
                0x1E => AddI { x },
                0x29 => LdFont { x },
                0x33 => Bcd { x },
                0x55 => Store { x },
                0x65 => Restore { x },
                _ => Unsupported(word),
            },
        }
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self::decode(word)
    }
}

// Conventional assembler mnemonics, used for instruction tracing.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp { addr } => write!(f, "JP {:03X}", addr),
            Call { addr } => write!(f, "CALL {:03X}", addr),
            SeByte { x, kk } => write!(f, "SE V{:X}, {:02X}", x, kk),
            SneByte { x, kk } => write!(f, "SNE V{:X}, {:02X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, kk } => write!(f, "LD V{:X}, {:02X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:02X}", x, kk),
            Alu { op, x, y } => {
                let name = match op {
                    AluOp::Ld => "LD",
                    AluOp::Or => "OR",
                    AluOp::And => "AND",
                    AluOp::Xor => "XOR",
                    AluOp::Add => "ADD",
                    AluOp::Sub => "SUB",
                    AluOp::Shr => "SHR",
                    AluOp::Subn => "SUBN",
                    AluOp::Shl => "SHL",
                };
                write!(f, "{} V{:X}, V{:X}", name, x, y)
            }
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { addr } => write!(f, "LD I, {:03X}", addr),
            JpV0 { addr } => write!(f, "JP V0, {:03X}", addr),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:02X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdKey { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Restore { x } => write!(f, "LD V{:X}, [I]", x),
            Unsupported(word) => write!(f, "??? {:04X}", word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_fields() {
        let op = Opcode(0xD7A5);
        assert_eq!(op.family(), 0xD);
        assert_eq!(op.nnn(), 0x7A5);
        assert_eq!(op.x(), 0x7);
        assert_eq!(op.y(), 0xA);
        assert_eq!(op.kk(), 0xA5);
        assert_eq!(op.n(), 0x5);
    }

    #[test]
    fn test_decode_families() {
        assert_eq!(Instruction::decode(0x00E0), Instruction::Cls);
        assert_eq!(Instruction::decode(0x00EE), Instruction::Ret);
        assert_eq!(Instruction::decode(0x1ABC), Instruction::Jp { addr: 0xABC });
        assert_eq!(Instruction::decode(0x2345), Instruction::Call { addr: 0x345 });
        assert_eq!(
            Instruction::decode(0x8FE4),
            Instruction::Alu {
                op: AluOp::Add,
                x: 0xF,
                y: 0xE
            }
        );
        assert_eq!(
            Instruction::decode(0xD125),
            Instruction::Drw { x: 1, y: 2, n: 5 }
        );
        assert_eq!(Instruction::decode(0xE39E), Instruction::Skp { x: 3 });
        assert_eq!(Instruction::decode(0xF30A), Instruction::LdKey { x: 3 });
        assert_eq!(Instruction::decode(0xF065), Instruction::Restore { x: 0 });
    }

    #[test]
    fn test_decode_unsupported_within_family() {
        for &word in &[0x0123, 0x0000, 0x8008, 0x800F, 0xE000, 0xF0FF] {
            assert_eq!(Instruction::decode(word), Instruction::Unsupported(word));
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x6A2F).to_string(), "LD VA, 2F");
        assert_eq!(Instruction::decode(0x8017).to_string(), "SUBN V0, V1");
        assert_eq!(Instruction::decode(0xF233).to_string(), "LD B, V2");
        assert_eq!(Instruction::decode(0x0123).to_string(), "??? 0123");
    }
}
