use thiserror::Error;

/// Every way a CHIP-8 program (or its loader) can stop the machine.
///
/// All of these are terminal: once [`Chip8`](super::Chip8) reports one it stays
/// halted and keeps the fault around for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("machine cannot load a program in its current state")]
    NotReady,

    #[error("program counter directed outside program memory: {addr:#06X}")]
    InvalidJump { addr: u16 },

    #[error("call stack overflow: more than {depth} nested calls")]
    StackOverflow { depth: usize },

    #[error("call stack underflow: return with no active subroutine")]
    StackUnderflow,

    #[error("memory access out of bounds at {addr:#06X}")]
    MemoryOutOfBounds { addr: usize },

    #[error("write into reserved interpreter memory at {addr:#06X}")]
    ReservedWrite { addr: usize },
}
