//! CHIP-8 interpreter core.
//!
//! [`Chip8`] owns the whole machine: memory, registers, call stack, framebuffer,
//! keypad and timers. A host loads a program image once and then drives the
//! machine by calling [`Chip8::step`] at its chosen instruction rate and
//! [`Chip8::advance_timers`] with a monotonic millisecond clock.

pub mod chip8;

pub use crate::chip8::{
    Chip8, Chip8Error, Instruction, RunState, DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE,
    PROGRAM_START,
};
