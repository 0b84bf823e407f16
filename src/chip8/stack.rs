use super::error::Chip8Error;

pub const STACK_SIZE: usize = 16;

/// Bounded stack of return addresses for CALL/RET.
#[derive(Debug, Clone)]
pub struct CallStack {
    stack: [u16; STACK_SIZE],
    sp: usize, // number of live entries
}

impl CallStack {
    pub fn new() -> Self {
        Self {
            stack: [0; STACK_SIZE],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        if self.sp >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { depth: STACK_SIZE });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        let addr = self.stack[self.sp];
        self.stack[self.sp] = 0;
        Ok(addr)
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
