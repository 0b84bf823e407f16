use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod decode;
mod display;
mod error;
mod memory;
mod stack;
mod timers;

pub use self::decode::{AluOp, Instruction, Opcode};
pub use self::display::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use self::error::Chip8Error;
pub use self::memory::{FONT_SET, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
pub use self::stack::STACK_SIZE;
pub use self::timers::TIMER_HZ;

use self::memory::{Memory, FONT_ADDR, FONT_GLYPH_HEIGHT};
use self::stack::CallStack;
use self::timers::Timers;

/// Where the machine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, no program loaded yet.
    Idle,
    Running,
    /// Executed FX0A; the next key press goes into register `x`.
    AwaitingKey { x: usize },
    /// Stopped by a fault. There's no way back; build a new machine.
    Halted,
}

/// How the program counter moves after an instruction.
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

pub struct Chip8 {
    // CHIP-8 VM
    memory: Memory,      // system memory, font in the reserved low 512 bytes
    v: [u8; 16],         // registers V0-VE (VF is flag for some instructions)
    i: u16,              // address register
    pc: u16,             // program counter
    gfx: Framebuffer,    // pixels state
    timers: Timers,      // delay and sound, count down at 60Hz
    stack: CallStack,
    key: [bool; 16], // hex keypad state

    // emulator resources
    state: RunState,
    fault: Option<Chip8Error>,
    draw_flag: bool,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose CXKK results are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            memory: Memory::new(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START as u16, // programs start at 0x200
            gfx: Framebuffer::new(),
            timers: Timers::new(),
            stack: CallStack::new(),
            key: [false; 16],

            state: RunState::Idle,
            fault: None,
            draw_flag: false,
            rng,
        }
    }

    /// Copies a program image to 0x200 and starts the machine.
    ///
    /// Only a freshly built machine accepts a program. An oversized image
    /// halts the machine without running anything.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        if self.state != RunState::Idle {
            return Err(Chip8Error::NotReady);
        }
        if let Err(err) = self.memory.load_program(image) {
            return Err(self.halt(err));
        }
        info!("Loaded ROM [size: {}]", image.len());
        self.state = RunState::Running;
        Ok(())
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// Does nothing unless the machine is running. The fault that halts the
    /// machine is returned from the step that hit it, and stays available
    /// through [`fault`](Self::fault) afterwards.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if self.state != RunState::Running {
            return Ok(());
        }
        self.cycle().map_err(|err| self.halt(err))
    }

    /// Decays the timers by the 60Hz frames elapsed since the previous call.
    /// `now_ms` is any monotonic millisecond clock; the first call only sets
    /// the baseline.
    pub fn advance_timers(&mut self, now_ms: u64) {
        self.timers.advance(now_ms);
    }

    pub fn press_key(&mut self, key: u8) {
        self.set_key(key, true);
    }

    pub fn release_key(&mut self, key: u8) {
        self.set_key(key, false);
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        if key > 0xF {
            warn!("Ignoring key outside the hex keypad: {:#X}", key);
            return;
        }
        let was_pressed = self.key[key as usize];
        self.key[key as usize] = pressed;

        if let RunState::AwaitingKey { x } = self.state {
            if pressed && !was_pressed {
                trace!("Key {:X} pressed, resuming with V{:X}", key, x);
                self.v[x] = key;
                self.state = RunState::Running;
            }
        }
    }

    pub fn clear_keys(&mut self) {
        self.key = [false; 16];
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            RunState::Running | RunState::AwaitingKey { .. }
        )
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn fault(&self) -> Option<&Chip8Error> {
        self.fault.as_ref()
    }

    pub fn gfx(&self) -> &[bool] {
        self.gfx.pixels()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.gfx
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.gfx.get(x, y)
    }

    /// True if the screen changed since the flag was last taken.
    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.draw_flag, false)
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound > 0
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn register(&self, x: usize) -> u8 {
        self.v[x & 0xF]
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    fn halt(&mut self, err: Chip8Error) -> Chip8Error {
        error!("Halting at PC {:03X}: {}", self.pc, err);
        self.state = RunState::Halted;
        self.fault = Some(err.clone());
        err
    }

    fn cycle(&mut self) -> Result<(), Chip8Error> {
        let pc = self.pc;
        // two-byte opcodes
        let opcode = self.memory.read_word(pc as usize)?;
        let ins = Instruction::decode(opcode);
        trace!("{:03X}: {:04X} {}", pc, opcode, ins);

        // pc never exceeds 0xFFE, so none of these overflow
        let target = match self.execute(ins)? {
            Flow::Next => pc + 2,
            Flow::Skip => pc + 4,
            Flow::Jump(addr) => addr,
        };
        self.pc = Self::check_target(target)?;
        Ok(())
    }

    fn check_target(addr: u16) -> Result<u16, Chip8Error> {
        if (addr as usize) < PROGRAM_START || addr as usize >= MEMORY_SIZE {
            return Err(Chip8Error::InvalidJump { addr });
        }
        Ok(addr)
    }

    fn skip_if(cond: bool) -> Flow {
        if cond {
            Flow::Skip
        } else {
            Flow::Next
        }
    }

    fn execute(&mut self, ins: Instruction) -> Result<Flow, Chip8Error> {
        use Instruction::*;

        let flow = match ins {
            Cls => {
                self.gfx.clear();
                self.draw_flag = true;
                Flow::Next
            }
            Ret => Flow::Jump(self.stack.pop()? + 2),
            Jp { addr } => Flow::Jump(Self::check_target(addr)?),
            Call { addr } => {
                let addr = Self::check_target(addr)?;
                self.stack.push(self.pc)?;
                Flow::Jump(addr)
            }
            SeByte { x, kk } => Self::skip_if(self.v[x] == kk),
            SneByte { x, kk } => Self::skip_if(self.v[x] != kk),
            SeReg { x, y } => Self::skip_if(self.v[x] == self.v[y]),
            LdByte { x, kk } => {
                self.v[x] = kk;
                Flow::Next
            }
            AddByte { x, kk } => {
                // no carry
                self.v[x] = self.v[x].wrapping_add(kk);
                Flow::Next
            }
            Alu { op, x, y } => {
                self.alu(op, x, y);
                Flow::Next
            }
            SneReg { x, y } => Self::skip_if(self.v[x] != self.v[y]),
            LdI { addr } => {
                self.i = addr;
                Flow::Next
            }
            JpV0 { addr } => Flow::Jump(Self::check_target(self.v[0] as u16 + addr)?),
            Rnd { x, kk } => {
                self.v[x] = kk & self.rng.gen::<u8>();
                Flow::Next
            }
            Drw { x, y, n } => {
                self.draw(x, y, n)?;
                Flow::Next
            }
            Skp { x } => Self::skip_if(self.key_held(x)),
            Sknp { x } => Self::skip_if(!self.key_held(x)),
            LdVxDt { x } => {
                self.v[x] = self.timers.delay;
                Flow::Next
            }
            LdKey { x } => {
                // resumed by set_key; pc already points past this instruction
                self.state = RunState::AwaitingKey { x };
                Flow::Next
            }
            LdDtVx { x } => {
                self.timers.delay = self.v[x];
                Flow::Next
            }
            LdStVx { x } => {
                self.timers.sound = self.v[x];
                Flow::Next
            }
            AddI { x } => {
                self.i = self.i.wrapping_add(self.v[x] as u16);
                Flow::Next
            }
            LdFont { x } => {
                let glyph = (self.v[x] & 0xF) as usize;
                self.i = (FONT_ADDR + glyph * FONT_GLYPH_HEIGHT) as u16;
                Flow::Next
            }
            Bcd { x } => {
                // so 193 becomes [1, 9, 3] in memory at I
                let vx = self.v[x];
                self.memory
                    .write(self.i as usize, &[vx / 100, (vx / 10) % 10, vx % 10])?;
                Flow::Next
            }
            Store { x } => {
                self.memory.write(self.i as usize, &self.v[..=x])?;
                Flow::Next
            }
            Restore { x } => {
                let bytes = self.memory.slice(self.i as usize, x + 1)?;
                self.v[..=x].copy_from_slice(bytes);
                Flow::Next
            }
            Unsupported(word) => {
                debug!("Ignoring unsupported opcode {:04X}", word);
                Flow::Next
            }
        };
        Ok(flow)
    }

    fn alu(&mut self, op: AluOp, x: usize, y: usize) {
        // read both operands up front; VF may be x or y and is written last
        let vx = self.v[x];
        let vy = self.v[y];
        let (result, flag) = match op {
            AluOp::Ld => (vy, None),
            AluOp::Or => (vx | vy, None),
            AluOp::And => (vx & vy, None),
            AluOp::Xor => (vx ^ vy, None),
            AluOp::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            AluOp::Sub => (vx.wrapping_sub(vy), Some((vx > vy) as u8)),
            AluOp::Shr => (vx >> 1, Some(vx & 0x1)),
            AluOp::Subn => (vy.wrapping_sub(vx), Some((vy > vx) as u8)),
            AluOp::Shl => (vx << 1, Some(vx >> 7)),
        };
        self.v[x] = result;
        if let Some(flag) = flag {
            self.v[0xF] = flag;
        }
    }

    // draw a sprite at VX,VY with a width of 8 pixels and a height of N pixels
    // each row of 8 pixels is bit-coded in memory starting at I
    fn draw(&mut self, x: usize, y: usize, n: u8) -> Result<(), Chip8Error> {
        let sprite = self.memory.slice(self.i as usize, n as usize)?;
        let collision = self
            .gfx
            .draw_sprite(self.v[x] as usize, self.v[y] as usize, sprite);
        self.v[0xF] = collision as u8;
        self.draw_flag = true;
        Ok(())
    }

    fn key_held(&self, x: usize) -> bool {
        self.key[(self.v[x] & 0xF) as usize]
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
