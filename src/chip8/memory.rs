use super::error::Chip8Error;

/// Addressable bytes, 0x000-0xFFE.
pub const MEMORY_SIZE: usize = 0xFFF;
/// Programs are loaded here; everything below belongs to the interpreter.
pub const PROGRAM_START: usize = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;

pub const FONT_ADDR: usize = 0x000;
pub const FONT_GLYPH_HEIGHT: usize = 5;

pub const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// System memory with the font baked into the reserved low region.
///
/// Reads may touch any address; writes from a running program are refused
/// below [`PROGRAM_START`] so the font can't be clobbered.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        // CHIP-8 systems had the interpreter in the first 512 bytes of memory
        // since we're emulating that we can just store the fontset there
        bytes[FONT_ADDR..FONT_ADDR + FONT_SET.len()].copy_from_slice(&FONT_SET);
        Self { bytes }
    }

    /// Copies a program image verbatim to [`PROGRAM_START`].
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        if image.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: image.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.bytes[PROGRAM_START..PROGRAM_START + image.len()].copy_from_slice(image);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Chip8Error::MemoryOutOfBounds { addr })
    }

    /// Big-endian two-byte opcode at `addr`.
    pub fn read_word(&self, addr: usize) -> Result<u16, Chip8Error> {
        let hi = self.read(addr)? as u16;
        let lo = self.read(addr + 1)? as u16;
        Ok(hi << 8 | lo)
    }

    /// `len` bytes starting at `addr`, all of which must be in range.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds { addr: MEMORY_SIZE.max(addr) });
        }
        Ok(&self.bytes[addr..end])
    }

    /// Writes `data` at `addr`. Nothing is written unless the whole range is
    /// inside program memory.
    pub fn write(&mut self, addr: usize, data: &[u8]) -> Result<(), Chip8Error> {
        if addr < PROGRAM_START {
            return Err(Chip8Error::ReservedWrite { addr });
        }
        let end = addr + data.len();
        if end > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds { addr: MEMORY_SIZE.max(addr) });
        }
        self.bytes[addr..end].copy_from_slice(data);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_at_zero_and_program_area_zeroed() {
        let m = Memory::new();
        assert_eq!(m.slice(0, 80).unwrap(), &FONT_SET[..]);
        assert!(m.as_slice()[80..].iter().all(|&b| b == 0));
        assert_eq!(m.as_slice().len(), 4095);
    }

    #[test]
    fn test_load_program_at_0x200() {
        let mut m = Memory::new();
        m.load_program(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(m.read_word(0x200), Ok(0x00E0));
        assert_eq!(m.read_word(0x202), Ok(0x1200));
    }

    #[test]
    fn test_load_program_size_limits() {
        let mut m = Memory::new();
        assert!(m.load_program(&[0xAA; 3500]).is_ok());
        assert!(m.load_program(&[0xAA; MAX_ROM_SIZE]).is_ok());
        assert_eq!(m.read(MEMORY_SIZE - 1), Ok(0xAA));
        assert_eq!(
            m.load_program(&[0; 3600]),
            Err(Chip8Error::RomTooLarge {
                size: 3600,
                max: 3583
            })
        );
    }

    #[test]
    fn test_read_word_past_end() {
        let m = Memory::new();
        assert_eq!(
            m.read_word(0xFFE),
            Err(Chip8Error::MemoryOutOfBounds { addr: 0xFFF })
        );
    }

    #[test]
    fn test_write_rejects_reserved_region() {
        let mut m = Memory::new();
        assert_eq!(
            m.write(0x50, &[1, 2, 3]),
            Err(Chip8Error::ReservedWrite { addr: 0x50 })
        );
        assert_eq!(m.slice(0, 80).unwrap(), &FONT_SET[..]);
    }

    #[test]
    fn test_write_is_all_or_nothing() {
        let mut m = Memory::new();
        assert!(m.write(0xFFD, &[1, 2, 3]).is_err());
        assert_eq!(m.read(0xFFD), Ok(0));
        assert!(m.write(0xFFC, &[1, 2, 3]).is_ok());
        assert_eq!(m.slice(0xFFC, 3).unwrap(), &[1, 2, 3]);
    }
}
