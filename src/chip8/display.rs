pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// 64x32 monochrome framebuffer, row-major.
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [false; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    }

    /// Coordinates wrap on both axes.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// XORs an 8-pixel-wide sprite onto the screen at (x, y), wrapping around
    /// the edges. Each byte of `sprite` is one row, MSB leftmost.
    ///
    /// Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let offset = Self::offset(x + col, y + row);
                // screen pixel is set and being unset
                collision |= self.pixels[offset];
                self.pixels[offset] ^= true;
            }
        }
        collision
    }

    fn offset(x: usize, y: usize) -> usize {
        DISPLAY_WIDTH * (y % DISPLAY_HEIGHT) + x % DISPLAY_WIDTH
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
