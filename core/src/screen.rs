use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_WIDTH};
use crate::error::{Chip8Error, Region};

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Screen
/// A 64x32 monochrome bitmap with the origin in the top left corner.
///
/// ```text
/// (0,0)   (63,0)
/// (0,31)  (63,31)
/// ```
///
/// Sprites are XORed on and wrap around to the opposite edge.
/// `redraw` is raised whenever the contents may have changed so a display only has to
/// render frames that differ.
#[derive(Clone)]
pub struct Screen {
    pixels: FrameBuffer,
    redraw: bool,
}

impl Screen {
    pub fn new() -> Self {
        Screen {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            redraw: false,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.redraw = true;
    }

    pub fn is_set(&self, x: usize, y: usize) -> Result<bool, Chip8Error> {
        Screen::check_bounds(x, y)?;
        Ok(self.pixels[y][x])
    }

    pub fn set(&mut self, x: usize, y: usize) -> Result<(), Chip8Error> {
        Screen::check_bounds(x, y)?;
        self.pixels[y][x] = true;
        self.redraw = true;
        Ok(())
    }

    /// XORs `sprite` onto the screen with its top left corner at (x, y).
    ///
    /// Each byte is one row, most significant bit leftmost. Returns whether any set pixel
    /// was erased.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for column in 0..SPRITE_WIDTH {
                if byte & (0x80 >> column) == 0 {
                    continue;
                }
                let px = (x + column) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel;
                *pixel ^= true;
            }
        }

        self.redraw = true;
        collision
    }

    /// Rows of pixels from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool; DISPLAY_WIDTH]> + '_ {
        self.pixels.iter()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.pixels
    }

    /// Returns whether the screen needs redrawing and lowers the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    fn check_bounds(x: usize, y: usize) -> Result<(), Chip8Error> {
        if x >= DISPLAY_WIDTH {
            return Err(Chip8Error::out_of_bounds(Region::Display, x));
        }
        if y >= DISPLAY_HEIGHT {
            return Err(Chip8Error::out_of_bounds(Region::Display, y));
        }
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}
