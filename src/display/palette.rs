// VGA palette - 256 colours for the indexed software surface
//
// The game ships its palette as 6-bit DAC intensities (0-63 per channel),
// the way the VGA hardware took them. They are widened to 8 bits on upload.

/// Number of entries in an indexed palette
pub const PALETTE_SIZE: usize = 256;

/// Size in bytes of a packed 6-bit VGA palette (256 RGB triples)
pub const VGA_PALETTE_BYTES: usize = PALETTE_SIZE * 3;

/// One 8-bit-per-channel palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Create a colour from 8-bit channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to RGBA format expected by the pixels crate
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }
}

/// Widen a 6-bit VGA intensity to 8 bits
///
/// Values above 63 are clamped to 63 first.
#[inline]
pub fn vga_to_8bit(value: u8) -> u8 {
    (value.min(63) as u16 * 255 / 63) as u8
}

/// 256-entry colour table attached to an indexed surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Palette {
    /// Create an all-black palette
    pub fn new() -> Self {
        Self {
            colors: [Color::BLACK; PALETTE_SIZE],
        }
    }

    /// Build a palette from packed 6-bit VGA triples
    ///
    /// # Arguments
    /// * `vga` - 768 bytes: R, G, B for entry 0, then entry 1, and so on
    pub fn from_vga(vga: &[u8; VGA_PALETTE_BYTES]) -> Self {
        let mut palette = Self::new();
        for (color, rgb) in palette.colors.iter_mut().zip(vga.chunks_exact(3)) {
            *color = Color::new(vga_to_8bit(rgb[0]), vga_to_8bit(rgb[1]), vga_to_8bit(rgb[2]));
        }
        palette
    }

    /// Get the colour for a palette index
    #[inline]
    pub fn color(&self, index: u8) -> Color {
        self.colors[index as usize]
    }

    /// Set the colour for a palette index
    pub fn set_color(&mut self, index: u8, color: Color) {
        self.colors[index as usize] = color;
    }

    /// All 256 entries
    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
