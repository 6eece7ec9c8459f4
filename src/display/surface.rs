// Indexed surface - 8-bit-per-pixel buffer with an attached palette
//
// The software renderer draws palette indices straight into this buffer.
// Rows are padded to a 4-byte pitch, like the hardware surfaces the
// renderer was written against.

use super::palette::Palette;
use crate::error::VideoError;

/// Rectangle in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect with a `width` x `height` area anchored at the origin
    ///
    /// # Returns
    /// The clipped rectangle, or `None` if nothing remains
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width as i64).min(width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(
            x0 as i32,
            y0 as i32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

/// Direct view of the pixel storage handed to the renderer
///
/// Borrowing ties the view to the surface: it cannot outlive the next
/// resize or teardown.
pub struct Framebuffer<'a> {
    pub pixels: &'a mut [u8],
    pub width: u32,
    pub height: u32,
    /// Bytes per row, at least `width`
    pub pitch: usize,
}

/// 8-bit indexed pixel buffer
#[derive(Debug, Clone)]
pub struct IndexedSurface {
    width: u32,
    height: u32,
    pitch: usize,
    pixels: Vec<u8>,
    palette: Palette,
}

impl IndexedSurface {
    /// Allocate a zero-filled surface with an all-black palette
    ///
    /// # Errors
    /// `VideoError::SurfaceAllocation` if the buffer cannot be reserved
    pub fn new(width: u32, height: u32) -> Result<Self, VideoError> {
        let failed = || VideoError::SurfaceAllocation { width, height };
        let pitch = (width as usize).checked_add(3).ok_or_else(failed)? & !3;
        let len = pitch.checked_mul(height as usize).ok_or_else(failed)?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| failed())?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pitch,
            pixels,
            palette: Palette::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Surface size as (width, height)
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Full-surface rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Raw pixel rows, including pitch padding
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable view for the renderer
    pub fn framebuffer(&mut self) -> Framebuffer<'_> {
        Framebuffer {
            pixels: &mut self.pixels,
            width: self.width,
            height: self.height,
            pitch: self.pitch,
        }
    }

    /// Palette index at a pixel
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);
        self.pixels[y as usize * self.pitch + x as usize]
    }

    /// Set the palette index at a pixel
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, index: u8) {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);
        self.pixels[y as usize * self.pitch + x as usize] = index;
    }

    /// Fill the whole surface with one palette index
    pub fn clear(&mut self, index: u8) {
        self.pixels.fill(index);
    }

    /// Resolve a rectangle through the palette into an RGBA destination
    ///
    /// The destination is a tightly packed RGBA buffer of the same
    /// dimensions as this surface; only pixels inside `rect` are written.
    ///
    /// # Panics
    /// Panics if `dest` is smaller than `width * height * 4` bytes
    pub fn blit_rgba(&self, rect: Rect, dest: &mut [u8]) {
        let row_bytes = self.width as usize * 4;
        assert!(
            dest.len() >= row_bytes * self.height as usize,
            "Output buffer too small for RGBA conversion"
        );
        let Some(rect) = rect.clip_to(self.width, self.height) else {
            return;
        };

        let (x, w) = (rect.x as usize, rect.width as usize);
        for y in rect.y as usize..rect.y as usize + rect.height as usize {
            let src = &self.pixels[y * self.pitch + x..y * self.pitch + x + w];
            let dst = &mut dest[y * row_bytes + x * 4..y * row_bytes + (x + w) * 4];
            for (&index, out) in src.iter().zip(dst.chunks_exact_mut(4)) {
                out.copy_from_slice(&self.palette.color(index).to_rgba());
            }
        }
    }

    /// Resolve the whole surface through the palette into packed RGB
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for row in self.pixels.chunks_exact(self.pitch.max(1)).take(self.height as usize) {
            for &index in &row[..self.width as usize] {
                let color = self.palette.color(index);
                rgb.extend_from_slice(&[color.r, color.g, color.b]);
            }
        }
        rgb
    }
}
