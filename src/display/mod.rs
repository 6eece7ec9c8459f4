// Display module - indexed software surface and the window that shows it
//
// This module provides:
// - 256-colour VGA palette handling
// - The 8-bit indexed surface the software renderer draws into
// - The display surface manager (hardware context XOR software surface)
// - PNG screenshots of the indexed surface

pub mod manager;
pub mod palette;
pub mod screenshot;
pub mod surface;

pub use manager::{dedup_modes, Display, ModeSize, VideoBackend, WINDOW_TITLE};
pub use palette::{vga_to_8bit, Color, Palette, PALETTE_SIZE, VGA_PALETTE_BYTES};
pub use screenshot::{save_screenshot, ScreenshotError};
pub use surface::{Framebuffer, IndexedSurface, Rect};
