// Screenshot functionality
//
// Resolves the indexed surface through its palette and saves it as a PNG.

use super::surface::IndexedSurface;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while saving a screenshot
#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),
}

/// Save the surface as `screenshot_<timestamp>.png` inside `dir`
///
/// The directory is created if missing.
///
/// # Arguments
///
/// * `surface` - The indexed surface to capture
/// * `dir` - Destination directory
///
/// # Returns
///
/// Path of the written file
pub fn save_screenshot(surface: &IndexedSurface, dir: &Path) -> Result<PathBuf, ScreenshotError> {
    fs::create_dir_all(dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
    let file_path = dir.join(format!("screenshot_{}.png", timestamp));

    save_png(
        &file_path,
        &surface.to_rgb(),
        surface.width(),
        surface.height(),
    )?;
    Ok(file_path)
}

fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    Ok(())
}
