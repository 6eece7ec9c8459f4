// Display surface manager - one window, one rendering discipline
//
// The window carries either a hardware rendering context or an indexed
// software surface, never both. `Mode` makes any other combination
// unrepresentable; teardown and rollback fall out of ownership.

use super::palette::{Palette, VGA_PALETTE_BYTES};
use super::screenshot::{save_screenshot, ScreenshotError};
use super::surface::{Framebuffer, IndexedSurface, Rect};
use crate::error::VideoError;
use crate::platform::{Platform, PlatformWindow, RenderContext, WindowAttributes, WindowId};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Title of the game window
pub const WINDOW_TITLE: &str = "Doom 2D";

/// Which rendering discipline is live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoBackend {
    Unset,
    Hardware,
    Software,
}

/// A distinct display resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSize {
    pub width: u32,
    pub height: u32,
}

/// Remove duplicate resolutions, keeping the first occurrence of each
pub fn dedup_modes<I>(modes: I) -> Vec<ModeSize>
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let mut list: Vec<ModeSize> = Vec::new();
    for (width, height) in modes {
        let mode = ModeSize { width, height };
        if !list.contains(&mode) {
            list.push(mode);
        }
    }
    list
}

enum Mode<W, C> {
    Unset,
    Hardware { window: W, context: C },
    Software { window: W, surface: IndexedSurface },
}

fn assert_dimensions(width: u32, height: u32) {
    assert!(width > 0, "video mode width must be positive");
    assert!(height > 0, "video mode height must be positive");
}

/// Owner of the game window and whatever draws into it
pub struct Display<P: Platform> {
    platform: P,
    mode: Mode<P::Window, P::Context>,
    modes: Vec<ModeSize>,
}

impl<P: Platform> Display<P> {
    /// Wrap a platform; no window exists until a mode is set
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            mode: Mode::Unset,
            modes: Vec::new(),
        }
    }

    /// The underlying platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the underlying platform
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn backend(&self) -> VideoBackend {
        match self.mode {
            Mode::Unset => VideoBackend::Unset,
            Mode::Hardware { .. } => VideoBackend::Hardware,
            Mode::Software { .. } => VideoBackend::Software,
        }
    }

    /// Whether a window exists
    pub fn is_mode_set(&self) -> bool {
        self.window().is_some()
    }

    /// The window, if a mode is set
    pub fn window(&self) -> Option<&P::Window> {
        match &self.mode {
            Mode::Unset => None,
            Mode::Hardware { window, .. } | Mode::Software { window, .. } => Some(window),
        }
    }

    fn window_mut(&mut self) -> Option<&mut P::Window> {
        match &mut self.mode {
            Mode::Unset => None,
            Mode::Hardware { window, .. } | Mode::Software { window, .. } => Some(window),
        }
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.window().map(|w| w.id())
    }

    /// Current window size, or (0, 0) when no mode is set
    pub fn video_mode(&self) -> (u32, u32) {
        self.window().map_or((0, 0), |w| w.size())
    }

    /// Set a window with a hardware rendering context
    ///
    /// If the hardware backend is already live, the window is resized in
    /// place and the context is kept. Otherwise a new window and context
    /// are created; only once both exist is the previous mode torn down.
    ///
    /// # Errors
    /// A `VideoError` if the window or context cannot be created. Anything
    /// created on the way has been released and the previous mode is intact.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero
    pub fn set_hardware_mode(
        &mut self,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<(), VideoError> {
        assert_dimensions(width, height);
        if let Mode::Hardware { .. } = self.mode {
            self.resize_in_place(width, height, fullscreen);
            return Ok(());
        }

        let attributes = WindowAttributes::new(WINDOW_TITLE, width, height)
            .with_fullscreen(fullscreen)
            .with_hardware(true);
        let window = self.platform.create_window(&attributes).map_err(|err| {
            warn!(error = %err, "set_hardware_mode failed");
            err
        })?;
        let mut context = match self.platform.create_context(&window) {
            Ok(context) => context,
            Err(err) => {
                drop(window);
                warn!(error = %err, "set_hardware_mode failed");
                return Err(err);
            }
        };

        self.teardown();
        context.make_current();
        self.mode = Mode::Hardware { window, context };
        info!(width, height, fullscreen, "hardware video mode set");
        Ok(())
    }

    /// Set a window with an 8-bit indexed software surface
    ///
    /// Mirror of [`Display::set_hardware_mode`] for the software backend.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero
    pub fn set_software_mode(
        &mut self,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<(), VideoError> {
        assert_dimensions(width, height);
        if let Mode::Software { .. } = self.mode {
            self.resize_in_place(width, height, fullscreen);
            return Ok(());
        }

        let attributes =
            WindowAttributes::new(WINDOW_TITLE, width, height).with_fullscreen(fullscreen);
        let window = self.platform.create_window(&attributes).map_err(|err| {
            warn!(error = %err, "set_software_mode failed");
            err
        })?;
        let surface = match IndexedSurface::new(width, height) {
            Ok(surface) => surface,
            Err(err) => {
                drop(window);
                warn!(error = %err, "set_software_mode failed");
                return Err(err);
            }
        };

        self.teardown();
        self.mode = Mode::Software { window, surface };
        info!(width, height, fullscreen, "software video mode set");
        Ok(())
    }

    /// Resize the live window, carrying the palette over to a new surface
    fn resize_in_place(&mut self, width: u32, height: u32, fullscreen: bool) {
        let window = match &mut self.mode {
            Mode::Unset => panic!("resize requires an active video mode"),
            Mode::Hardware { window, .. } => window,
            Mode::Software { window, surface } => {
                if surface.size() != (width, height) {
                    match IndexedSurface::new(width, height) {
                        Ok(mut replacement) => {
                            replacement.set_palette(surface.palette().clone());
                            *surface = replacement;
                        }
                        Err(err) => warn!(error = %err, "keeping previous surface"),
                    }
                }
                window
            }
        };
        window.set_size(width, height);
        window.set_fullscreen(fullscreen);
    }

    /// Release the context or surface, then the window
    ///
    /// No-op when no mode is set.
    pub fn teardown(&mut self) {
        match std::mem::replace(&mut self.mode, Mode::Unset) {
            Mode::Unset => return,
            Mode::Hardware {
                window,
                mut context,
            } => {
                context.release_current();
                drop(context);
                drop(window);
            }
            Mode::Software { window, surface } => {
                drop(surface);
                drop(window);
            }
        }
        info!("video mode unset");
    }

    /// Distinct resolutions of the primary display, in first-seen order
    ///
    /// Rebuilt from the hardware on every call. `fullscreen` does not
    /// change the result.
    pub fn query_mode_list(&mut self, _fullscreen: bool) -> &[ModeSize] {
        self.modes = dedup_modes(self.platform.display_modes());
        &self.modes
    }

    /// Toggle the fullscreen flag; no-op when no mode is set
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        if let Some(window) = self.window_mut() {
            window.set_fullscreen(fullscreen);
        }
    }

    /// Whether the window is fullscreen; false when no mode is set
    pub fn is_fullscreen(&self) -> bool {
        self.window().is_some_and(|w| w.is_fullscreen())
    }

    fn surface_for(&mut self, op: &str) -> &mut IndexedSurface {
        match &mut self.mode {
            Mode::Software { surface, .. } => surface,
            _ => panic!("{} requires the software backend", op),
        }
    }

    /// The indexed surface
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn surface(&self) -> &IndexedSurface {
        match &self.mode {
            Mode::Software { surface, .. } => surface,
            _ => panic!("surface requires the software backend"),
        }
    }

    /// Upload a packed 6-bit VGA palette
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn upload_palette(&mut self, vga: &[u8; VGA_PALETTE_BYTES]) {
        self.surface_for("upload_palette")
            .set_palette(Palette::from_vga(vga));
    }

    /// The palette attached to the indexed surface
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn palette(&self) -> &Palette {
        self.surface().palette()
    }

    /// Direct access to the indexed pixels for the renderer
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn framebuffer(&mut self) -> Framebuffer<'_> {
        self.surface_for("framebuffer").framebuffer()
    }

    /// Blit a rectangle of the indexed surface to the window and flag it dirty
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn present_rect(&mut self, rect: Rect) -> Result<(), VideoError> {
        let Mode::Software { window, surface } = &mut self.mode else {
            panic!("present_rect requires the software backend");
        };
        let Some(rect) = rect.clip_to(surface.width(), surface.height()) else {
            return Ok(());
        };
        window.blit_indexed(surface, rect)?;
        window.update_rects(&[rect])
    }

    /// Blit the whole indexed surface
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn present(&mut self) -> Result<(), VideoError> {
        let bounds = self.surface_for("present").bounds();
        self.present_rect(bounds)
    }

    /// The hardware rendering context
    ///
    /// # Panics
    /// Panics unless the hardware backend is live
    pub fn context_mut(&mut self) -> &mut P::Context {
        match &mut self.mode {
            Mode::Hardware { context, .. } => context,
            _ => panic!("context_mut requires the hardware backend"),
        }
    }

    /// Swap the double-buffered hardware context
    ///
    /// # Panics
    /// Panics unless the hardware backend is live
    pub fn swap_buffers(&mut self) -> Result<(), VideoError> {
        match &mut self.mode {
            Mode::Hardware { context, .. } => context.swap_buffers(),
            _ => panic!("swap_buffers requires the hardware backend"),
        }
    }

    pub fn enable_text_input(&mut self) {
        self.platform.set_text_input(true);
    }

    pub fn disable_text_input(&mut self) {
        self.platform.set_text_input(false);
    }

    /// Write the indexed surface to a timestamped PNG under `dir`
    ///
    /// # Panics
    /// Panics unless the software backend is live
    pub fn save_screenshot(&self, dir: &Path) -> Result<PathBuf, ScreenshotError> {
        save_screenshot(self.surface(), dir)
    }
}

impl<P: Platform> Drop for Display<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessCall, HeadlessPlatform};

    fn display() -> (Display<HeadlessPlatform>, crate::platform::HeadlessHandle) {
        let platform = HeadlessPlatform::new();
        let handle = platform.handle();
        (Display::new(platform), handle)
    }

    #[test]
    fn test_dedup_modes_keeps_first_seen_order() {
        let modes = dedup_modes([(640, 480), (800, 600), (640, 480), (1024, 768)]);
        assert_eq!(
            modes,
            vec![
                ModeSize { width: 640, height: 480 },
                ModeSize { width: 800, height: 600 },
                ModeSize { width: 1024, height: 768 },
            ]
        );
    }

    #[test]
    fn test_starts_unset() {
        let (display, _) = display();
        assert_eq!(display.backend(), VideoBackend::Unset);
        assert!(!display.is_mode_set());
        assert_eq!(display.video_mode(), (0, 0));
        assert!(!display.is_fullscreen());
    }

    #[test]
    fn test_hardware_mode_makes_context_current() {
        let (mut display, handle) = display();
        display.set_hardware_mode(640, 480, false).unwrap();
        assert_eq!(display.backend(), VideoBackend::Hardware);
        assert!(display.context_mut().is_current());
        assert_eq!(display.video_mode(), (640, 480));

        let journal = handle.journal();
        assert!(matches!(
            journal[0],
            HeadlessCall::CreateWindow { hardware: true, .. }
        ));
    }

    #[test]
    fn test_teardown_order_and_idempotence() {
        let (mut display, handle) = display();
        display.set_hardware_mode(320, 200, false).unwrap();
        let id = display.window_id().unwrap();
        handle.take_journal();

        display.teardown();
        display.teardown();
        assert_eq!(
            handle.journal(),
            vec![
                HeadlessCall::ReleaseCurrent(id),
                HeadlessCall::DestroyContext(id),
                HeadlessCall::DestroyWindow(id),
            ]
        );
        assert_eq!(display.backend(), VideoBackend::Unset);
    }

    #[test]
    fn test_fullscreen_noop_when_unset() {
        let (mut display, handle) = display();
        display.set_fullscreen(true);
        assert!(!display.is_fullscreen());
        assert!(handle.journal().is_empty());
    }

    #[test]
    #[should_panic(expected = "width must be positive")]
    fn test_zero_width_is_precondition_failure() {
        let (mut display, _) = display();
        let _ = display.set_software_mode(0, 200, false);
    }

    #[test]
    #[should_panic(expected = "requires the software backend")]
    fn test_framebuffer_on_hardware_panics() {
        let (mut display, _) = display();
        display.set_hardware_mode(320, 200, false).unwrap();
        display.framebuffer();
    }

    #[test]
    #[should_panic(expected = "requires the hardware backend")]
    fn test_swap_on_software_panics() {
        let (mut display, _) = display();
        display.set_software_mode(320, 200, false).unwrap();
        let _ = display.swap_buffers();
    }

    #[test]
    fn test_text_input_pass_through() {
        let (mut display, handle) = display();
        display.enable_text_input();
        assert!(handle.text_input_enabled());
        display.disable_text_input();
        assert!(!handle.text_input_enabled());
    }

    #[test]
    fn test_text_input_reaches_live_window() {
        let (mut display, handle) = display();
        display.set_software_mode(320, 200, false).unwrap();
        let first = display.window_id().unwrap();
        assert_eq!(handle.window_text_input(first), Some(false));

        display.enable_text_input();
        assert_eq!(handle.window_text_input(first), Some(true));

        // A replacement window inherits the current setting
        display.set_hardware_mode(640, 480, false).unwrap();
        let second = display.window_id().unwrap();
        assert_eq!(handle.window_text_input(first), None);
        assert_eq!(handle.window_text_input(second), Some(true));

        display.disable_text_input();
        assert_eq!(handle.window_text_input(second), Some(false));
    }
}
