// Platform module - the seam between the display/event code and a backend
//
// This module provides:
// - The events the pump understands (`PlatformEvent`)
// - Window, rendering-context and platform traits
// - A desktop backend (winit + pixels) and a scripted headless backend

#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod desktop;
pub mod headless;

#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub use desktop::DesktopPlatform;
pub use headless::{HeadlessCall, HeadlessHandle, HeadlessPlatform};

use crate::display::{IndexedSurface, Rect};
use crate::error::VideoError;
use winit::keyboard::PhysicalKey;

/// Identifier of a platform window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Window notifications the pump reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// The user resized the window
    Resized { width: u32, height: u32 },
    /// The window's close control was used
    CloseRequested,
}

/// One hardware event, already detached from the backend's own types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent {
    /// Process-level quit request
    Quit,
    /// Notification addressed to a specific window
    Window { window_id: WindowId, event: WindowEvent },
    /// Key transition
    Key { key: PhysicalKey, down: bool },
    /// One text-input unit as raw UTF-8 bytes
    Text(Vec<u8>),
}

/// What to create when a video mode is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowAttributes {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub fullscreen: bool,
    /// The window will carry a hardware rendering context
    pub hardware: bool,
}

impl WindowAttributes {
    /// Resizable window of the given size
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            resizable: true,
            fullscreen: false,
            hardware: false,
        }
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_hardware(mut self, hardware: bool) -> Self {
        self.hardware = hardware;
        self
    }
}

/// A window owned by the display surface manager
///
/// Dropping the value destroys the window.
pub trait PlatformWindow {
    fn id(&self) -> WindowId;

    /// Current client-area size
    fn size(&self) -> (u32, u32);

    fn set_size(&mut self, width: u32, height: u32);

    fn set_fullscreen(&mut self, fullscreen: bool);

    fn is_fullscreen(&self) -> bool;

    /// Copy a rectangle of an indexed surface onto the window's native surface
    fn blit_indexed(&mut self, surface: &IndexedSurface, rect: Rect) -> Result<(), VideoError>;

    /// Push dirty rectangles of the native surface to the screen
    fn update_rects(&mut self, rects: &[Rect]) -> Result<(), VideoError>;
}

/// Hardware rendering context attached to a window
///
/// Dropping the value releases the context.
pub trait RenderContext {
    fn make_current(&mut self);

    fn release_current(&mut self);

    fn is_current(&self) -> bool;

    /// Present the back buffer
    fn swap_buffers(&mut self) -> Result<(), VideoError>;

    /// RGBA back buffer the renderer draws into
    fn frame_mut(&mut self) -> &mut [u8];

    /// Back buffer size as (width, height)
    fn frame_size(&self) -> (u32, u32);
}

/// A windowing/event backend
pub trait Platform {
    type Window: PlatformWindow;
    type Context: RenderContext;

    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<Self::Window, VideoError>;

    fn create_context(&mut self, window: &Self::Window) -> Result<Self::Context, VideoError>;

    /// Every resolution the primary display reports, in hardware order
    fn display_modes(&mut self) -> Vec<(u32, u32)>;

    /// Move whatever the windowing system has pending into the event queue
    fn pump(&mut self);

    /// Next event collected by the last pump, without blocking
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Milliseconds since the platform was initialized
    fn ticks(&self) -> u32;

    /// Whether text-input events should be produced
    fn set_text_input(&mut self, enabled: bool);
}
