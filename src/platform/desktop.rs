// Desktop platform - winit windows, pixels presentation
//
// The event loop is pumped with a zero timeout once per drain, so polling
// never blocks and only sees what the pump collected. The hardware context is a
// `Pixels` instance bound to the window; the software path blits into a
// second, lazily created `Pixels` buffer acting as the window surface.

use super::{
    Platform, PlatformEvent, PlatformWindow, RenderContext, WindowAttributes, WindowEvent,
    WindowId,
};
use crate::display::{IndexedSurface, Rect};
use crate::error::{PlatformError, VideoError};
use pixels::{Pixels, SurfaceTexture};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Ime, StartCause};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::monitor::MonitorHandle;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window};

/// Collects winit callbacks into a queue of platform events
#[derive(Default)]
struct EventCollector {
    queue: VecDeque<PlatformEvent>,
    text_input: bool,
    monitor: Option<MonitorHandle>,
}

impl EventCollector {
    fn push_text(&mut self, text: &str) {
        if !self.text_input {
            return;
        }
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let mut unit = [0u8; 4];
            let bytes = ch.encode_utf8(&mut unit).as_bytes().to_vec();
            self.queue.push_back(PlatformEvent::Text(bytes));
        }
    }
}

impl ApplicationHandler for EventCollector {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        if self.monitor.is_none() {
            self.monitor = event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next());
        }
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let window_id = WindowId(u64::from(window_id));
        match event {
            winit::event::WindowEvent::CloseRequested => {
                self.queue.push_back(PlatformEvent::Window {
                    window_id,
                    event: WindowEvent::CloseRequested,
                });
            }
            winit::event::WindowEvent::Resized(size) => {
                self.queue.push_back(PlatformEvent::Window {
                    window_id,
                    event: WindowEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                });
            }
            winit::event::WindowEvent::KeyboardInput { event, .. } => {
                let down = event.state == ElementState::Pressed;
                self.queue.push_back(PlatformEvent::Key {
                    key: event.physical_key,
                    down,
                });
                if down {
                    if let Some(text) = event.text.as_deref() {
                        self.push_text(text);
                    }
                }
            }
            winit::event::WindowEvent::Ime(Ime::Commit(text)) => {
                self.push_text(&text);
            }
            _ => {}
        }
    }
}

/// winit + pixels backend
pub struct DesktopPlatform {
    event_loop: EventLoop<()>,
    collector: EventCollector,
    /// Windows handed out so far; text-input changes are applied to the live ones
    windows: Vec<Weak<Window>>,
    started: Instant,
    exited: bool,
}

impl DesktopPlatform {
    /// Bring up the windowing system and its event loop
    ///
    /// # Errors
    /// `PlatformError::Init` if no display connection can be made
    pub fn new() -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new().map_err(|e| PlatformError::Init(e.to_string()))?;
        let mut platform = Self {
            event_loop,
            collector: EventCollector::default(),
            windows: Vec::new(),
            started: Instant::now(),
            exited: false,
        };
        // First pump delivers the init cause and lets us see the monitors
        platform.pump_loop();
        Ok(platform)
    }

    fn pump_loop(&mut self) {
        if self.exited {
            return;
        }
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            self.exited = true;
            self.collector.queue.push_back(PlatformEvent::Quit);
        }
    }
}

/// A winit window plus its lazily created native surface
pub struct DesktopWindow {
    window: Arc<Window>,
    native: Option<Pixels<'static>>,
    native_buffer: (u32, u32),
    native_surface: (u32, u32),
}

impl DesktopWindow {
    fn native_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<&mut Pixels<'static>, VideoError> {
        let present = |e: pixels::TextureError| VideoError::Present(e.to_string());
        let inner = self.window.inner_size();
        let inner = (inner.width.max(1), inner.height.max(1));

        if self.native.is_none() {
            let texture = SurfaceTexture::new(inner.0, inner.1, Arc::clone(&self.window));
            let pixels = Pixels::new(width, height, texture)
                .map_err(|e| VideoError::Present(e.to_string()))?;
            self.native = Some(pixels);
            self.native_buffer = (width, height);
            self.native_surface = inner;
        }

        let Some(pixels) = self.native.as_mut() else {
            unreachable!("native surface was just created");
        };
        if self.native_buffer != (width, height) {
            pixels.resize_buffer(width, height).map_err(present)?;
            self.native_buffer = (width, height);
        }
        if self.native_surface != inner {
            pixels.resize_surface(inner.0, inner.1).map_err(present)?;
            self.native_surface = inner;
        }
        Ok(pixels)
    }
}

impl PlatformWindow for DesktopWindow {
    fn id(&self) -> WindowId {
        WindowId(u64::from(self.window.id()))
    }

    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        // A same-size request can come back as another Resized event
        if self.size() == (width, height) {
            return;
        }
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(width, height));
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.window
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
    }

    fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn blit_indexed(&mut self, surface: &IndexedSurface, rect: Rect) -> Result<(), VideoError> {
        let pixels = self.native_surface(surface.width(), surface.height())?;
        surface.blit_rgba(rect, pixels.frame_mut());
        Ok(())
    }

    fn update_rects(&mut self, rects: &[Rect]) -> Result<(), VideoError> {
        trace!(count = rects.len(), "update_rects");
        match self.native.as_mut() {
            Some(pixels) => pixels
                .render()
                .map_err(|e| VideoError::Present(e.to_string())),
            None => Ok(()),
        }
    }
}

/// A `Pixels` swap chain standing in for a GL context
pub struct DesktopContext {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    frame_size: (u32, u32),
    surface_size: (u32, u32),
    current: bool,
}

impl RenderContext for DesktopContext {
    fn make_current(&mut self) {
        self.current = true;
    }

    fn release_current(&mut self) {
        self.current = false;
    }

    fn is_current(&self) -> bool {
        self.current
    }

    fn swap_buffers(&mut self) -> Result<(), VideoError> {
        let inner = self.window.inner_size();
        let inner = (inner.width.max(1), inner.height.max(1));
        if inner != self.surface_size {
            self.pixels
                .resize_surface(inner.0, inner.1)
                .map_err(|e| VideoError::Present(e.to_string()))?;
            self.surface_size = inner;
        }
        self.pixels
            .render()
            .map_err(|e| VideoError::Present(e.to_string()))
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame_size
    }
}

impl Platform for DesktopPlatform {
    type Window = DesktopWindow;
    type Context = DesktopContext;

    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<DesktopWindow, VideoError> {
        let window_attributes = Window::default_attributes()
            .with_title(attributes.title.clone())
            .with_inner_size(PhysicalSize::new(attributes.width, attributes.height))
            .with_resizable(attributes.resizable)
            .with_fullscreen(
                attributes
                    .fullscreen
                    .then_some(Fullscreen::Borderless(None)),
            );

        #[allow(deprecated)]
        let window = self
            .event_loop
            .create_window(window_attributes)
            .map_err(|e| VideoError::WindowCreation(e.to_string()))?;
        window.set_ime_allowed(self.collector.text_input);
        let window = Arc::new(window);
        self.windows.retain(|live| live.strong_count() > 0);
        self.windows.push(Arc::downgrade(&window));

        Ok(DesktopWindow {
            window,
            native: None,
            native_buffer: (0, 0),
            native_surface: (0, 0),
        })
    }

    fn create_context(&mut self, window: &DesktopWindow) -> Result<DesktopContext, VideoError> {
        let (width, height) = window.size();
        let (width, height) = (width.max(1), height.max(1));
        let texture = SurfaceTexture::new(width, height, Arc::clone(&window.window));
        let pixels = Pixels::new(width, height, texture)
            .map_err(|e| VideoError::ContextCreation(e.to_string()))?;

        Ok(DesktopContext {
            window: Arc::clone(&window.window),
            pixels,
            frame_size: (width, height),
            surface_size: (width, height),
            current: false,
        })
    }

    fn display_modes(&mut self) -> Vec<(u32, u32)> {
        match &self.collector.monitor {
            Some(monitor) => monitor
                .video_modes()
                .map(|mode| {
                    let size = mode.size();
                    (size.width, size.height)
                })
                .collect(),
            None => Vec::new(),
        }
    }

    fn pump(&mut self) {
        self.pump_loop();
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.collector.queue.pop_front()
    }

    fn ticks(&self) -> u32 {
        self.started.elapsed().as_millis() as u32
    }

    fn set_text_input(&mut self, enabled: bool) {
        self.collector.text_input = enabled;
        self.windows.retain(|live| live.strong_count() > 0);
        for window in self.windows.iter().filter_map(Weak::upgrade) {
            window.set_ime_allowed(enabled);
        }
        debug!(enabled, "text input");
    }
}
