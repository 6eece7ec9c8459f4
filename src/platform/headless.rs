// Headless platform - scripted backend without a display
//
// Events, ticks and display modes are fed in through a `HeadlessHandle`;
// every window/context call is appended to a journal the handle can read.
// Window and context creation can be made to fail once.

use super::{
    Platform, PlatformEvent, PlatformWindow, RenderContext, WindowAttributes, WindowEvent,
    WindowId,
};
use crate::display::{IndexedSurface, Rect};
use crate::error::VideoError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use winit::keyboard::PhysicalKey;

/// One recorded platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCall {
    CreateWindow {
        id: WindowId,
        width: u32,
        height: u32,
        fullscreen: bool,
        hardware: bool,
    },
    DestroyWindow(WindowId),
    CreateContext(WindowId),
    DestroyContext(WindowId),
    MakeCurrent(WindowId),
    ReleaseCurrent(WindowId),
    SwapBuffers(WindowId),
    SetSize {
        id: WindowId,
        width: u32,
        height: u32,
    },
    SetFullscreen {
        id: WindowId,
        fullscreen: bool,
    },
    Blit {
        id: WindowId,
        rect: Rect,
    },
    UpdateRects {
        id: WindowId,
        rects: Vec<Rect>,
    },
    TextInput(bool),
}

#[derive(Default)]
struct State {
    /// Pushed through the handle, not yet pumped
    incoming: VecDeque<PlatformEvent>,
    events: VecDeque<PlatformEvent>,
    ticks: u32,
    modes: Vec<(u32, u32)>,
    journal: Vec<HeadlessCall>,
    next_window_id: u64,
    fail_window: bool,
    fail_context: bool,
    text_input: bool,
    /// Live windows and whether each accepts text input
    windows: Vec<(WindowId, bool)>,
}

impl State {
    fn record(&mut self, call: HeadlessCall) {
        self.journal.push(call);
    }
}

/// Scripting and inspection handle for a `HeadlessPlatform`
///
/// Cloning is cheap; all clones see the same platform.
#[derive(Clone)]
pub struct HeadlessHandle {
    state: Rc<RefCell<State>>,
}

impl HeadlessHandle {
    /// Queue an event for the next pump
    pub fn push_event(&self, event: PlatformEvent) {
        self.state.borrow_mut().incoming.push_back(event);
    }

    /// Queue a key transition
    pub fn push_key(&self, key: PhysicalKey, down: bool) {
        self.push_event(PlatformEvent::Key { key, down });
    }

    /// Queue a text-input unit
    pub fn push_text(&self, text: &str) {
        self.push_event(PlatformEvent::Text(text.as_bytes().to_vec()));
    }

    /// Queue a notification for a window
    pub fn push_window_event(&self, window_id: WindowId, event: WindowEvent) {
        self.push_event(PlatformEvent::Window { window_id, event });
    }

    /// Number of events not yet polled, pumped or not
    pub fn pending_events(&self) -> usize {
        let state = self.state.borrow();
        state.incoming.len() + state.events.len()
    }

    /// Set the value returned by `Platform::ticks`
    pub fn set_ticks(&self, ticks: u32) {
        self.state.borrow_mut().ticks = ticks;
    }

    /// Advance the tick counter
    pub fn advance(&self, ms: u32) {
        let mut state = self.state.borrow_mut();
        state.ticks = state.ticks.wrapping_add(ms);
    }

    /// Replace the raw display-mode list reported by the hardware
    pub fn set_display_modes(&self, modes: &[(u32, u32)]) {
        self.state.borrow_mut().modes = modes.to_vec();
    }

    /// Make the next window creation fail
    pub fn fail_next_window(&self) {
        self.state.borrow_mut().fail_window = true;
    }

    /// Make the next context creation fail
    pub fn fail_next_context(&self) {
        self.state.borrow_mut().fail_context = true;
    }

    /// Whether text input is currently enabled
    pub fn text_input_enabled(&self) -> bool {
        self.state.borrow().text_input
    }

    /// Text-input state of a live window, `None` once it is destroyed
    pub fn window_text_input(&self, id: WindowId) -> Option<bool> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|(window, _)| *window == id)
            .map(|&(_, enabled)| enabled)
    }

    /// Copy of every call recorded so far
    pub fn journal(&self) -> Vec<HeadlessCall> {
        self.state.borrow().journal.clone()
    }

    /// Take the recorded calls, leaving the journal empty
    pub fn take_journal(&self) -> Vec<HeadlessCall> {
        std::mem::take(&mut self.state.borrow_mut().journal)
    }
}

/// Platform backend that never touches real hardware
pub struct HeadlessPlatform {
    state: Rc<RefCell<State>>,
}

impl HeadlessPlatform {
    /// Create a headless platform with an empty event queue at tick 0
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                next_window_id: 1,
                ..State::default()
            })),
        }
    }

    /// Handle for scripting this platform after it has been moved
    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            state: Rc::clone(&self.state),
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Headless window with an RGBA native surface
pub struct HeadlessWindow {
    id: WindowId,
    width: u32,
    height: u32,
    fullscreen: bool,
    native: Vec<u8>,
    native_width: u32,
    state: Rc<RefCell<State>>,
}

impl HeadlessWindow {
    /// RGBA contents of the native surface after the last blit
    pub fn native_pixels(&self) -> &[u8] {
        &self.native
    }
}

impl PlatformWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.state.borrow_mut().record(HeadlessCall::SetSize {
            id: self.id,
            width,
            height,
        });
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        self.state.borrow_mut().record(HeadlessCall::SetFullscreen {
            id: self.id,
            fullscreen,
        });
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn blit_indexed(&mut self, surface: &IndexedSurface, rect: Rect) -> Result<(), VideoError> {
        let len = surface.width() as usize * surface.height() as usize * 4;
        if self.native.len() != len || self.native_width != surface.width() {
            self.native = vec![0; len];
            self.native_width = surface.width();
        }
        surface.blit_rgba(rect, &mut self.native);
        self.state
            .borrow_mut()
            .record(HeadlessCall::Blit { id: self.id, rect });
        Ok(())
    }

    fn update_rects(&mut self, rects: &[Rect]) -> Result<(), VideoError> {
        self.state.borrow_mut().record(HeadlessCall::UpdateRects {
            id: self.id,
            rects: rects.to_vec(),
        });
        Ok(())
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.windows.retain(|&(id, _)| id != self.id);
        state.record(HeadlessCall::DestroyWindow(self.id));
    }
}

/// Headless rendering context backed by a plain RGBA buffer
pub struct HeadlessContext {
    window_id: WindowId,
    current: bool,
    frame: Vec<u8>,
    width: u32,
    height: u32,
    state: Rc<RefCell<State>>,
}

impl RenderContext for HeadlessContext {
    fn make_current(&mut self) {
        self.current = true;
        self.state
            .borrow_mut()
            .record(HeadlessCall::MakeCurrent(self.window_id));
    }

    fn release_current(&mut self) {
        self.current = false;
        self.state
            .borrow_mut()
            .record(HeadlessCall::ReleaseCurrent(self.window_id));
    }

    fn is_current(&self) -> bool {
        self.current
    }

    fn swap_buffers(&mut self) -> Result<(), VideoError> {
        self.state
            .borrow_mut()
            .record(HeadlessCall::SwapBuffers(self.window_id));
        Ok(())
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        &mut self.frame
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        self.state
            .borrow_mut()
            .record(HeadlessCall::DestroyContext(self.window_id));
    }
}

impl Platform for HeadlessPlatform {
    type Window = HeadlessWindow;
    type Context = HeadlessContext;

    fn create_window(&mut self, attributes: &WindowAttributes) -> Result<HeadlessWindow, VideoError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_window) {
            return Err(VideoError::WindowCreation("scripted failure".to_string()));
        }
        let id = WindowId(state.next_window_id);
        state.next_window_id += 1;
        state.record(HeadlessCall::CreateWindow {
            id,
            width: attributes.width,
            height: attributes.height,
            fullscreen: attributes.fullscreen,
            hardware: attributes.hardware,
        });
        let text_input = state.text_input;
        state.windows.push((id, text_input));
        Ok(HeadlessWindow {
            id,
            width: attributes.width,
            height: attributes.height,
            fullscreen: attributes.fullscreen,
            native: Vec::new(),
            native_width: 0,
            state: Rc::clone(&self.state),
        })
    }

    fn create_context(&mut self, window: &HeadlessWindow) -> Result<HeadlessContext, VideoError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_context) {
            return Err(VideoError::ContextCreation("scripted failure".to_string()));
        }
        state.record(HeadlessCall::CreateContext(window.id));
        let (width, height) = window.size();
        Ok(HeadlessContext {
            window_id: window.id,
            current: false,
            frame: vec![0; width as usize * height as usize * 4],
            width,
            height,
            state: Rc::clone(&self.state),
        })
    }

    fn display_modes(&mut self) -> Vec<(u32, u32)> {
        self.state.borrow().modes.clone()
    }

    fn pump(&mut self) {
        let mut state = self.state.borrow_mut();
        let incoming = std::mem::take(&mut state.incoming);
        state.events.extend(incoming);
    }

    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.state.borrow_mut().events.pop_front()
    }

    fn ticks(&self) -> u32 {
        self.state.borrow().ticks
    }

    fn set_text_input(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.text_input = enabled;
        for (_, window) in state.windows.iter_mut() {
            *window = enabled;
        }
        state.record(HeadlessCall::TextInput(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_events_are_fifo() {
        let mut platform = HeadlessPlatform::new();
        let handle = platform.handle();
        handle.push_key(PhysicalKey::Code(KeyCode::KeyA), true);
        handle.push_event(PlatformEvent::Quit);
        platform.pump();

        assert_eq!(
            platform.poll_event(),
            Some(PlatformEvent::Key {
                key: PhysicalKey::Code(KeyCode::KeyA),
                down: true
            })
        );
        assert_eq!(platform.poll_event(), Some(PlatformEvent::Quit));
        assert_eq!(platform.poll_event(), None);
    }

    #[test]
    fn test_poll_sees_only_pumped_events() {
        let mut platform = HeadlessPlatform::new();
        let handle = platform.handle();
        handle.push_event(PlatformEvent::Quit);
        assert_eq!(platform.poll_event(), None);

        platform.pump();
        handle.push_text("a");
        assert_eq!(platform.poll_event(), Some(PlatformEvent::Quit));
        assert_eq!(platform.poll_event(), None);
        assert_eq!(handle.pending_events(), 1);

        platform.pump();
        assert_eq!(platform.poll_event(), Some(PlatformEvent::Text(vec![b'a'])));
        assert_eq!(handle.pending_events(), 0);
    }

    #[test]
    fn test_window_ids_increase() {
        let mut platform = HeadlessPlatform::new();
        let a = platform
            .create_window(&WindowAttributes::new("a", 10, 10))
            .unwrap();
        let b = platform
            .create_window(&WindowAttributes::new("b", 10, 10))
            .unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_scripted_failure_is_one_shot() {
        let mut platform = HeadlessPlatform::new();
        let handle = platform.handle();
        handle.fail_next_window();
        assert!(platform
            .create_window(&WindowAttributes::new("a", 10, 10))
            .is_err());
        assert!(platform
            .create_window(&WindowAttributes::new("a", 10, 10))
            .is_ok());
    }

    #[test]
    fn test_drop_is_journaled() {
        let mut platform = HeadlessPlatform::new();
        let handle = platform.handle();
        let window = platform
            .create_window(&WindowAttributes::new("a", 10, 10))
            .unwrap();
        let id = window.id();
        drop(window);
        assert_eq!(handle.journal().last(), Some(&HeadlessCall::DestroyWindow(id)));
    }

    #[test]
    fn test_ticks() {
        let platform = HeadlessPlatform::new();
        let handle = platform.handle();
        assert_eq!(platform.ticks(), 0);
        handle.set_ticks(100);
        handle.advance(25);
        assert_eq!(platform.ticks(), 125);
    }
}
