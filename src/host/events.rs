// Event pump - drains queued platform events into the collaborators
//
// Key transitions reach the input tracker first and the game second, in
// arrival order. Events addressed to any window but ours are dropped.

use super::Host;
use crate::display::VideoBackend;
use crate::error::FatalError;
use crate::input::{decode_text_char, translate_key, Key};
use crate::platform::{Platform, PlatformEvent, WindowEvent, WindowId};
use crate::subsystems::Subsystems;
use tracing::{debug, info, trace, warn};

impl<P: Platform> Host<P> {
    /// Handle every event currently queued, without blocking
    ///
    /// The platform is pumped once up front. Events arriving while the
    /// queue drains wait for the next call.
    pub fn pump_events(&mut self, subsystems: &mut Subsystems<P>) -> Result<(), FatalError> {
        self.display.platform_mut().pump();
        while let Some(event) = self.display.platform_mut().poll_event() {
            self.handle_event(event, subsystems)?;
        }
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: PlatformEvent,
        subsystems: &mut Subsystems<P>,
    ) -> Result<(), FatalError> {
        match event {
            PlatformEvent::Quit => {
                info!("quit requested");
                self.quit.request();
            }
            PlatformEvent::Window { window_id, event } => {
                self.handle_window_event(window_id, event, subsystems)?;
            }
            PlatformEvent::Key { key, down } => {
                let key = translate_key(key);
                if !key.is_known() {
                    trace!(down, "dropping unmapped key");
                    return Ok(());
                }
                if key == Key::PrintScreen && down {
                    self.take_screenshot();
                }
                subsystems.input.on_key(key, down);
                subsystems.game.on_key(key, down)?;
            }
            PlatformEvent::Text(unit) => match decode_text_char(&unit) {
                Some(ch) => subsystems.game.on_text(ch)?,
                None => trace!(?unit, "dropping undecodable text"),
            },
        }
        Ok(())
    }

    fn handle_window_event(
        &mut self,
        window_id: WindowId,
        event: WindowEvent,
        subsystems: &mut Subsystems<P>,
    ) -> Result<(), FatalError> {
        if self.display.window_id() != Some(window_id) {
            trace!(window = window_id.0, ?event, "ignoring event for another window");
            return Ok(());
        }
        match event {
            WindowEvent::Resized { width, height } => {
                if width == 0 || height == 0 {
                    debug!(width, height, "ignoring empty resize");
                    return Ok(());
                }
                let fullscreen = self.display.is_fullscreen();
                subsystems
                    .renderer
                    .set_video_mode(&mut self.display, width, height, fullscreen)?;
            }
            WindowEvent::CloseRequested => {
                info!("window closed");
                self.quit.request();
            }
        }
        Ok(())
    }

    fn take_screenshot(&self) {
        if !self.screenshot.enabled || self.display.backend() != VideoBackend::Software {
            return;
        }
        match self.display.save_screenshot(&self.screenshot.directory) {
            Ok(path) => info!(path = %path.display(), "screenshot saved"),
            Err(err) => warn!(error = %err, "failed to save screenshot"),
        }
    }
}
