// Host module - the frame loop and everything it owns
//
// This module provides:
// - `Host`, owner of the display, the quit flag and the tick accumulator
// - The event pump (events.rs)
// - Native and externally stepped loop drivers (driver.rs)
// - Startup, shutdown and fatal-abort sequencing (lifecycle.rs)

pub mod driver;
pub mod events;
pub mod lifecycle;

pub use driver::{run_native, LoopControl, SteppedDriver};
pub use lifecycle::{abort_on_fatal, fatal_teardown, shutdown, startup, LaunchOptions};

use crate::config::ScreenshotConfig;
use crate::display::Display;
use crate::error::FatalError;
use crate::platform::Platform;
use crate::subsystems::{QuitFlag, Subsystems};

/// Minimum real time between two simulation steps, in milliseconds
pub const TICK_DELAY_MS: u32 = 50;

/// Explicit context for one run of the game
pub struct Host<P: Platform> {
    display: Display<P>,
    quit: QuitFlag,
    last_tick: u32,
    tick_delay: u32,
    screenshot: ScreenshotConfig,
}

impl<P: Platform> Host<P> {
    /// Take ownership of an initialized platform
    pub fn new(platform: P) -> Self {
        let last_tick = platform.ticks();
        Self {
            display: Display::new(platform),
            quit: QuitFlag::new(),
            last_tick,
            tick_delay: TICK_DELAY_MS,
            screenshot: ScreenshotConfig::default(),
        }
    }

    /// Override the simulation delay
    pub fn with_tick_delay(mut self, ms: u32) -> Self {
        self.tick_delay = ms;
        self
    }

    pub fn display(&self) -> &Display<P> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<P> {
        &mut self.display
    }

    /// Another handle to the quit flag
    pub fn quit_flag(&self) -> QuitFlag {
        self.quit.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.quit.is_set()
    }

    /// Timestamp of the last simulation step
    pub fn last_tick(&self) -> u32 {
        self.last_tick
    }

    pub fn tick_delay(&self) -> u32 {
        self.tick_delay
    }

    pub fn set_screenshot_config(&mut self, config: ScreenshotConfig) {
        self.screenshot = config;
    }

    /// Record the current time as the last simulation step
    pub fn reset_tick(&mut self) {
        self.last_tick = self.display.platform().ticks();
    }

    /// Check whether enough time has passed for the next simulation step
    ///
    /// Advances the accumulator to now when it has.
    fn should_tick(&mut self) -> bool {
        let now = self.display.platform().ticks();
        if now.wrapping_sub(self.last_tick) >= self.tick_delay {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// Run one frame-loop iteration
    ///
    /// Pumps events, advances music, runs at most one simulation step and
    /// draws. A quit requested on the way does not cut the iteration short.
    pub fn step(&mut self, subsystems: &mut Subsystems<P>) -> Result<(), FatalError> {
        self.pump_events(subsystems)?;
        subsystems.music.update()?;
        if self.should_tick() {
            subsystems.game.tick()?;
        }
        subsystems.renderer.draw(&mut self.display)
    }
}
