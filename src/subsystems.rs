// Collaborators - the game, renderer and audio the platform layer drives
//
// None of them are implemented here. The host calls into them in a fixed
// order and forwards input; they report unrecoverable trouble as a
// `FatalError`.

use crate::display::Display;
use crate::error::FatalError;
use crate::input::{Bindings, Key};
use crate::platform::Platform;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Shared "stop after this iteration" flag
///
/// Cloning yields another handle to the same flag. Once requested, it
/// stays set for the rest of the process.
#[derive(Debug, Clone, Default)]
pub struct QuitFlag(Rc<Cell<bool>>);

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the frame loop to stop once the current iteration completes
    pub fn request(&self) {
        self.0.set(true);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Everything the game needs to know when it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSetup {
    pub bindings: Bindings,
    /// Cheat codes enabled from the command line
    pub cheat: bool,
    /// Monster-spawning suppression, when overridden from the command line
    pub no_monsters: Option<bool>,
    /// Map to start on
    pub warp: Option<u8>,
    /// Seed for the game's random number generator
    pub seed: u64,
}

/// Draws the game into the display
pub trait Renderer<P: Platform> {
    /// Set up rendering, usually including the first video mode
    ///
    /// # Arguments
    ///
    /// * `display` - The display surface manager
    /// * `options` - The persisted `[video]` table (empty if none)
    fn init(&mut self, display: &mut Display<P>, options: &toml::Table) -> Result<(), FatalError>;

    /// Switch to a new video mode; also called when the user resizes the window
    fn set_video_mode(
        &mut self,
        display: &mut Display<P>,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<(), FatalError>;

    /// Render one frame
    fn draw(&mut self, display: &mut Display<P>) -> Result<(), FatalError>;

    fn shutdown(&mut self, display: &mut Display<P>);

    /// Current settings, persisted under `[video]`
    fn options(&self) -> toml::Table;
}

/// Sound effects
pub trait Sound {
    fn init(&mut self, options: &toml::Table) -> Result<(), FatalError>;

    fn shutdown(&mut self);

    /// Current settings, persisted under `[sound]`
    fn options(&self) -> toml::Table;
}

/// Streamed music
pub trait Music {
    fn init(&mut self, options: &toml::Table) -> Result<(), FatalError>;

    /// Advance streaming; called every iteration regardless of simulation
    fn update(&mut self) -> Result<(), FatalError>;

    fn shutdown(&mut self);

    /// Current settings, persisted under `[music]`
    fn options(&self) -> toml::Table;
}

/// The active game mode
pub trait Game {
    /// # Arguments
    ///
    /// * `setup` - Bindings and command-line switches
    /// * `quit` - Handle the game sets to leave the frame loop
    fn init(&mut self, setup: &GameSetup, quit: QuitFlag) -> Result<(), FatalError>;

    /// Advance the simulation by exactly one tick
    fn tick(&mut self) -> Result<(), FatalError>;

    fn on_key(&mut self, key: Key, down: bool) -> Result<(), FatalError>;

    /// One typed character in CP866
    fn on_text(&mut self, ch: u8) -> Result<(), FatalError>;
}

/// Low-level pressed-key state
pub trait InputTracker {
    fn on_key(&mut self, key: Key, down: bool);
}

/// Game data archives
pub trait Resources {
    /// Register an archive; registration order decides lookup priority
    fn add_archive(&mut self, path: &Path) -> Result<(), FatalError>;

    /// Build the lookup index over all registered archives
    fn init_index(&mut self) -> Result<(), FatalError>;
}

/// The full set of collaborators handed to the host
pub struct Subsystems<P: Platform> {
    pub renderer: Box<dyn Renderer<P>>,
    pub sound: Box<dyn Sound>,
    pub music: Box<dyn Music>,
    pub game: Box<dyn Game>,
    pub input: Box<dyn InputTracker>,
    pub resources: Box<dyn Resources>,
}
