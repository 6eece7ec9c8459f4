// Doom 2D platform library
// Window, input and frame-loop layer between the game and the OS

// Public modules
pub mod config;
pub mod display;
pub mod error;
pub mod host;
pub mod input;
pub mod platform;
pub mod subsystems;

// Re-export main types for convenience
pub use config::{Config, ScreenshotConfig};
pub use display::{Display, Framebuffer, IndexedSurface, Palette, Rect, VideoBackend};
pub use error::{ConfigError, FatalError, PlatformError, VideoError};
pub use host::{run_native, Host, LaunchOptions, LoopControl, SteppedDriver};
pub use input::{Action, Bindings, Key, PlayerBindings};
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub use platform::DesktopPlatform;
pub use platform::{HeadlessPlatform, Platform, PlatformEvent};
pub use subsystems::{
    Game, GameSetup, InputTracker, Music, QuitFlag, Renderer, Resources, Sound, Subsystems,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        let host = Host::new(HeadlessPlatform::new());
        assert_eq!(host.display().backend(), VideoBackend::Unset);
        assert_eq!(host.tick_delay(), host::TICK_DELAY_MS);
        let _config = Config::default();
        let _quit = QuitFlag::new();
    }
}
