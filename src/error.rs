// Error types shared by the platform layer
//
// Precondition violations are not represented here: they panic at the call
// site with a diagnostic. Everything below is either recovered locally
// (video, config, screenshot) or propagated to the top (fatal, platform).

use thiserror::Error;

/// The platform event/video subsystem could not be brought up
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to create the event loop or any other process-wide handle
    #[error("failed to initialize platform: {0}")]
    Init(String),
}

/// Resource-acquisition failures inside the display surface manager
///
/// A mode-set operation that returns one of these has already rolled back
/// whatever it created and left the previous mode untouched.
#[derive(Error, Debug)]
pub enum VideoError {
    /// The platform refused to create a window
    #[error("failed to create window: {0}")]
    WindowCreation(String),

    /// The window was created but no rendering context could be attached
    #[error("failed to create rendering context: {0}")]
    ContextCreation(String),

    /// The indexed pixel buffer could not be allocated
    #[error("failed to allocate {width}x{height} indexed surface")]
    SurfaceAllocation {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Blitting or swapping failed on the backend
    #[error("failed to present frame: {0}")]
    Present(String),
}

/// Declared-fatal runtime error raised by a collaborator
///
/// Never handled locally: it travels up to the lifecycle, which tears down
/// renderer, music, sound and the platform before terminating the process.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct FatalError {
    message: String,
}

impl FatalError {
    /// Create a fatal error carrying the message printed after `CRITICAL ERROR:`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors reading or writing the persisted configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The in-memory configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
