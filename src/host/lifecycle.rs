// Process lifecycle - startup, orderly shutdown and the fatal-abort path
//
// Startup brings collaborators up in a fixed order; shutdown takes them
// down in reverse. The fatal path runs the same teardown minus the config
// save, then aborts the process.

use super::Host;
use crate::config::Config;
use crate::error::FatalError;
use crate::platform::Platform;
use crate::subsystems::{GameSetup, Subsystems};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Archive registered before any user-supplied one
pub const MAIN_ARCHIVE: &str = "doom2d.wad";

/// Command-line switches relevant to startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Extra archives, registered after the main one
    pub files: Vec<PathBuf>,
    pub cheat: bool,
    /// Monster-spawning suppression override
    pub no_monsters: Option<bool>,
    pub warp: Option<u8>,
    /// Directory holding the configuration files
    pub config_dir: PathBuf,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            cheat: false,
            no_monsters: None,
            warp: None,
            config_dir: PathBuf::from("."),
        }
    }
}

fn random_seed() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// Bring every collaborator up, in order
///
/// The platform is already up: it was needed to build `host`.
///
/// # Returns
///
/// The loaded configuration, to be saved again by [`shutdown`]
pub fn startup<P: Platform>(
    host: &mut Host<P>,
    options: &LaunchOptions,
    subsystems: &mut Subsystems<P>,
) -> Result<Config, FatalError> {
    info!("system: apply default bindings");
    let mut setup = GameSetup {
        bindings: Default::default(),
        cheat: options.cheat,
        no_monsters: options.no_monsters,
        warp: options.warp,
        seed: random_seed(),
    };

    info!(dir = %options.config_dir.display(), "system: load config");
    let config = Config::load(&options.config_dir);
    setup.bindings = config.bindings;
    host.set_screenshot_config(config.screenshot.clone());

    info!("system: register archives");
    subsystems.resources.add_archive(Path::new(MAIN_ARCHIVE))?;
    for file in &options.files {
        subsystems.resources.add_archive(file)?;
    }
    subsystems.resources.init_index()?;

    info!("system: initialize sound");
    subsystems.sound.init(&config.section("sound"))?;
    info!("system: initialize music");
    subsystems.music.init(&config.section("music"))?;
    info!("system: initialize renderer");
    subsystems
        .renderer
        .init(host.display_mut(), &config.section("video"))?;
    info!("system: initialize game");
    subsystems.game.init(&setup, host.quit_flag())?;

    host.reset_tick();
    Ok(config)
}

/// Orderly shutdown after the loop has ended
///
/// Saves the configuration with the collaborators' current options, then
/// tears down renderer, music, sound and finally the platform.
pub fn shutdown<P: Platform>(
    mut host: Host<P>,
    mut config: Config,
    subsystems: &mut Subsystems<P>,
    config_dir: &Path,
) {
    config.set_section("video", subsystems.renderer.options());
    config.set_section("sound", subsystems.sound.options());
    config.set_section("music", subsystems.music.options());
    match config.save(config_dir) {
        Ok(path) => info!(path = %path.display(), "system: config saved"),
        Err(err) => error!(error = %err, "system: failed to save config"),
    }

    teardown(&mut host, subsystems);
    drop(host);
    info!("system: platform shut down");
}

fn teardown<P: Platform>(host: &mut Host<P>, subsystems: &mut Subsystems<P>) {
    info!("system: shutdown renderer");
    subsystems.renderer.shutdown(host.display_mut());
    info!("system: shutdown music");
    subsystems.music.shutdown();
    info!("system: shutdown sound");
    subsystems.sound.shutdown();
}

/// Best-effort teardown after a fatal error; the config is not saved
pub fn fatal_teardown<P: Platform>(mut host: Host<P>, subsystems: &mut Subsystems<P>) {
    teardown(&mut host, subsystems);
    drop(host);
}

/// Tear down, report `CRITICAL ERROR` and abort the process
pub fn abort_on_fatal<P: Platform>(
    host: Host<P>,
    subsystems: &mut Subsystems<P>,
    err: FatalError,
) -> ! {
    error!(error = %err, "fatal error");
    fatal_teardown(host, subsystems);
    eprintln!("CRITICAL ERROR: {}", err);
    std::process::abort();
}
