// Demo collaborators
//
// Stand-ins for the real game, renderer and audio so the binary runs on its
// own: a scrolling test pattern, a key logger and silent audio.

use doom2d_platform::display::{VideoBackend, VGA_PALETTE_BYTES};
use doom2d_platform::platform::RenderContext;
use doom2d_platform::{
    Action, Bindings, Display, FatalError, Game, GameSetup, InputTracker, Key, Music, Platform, QuitFlag, Renderer,
    Resources, Sound, Subsystems,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 400;

/// Collaborators for the desktop binary
pub fn subsystems<P: Platform + 'static>(software: bool) -> Subsystems<P> {
    Subsystems {
        renderer: Box::new(TestPattern::new(software)),
        sound: Box::new(Silence::default()),
        music: Box::new(Silence::default()),
        game: Box::new(KeyLogger::default()),
        input: Box::new(PressedKeys::default()),
        resources: Box::new(Archives::default()),
    }
}

fn read_u32(options: &toml::Table, key: &str, default: u32) -> u32 {
    options
        .get(key)
        .and_then(toml::Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v > 0)
        .unwrap_or(default)
}

/// Grey ramp in 6-bit VGA intensities, tinted towards red at the top
fn test_palette() -> [u8; VGA_PALETTE_BYTES] {
    let mut vga = [0u8; VGA_PALETTE_BYTES];
    for (i, rgb) in vga.chunks_exact_mut(3).enumerate() {
        let level = (i / 4) as u8;
        rgb[0] = if i >= 192 { 63 } else { level };
        rgb[1] = level;
        rgb[2] = level;
    }
    vga
}

/// Renderer drawing a diagonal pattern that scrolls every frame
struct TestPattern {
    software: bool,
    width: u32,
    height: u32,
    fullscreen: bool,
    frame: u32,
}

impl TestPattern {
    fn new(software: bool) -> Self {
        Self {
            software,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fullscreen: false,
            frame: 0,
        }
    }

    fn apply_mode<P: Platform>(&mut self, display: &mut Display<P>) -> bool {
        let result = if self.software {
            display.set_software_mode(self.width, self.height, self.fullscreen)
        } else {
            display.set_hardware_mode(self.width, self.height, self.fullscreen)
        };
        match result {
            Ok(()) => {
                if self.software {
                    display.upload_palette(&test_palette());
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to set video mode");
                false
            }
        }
    }

    fn draw_indexed<P: Platform>(&self, display: &mut Display<P>) {
        let fb = display.framebuffer();
        for y in 0..fb.height as usize {
            let row = &mut fb.pixels[y * fb.pitch..y * fb.pitch + fb.width as usize];
            for (x, px) in row.iter_mut().enumerate() {
                *px = (x + y + self.frame as usize) as u8;
            }
        }
        if let Err(err) = display.present() {
            warn!(error = %err, "present failed");
        }
    }

    fn draw_rgba<P: Platform>(&self, display: &mut Display<P>) {
        let context = display.context_mut();
        let (width, _) = context.frame_size();
        for (i, px) in context.frame_mut().chunks_exact_mut(4).enumerate() {
            let (x, y) = (i % width as usize, i / width as usize);
            let v = (x + y + self.frame as usize) as u8;
            px.copy_from_slice(&[v, v / 2, 0xFF - v, 0xFF]);
        }
        if let Err(err) = display.swap_buffers() {
            warn!(error = %err, "swap failed");
        }
    }
}

impl<P: Platform> Renderer<P> for TestPattern {
    fn init(&mut self, display: &mut Display<P>, options: &toml::Table) -> Result<(), FatalError> {
        self.width = read_u32(options, "width", DEFAULT_WIDTH);
        self.height = read_u32(options, "height", DEFAULT_HEIGHT);
        self.fullscreen = options
            .get("fullscreen")
            .and_then(toml::Value::as_bool)
            .unwrap_or(false);

        let modes = display.query_mode_list(self.fullscreen);
        debug!(count = modes.len(), "display modes");

        if !self.apply_mode(display) {
            return Err(FatalError::new("R_init: cannot set video mode"));
        }
        display.enable_text_input();
        Ok(())
    }

    fn set_video_mode(
        &mut self,
        display: &mut Display<P>,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<(), FatalError> {
        let previous = (self.width, self.height, self.fullscreen);
        (self.width, self.height, self.fullscreen) = (width, height, fullscreen);
        if !self.apply_mode(display) {
            (self.width, self.height, self.fullscreen) = previous;
        }
        Ok(())
    }

    fn draw(&mut self, display: &mut Display<P>) -> Result<(), FatalError> {
        match display.backend() {
            VideoBackend::Software => self.draw_indexed(display),
            VideoBackend::Hardware => self.draw_rgba(display),
            VideoBackend::Unset => {}
        }
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }

    fn shutdown(&mut self, display: &mut Display<P>) {
        display.disable_text_input();
        display.teardown();
    }

    fn options(&self) -> toml::Table {
        let mut table = toml::Table::new();
        table.insert("width".into(), toml::Value::Integer(self.width.into()));
        table.insert("height".into(), toml::Value::Integer(self.height.into()));
        table.insert("fullscreen".into(), toml::Value::Boolean(self.fullscreen));
        table
    }
}

/// Audio that plays nothing but keeps its settings
#[derive(Default)]
struct Silence {
    options: toml::Table,
}

impl Sound for Silence {
    fn init(&mut self, options: &toml::Table) -> Result<(), FatalError> {
        self.options = options.clone();
        Ok(())
    }

    fn shutdown(&mut self) {}

    fn options(&self) -> toml::Table {
        self.options.clone()
    }
}

impl Music for Silence {
    fn init(&mut self, options: &toml::Table) -> Result<(), FatalError> {
        self.options = options.clone();
        Ok(())
    }

    fn update(&mut self) -> Result<(), FatalError> {
        Ok(())
    }

    fn shutdown(&mut self) {}

    fn options(&self) -> toml::Table {
        self.options.clone()
    }
}

/// Game mode that logs input; Escape quits
#[derive(Default)]
struct KeyLogger {
    quit: QuitFlag,
    bindings: Bindings,
    ticks: u64,
    line: Vec<u8>,
}

impl KeyLogger {
    /// Actions bound to a key, tagged with the player number
    fn bound_actions(&self, key: Key) -> Vec<(u8, Action)> {
        let player1 = self.bindings.player1.actions_for(key).into_iter().map(|a| (1, a));
        let player2 = self.bindings.player2.actions_for(key).into_iter().map(|a| (2, a));
        player1.chain(player2).collect()
    }
}

impl Game for KeyLogger {
    fn init(&mut self, setup: &GameSetup, quit: QuitFlag) -> Result<(), FatalError> {
        info!(
            cheat = setup.cheat,
            warp = ?setup.warp,
            seed = setup.seed,
            "game ready, press Escape to quit"
        );
        self.quit = quit;
        self.bindings = setup.bindings;
        Ok(())
    }

    fn tick(&mut self) -> Result<(), FatalError> {
        self.ticks += 1;
        Ok(())
    }

    fn on_key(&mut self, key: Key, down: bool) -> Result<(), FatalError> {
        let actions = self.bound_actions(key);
        debug!(?key, down, tick = self.ticks, ?actions, "key");
        if down {
            match key {
                Key::Escape => self.quit.request(),
                Key::Return => {
                    info!(len = self.line.len(), "typed line");
                    self.line.clear();
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn on_text(&mut self, ch: u8) -> Result<(), FatalError> {
        self.line.push(ch);
        Ok(())
    }
}

#[derive(Default)]
struct PressedKeys {
    down: HashSet<Key>,
}

impl InputTracker for PressedKeys {
    fn on_key(&mut self, key: Key, down: bool) {
        if down {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }
}

/// Archive list without any archive reading behind it
#[derive(Default)]
struct Archives {
    paths: Vec<PathBuf>,
}

impl Resources for Archives {
    fn add_archive(&mut self, path: &Path) -> Result<(), FatalError> {
        if !path.exists() {
            warn!(path = %path.display(), "archive not found");
        }
        self.paths.push(path.to_path_buf());
        Ok(())
    }

    fn init_index(&mut self) -> Result<(), FatalError> {
        info!(archives = self.paths.len(), "resource index ready");
        Ok(())
    }
}
