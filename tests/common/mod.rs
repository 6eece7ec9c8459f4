// Common test utilities for headless integration tests
//
// This module provides recording collaborators that append every call to a
// shared log, plus a rig that wires them to a `HeadlessPlatform`.

#![allow(dead_code)]

use doom2d_platform::host::{self, LaunchOptions};
use doom2d_platform::platform::{HeadlessCall, HeadlessHandle, HeadlessPlatform};
use doom2d_platform::{
    Config, Display, FatalError, Game, GameSetup, Host, InputTracker, Key, Music, QuitFlag,
    Renderer, Resources, Sound, Subsystems,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Size of the mode the recording renderer sets on init
pub const INIT_WIDTH: u32 = 320;
pub const INIT_HEIGHT: u32 = 200;

/// One collaborator call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddArchive(PathBuf),
    InitIndex,
    SoundInit(toml::Table),
    MusicInit(toml::Table),
    RendererInit(toml::Table),
    GameInit(GameSetup),
    SetVideoMode {
        width: u32,
        height: u32,
        fullscreen: bool,
    },
    MusicUpdate,
    Tick,
    Draw,
    TrackerKey(Key, bool),
    GameKey(Key, bool),
    GameText(u8),
    RendererShutdown,
    MusicShutdown,
    /// Whether the game window still existed when sound shut down
    SoundShutdown { window_alive: bool },
}

pub type Log = Rc<RefCell<Vec<Call>>>;

/// Switches that make a collaborator fail on its next call
#[derive(Clone, Default)]
pub struct Faults {
    pub draw: Rc<Cell<bool>>,
    pub index: Rc<Cell<bool>>,
}

pub struct RecordingRenderer {
    log: Log,
    faults: Faults,
    software: bool,
}

impl Renderer<HeadlessPlatform> for RecordingRenderer {
    fn init(
        &mut self,
        display: &mut Display<HeadlessPlatform>,
        options: &toml::Table,
    ) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::RendererInit(options.clone()));
        self.apply(display, INIT_WIDTH, INIT_HEIGHT, false)
    }

    fn set_video_mode(
        &mut self,
        display: &mut Display<HeadlessPlatform>,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::SetVideoMode {
            width,
            height,
            fullscreen,
        });
        self.apply(display, width, height, fullscreen)
    }

    fn draw(&mut self, _display: &mut Display<HeadlessPlatform>) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::Draw);
        if self.faults.draw.take() {
            return Err(FatalError::new("R_draw: scripted failure"));
        }
        Ok(())
    }

    fn shutdown(&mut self, _display: &mut Display<HeadlessPlatform>) {
        self.log.borrow_mut().push(Call::RendererShutdown);
    }

    fn options(&self) -> toml::Table {
        let mut table = toml::Table::new();
        table.insert("software".to_string(), toml::Value::Boolean(self.software));
        table
    }
}

impl RecordingRenderer {
    fn apply(
        &mut self,
        display: &mut Display<HeadlessPlatform>,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<(), FatalError> {
        let result = if self.software {
            display.set_software_mode(width, height, fullscreen)
        } else {
            display.set_hardware_mode(width, height, fullscreen)
        };
        result.map_err(|e| FatalError::new(e.to_string()))
    }
}

pub struct RecordingSound {
    log: Log,
    handle: HeadlessHandle,
}

impl Sound for RecordingSound {
    fn init(&mut self, options: &toml::Table) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::SoundInit(options.clone()));
        Ok(())
    }

    fn shutdown(&mut self) {
        let window_alive = !self
            .handle
            .journal()
            .iter()
            .any(|call| matches!(call, HeadlessCall::DestroyWindow(_)));
        self.log
            .borrow_mut()
            .push(Call::SoundShutdown { window_alive });
    }

    fn options(&self) -> toml::Table {
        let mut table = toml::Table::new();
        table.insert("volume".to_string(), toml::Value::Integer(100));
        table
    }
}

pub struct RecordingMusic {
    log: Log,
}

impl Music for RecordingMusic {
    fn init(&mut self, options: &toml::Table) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::MusicInit(options.clone()));
        Ok(())
    }

    fn update(&mut self) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::MusicUpdate);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().push(Call::MusicShutdown);
    }

    fn options(&self) -> toml::Table {
        toml::Table::new()
    }
}

pub struct RecordingGame {
    log: Log,
    quit: Option<QuitFlag>,
}

impl Game for RecordingGame {
    fn init(&mut self, setup: &GameSetup, quit: QuitFlag) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::GameInit(setup.clone()));
        self.quit = Some(quit);
        Ok(())
    }

    fn tick(&mut self) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::Tick);
        Ok(())
    }

    fn on_key(&mut self, key: Key, down: bool) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::GameKey(key, down));
        Ok(())
    }

    fn on_text(&mut self, ch: u8) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::GameText(ch));
        Ok(())
    }
}

pub struct RecordingTracker {
    log: Log,
}

impl InputTracker for RecordingTracker {
    fn on_key(&mut self, key: Key, down: bool) {
        self.log.borrow_mut().push(Call::TrackerKey(key, down));
    }
}

pub struct RecordingResources {
    log: Log,
    faults: Faults,
}

impl Resources for RecordingResources {
    fn add_archive(&mut self, path: &Path) -> Result<(), FatalError> {
        self.log
            .borrow_mut()
            .push(Call::AddArchive(path.to_path_buf()));
        Ok(())
    }

    fn init_index(&mut self) -> Result<(), FatalError> {
        self.log.borrow_mut().push(Call::InitIndex);
        if self.faults.index.take() {
            return Err(FatalError::new("F_initwads: scripted failure"));
        }
        Ok(())
    }
}

/// A host on a headless platform with recording collaborators
pub struct Rig {
    pub host: Host<HeadlessPlatform>,
    pub subsystems: Subsystems<HeadlessPlatform>,
    pub handle: HeadlessHandle,
    pub log: Log,
    pub faults: Faults,
}

impl Rig {
    /// Build the rig without running startup
    pub fn new(software: bool) -> Self {
        let platform = HeadlessPlatform::new();
        let handle = platform.handle();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let faults = Faults::default();

        let subsystems = Subsystems {
            renderer: Box::new(RecordingRenderer {
                log: Rc::clone(&log),
                faults: faults.clone(),
                software,
            }),
            sound: Box::new(RecordingSound {
                log: Rc::clone(&log),
                handle: handle.clone(),
            }),
            music: Box::new(RecordingMusic {
                log: Rc::clone(&log),
            }),
            game: Box::new(RecordingGame {
                log: Rc::clone(&log),
                quit: None,
            }),
            input: Box::new(RecordingTracker {
                log: Rc::clone(&log),
            }),
            resources: Box::new(RecordingResources {
                log: Rc::clone(&log),
                faults: faults.clone(),
            }),
        };

        Self {
            host: Host::new(platform),
            subsystems,
            handle,
            log,
            faults,
        }
    }

    /// Build the rig and run startup with a config directory that has no files
    pub fn started(software: bool) -> (Self, Config) {
        let mut rig = Self::new(software);
        let options = LaunchOptions {
            config_dir: scratch_dir("unused-config"),
            ..LaunchOptions::default()
        };
        let config = host::startup(&mut rig.host, &options, &mut rig.subsystems)
            .expect("startup failed");
        rig.log.borrow_mut().clear();
        rig.handle.take_journal();
        (rig, config)
    }

    /// Run one frame-loop iteration
    pub fn step(&mut self) -> Result<(), FatalError> {
        self.host.step(&mut self.subsystems)
    }

    /// Take every call logged so far
    pub fn take_log(&self) -> Vec<Call> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

/// Physical key for a key code
pub fn key(code: KeyCode) -> PhysicalKey {
    PhysicalKey::Code(code)
}

/// Per-process path under the system temp directory; not created
pub fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("doom2d-it-{}-{}", name, std::process::id()))
}
