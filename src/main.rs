// Doom 2D - Main Entry Point
//
// Brings up the desktop platform and runs the frame loop with the demo
// collaborators: a test-pattern renderer and a game that only logs input.

mod demo;

use clap::Parser;
use doom2d_platform::host::{self, LaunchOptions};
use doom2d_platform::{DesktopPlatform, Host};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "doom2d")]
#[command(about = "Doom 2D", version)]
struct Args {
    /// Extra archive to load after doom2d.wad (repeatable)
    #[arg(long = "file", value_name = "WAD")]
    files: Vec<PathBuf>,

    /// Enable cheat codes
    #[arg(long)]
    cheat: bool,

    /// Turn monster-spawning suppression off
    #[arg(long)]
    mon: bool,

    /// Start on the given map
    #[arg(long, value_name = "MAP")]
    warp: Option<u8>,

    /// Use the 8-bit indexed software surface instead of the hardware context
    #[arg(long)]
    software: bool,

    /// Directory holding default.toml and doom2d.toml
    #[arg(long, value_name = "DIR", default_value = ".")]
    config_dir: PathBuf,
}

impl Args {
    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            files: self.files.clone(),
            cheat: self.cheat,
            no_monsters: self.mon.then_some(false),
            warp: self.warp,
            config_dir: self.config_dir.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("system: initialize platform");
    let platform = match DesktopPlatform::new() {
        Ok(platform) => platform,
        Err(err) => {
            error!(error = %err, "system: failed to initialize platform");
            eprintln!("{}", err);
            return ExitCode::from(1);
        }
    };

    let options = args.launch_options();
    let mut host = Host::new(platform);
    let mut subsystems = demo::subsystems(args.software);

    let config = match host::startup(&mut host, &options, &mut subsystems) {
        Ok(config) => config,
        Err(err) => host::abort_on_fatal(host, &mut subsystems, err),
    };
    if let Err(err) = host::run_native(&mut host, &mut subsystems) {
        host::abort_on_fatal(host, &mut subsystems, err);
    }
    host::shutdown(host, config, &mut subsystems, &options.config_dir);
    ExitCode::SUCCESS
}
