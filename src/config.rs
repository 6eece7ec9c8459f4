// Configuration management
//
// Layered TOML configuration: built-in defaults, then `default.toml`, then
// `doom2d.toml`, each merged key by key over the previous layer. Only the
// player bindings and screenshot settings are interpreted here; every other
// table belongs to a collaborator and is carried through untouched.

use crate::error::ConfigError;
use crate::input::{Bindings, PlayerBindings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Shipped defaults, read first
pub const DEFAULT_CONFIG_FILE: &str = "default.toml";

/// User configuration, read last and rewritten on exit
pub const USER_CONFIG_FILE: &str = "doom2d.toml";

const CONFIG_HEADER: &str = "# generated by doom2d, do not modify\n";

/// Screenshot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Save a screenshot on Print Screen
    pub enabled: bool,

    /// Screenshot directory
    pub directory: PathBuf,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("screenshots"),
        }
    }
}

/// Persisted configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub bindings: Bindings,
    pub screenshot: ScreenshotConfig,
    /// Collaborator tables such as `[video]`, `[sound]` and `[music]`
    extra: toml::Table,
}

/// Overlay `layer` onto `base`, descending into tables present in both
pub fn merge_tables(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn take<T: DeserializeOwned>(table: &mut toml::Table, key: &str) -> Result<Option<T>, ConfigError> {
    match table.remove(key) {
        Some(value) => Ok(Some(value.try_into()?)),
        None => Ok(None),
    }
}

/// Read one layer; a missing file is not an error
fn read_layer(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&contents)?))
}

impl Config {
    /// Build a configuration from a fully merged table
    ///
    /// Missing sections fall back to their defaults.
    pub fn from_table(mut table: toml::Table) -> Result<Self, ConfigError> {
        let defaults = Bindings::default();
        let player1: Option<PlayerBindings> = take(&mut table, "player1")?;
        let player2: Option<PlayerBindings> = take(&mut table, "player2")?;
        let screenshot: Option<ScreenshotConfig> = take(&mut table, "screenshot")?;

        Ok(Self {
            bindings: Bindings {
                player1: player1.unwrap_or(defaults.player1),
                player2: player2.unwrap_or(defaults.player2),
            },
            screenshot: screenshot.unwrap_or_default(),
            extra: table,
        })
    }

    /// Flatten back into a single TOML table
    pub fn to_table(&self) -> Result<toml::Table, ConfigError> {
        let mut table = self.extra.clone();
        table.insert(
            "player1".to_string(),
            toml::Value::try_from(self.bindings.player1)?,
        );
        table.insert(
            "player2".to_string(),
            toml::Value::try_from(self.bindings.player2)?,
        );
        table.insert(
            "screenshot".to_string(),
            toml::Value::try_from(&self.screenshot)?,
        );
        Ok(table)
    }

    /// A collaborator's table, or an empty one
    pub fn section(&self, name: &str) -> toml::Table {
        match self.extra.get(name) {
            Some(toml::Value::Table(table)) => table.clone(),
            _ => toml::Table::new(),
        }
    }

    /// Replace a collaborator's table; an empty table removes the section
    pub fn set_section(&mut self, name: &str, table: toml::Table) {
        if table.is_empty() {
            self.extra.remove(name);
        } else {
            self.extra
                .insert(name.to_string(), toml::Value::Table(table));
        }
    }

    /// Load the layered configuration from `dir`
    ///
    /// Never fails: a missing layer is skipped, and a layer that cannot be
    /// read or does not fit the schema is skipped with a warning.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding `default.toml` and `doom2d.toml`
    pub fn load(dir: &Path) -> Self {
        let mut table = match Self::default().to_table() {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, "config: cannot build defaults");
                return Self::default();
            }
        };

        for name in [DEFAULT_CONFIG_FILE, USER_CONFIG_FILE] {
            let path = dir.join(name);
            let layer = match read_layer(&path) {
                Ok(Some(layer)) => layer,
                Ok(None) => {
                    debug!(path = %path.display(), "config: not found");
                    continue;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "config: ignoring file");
                    continue;
                }
            };

            let mut merged = table.clone();
            merge_tables(&mut merged, layer);
            match Self::from_table(merged.clone()) {
                Ok(_) => {
                    table = merged;
                    info!(path = %path.display(), "config: loaded");
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "config: ignoring file");
                }
            }
        }

        // Every accepted layer was validated above
        Self::from_table(table).unwrap_or_default()
    }

    /// Write `doom2d.toml` into `dir`
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ConfigError> {
        let body = toml::to_string_pretty(&self.to_table()?)?;
        let path = dir.join(USER_CONFIG_FILE);
        fs::write(&path, format!("{}{}", CONFIG_HEADER, body))?;
        Ok(path)
    }
}
