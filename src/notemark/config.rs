use crate::autosave::AutosaveTimings;
use crate::error::{NoteMarkError, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_NOTES_DIR: &str = "NoteMark";

pub const DIR_ENV: &str = "NOTEMARK_DIR";
pub const CONFIG_DIR_ENV: &str = "NOTEMARK_CONFIG_DIR";

/// Keys accepted by [`NoteMarkConfig::get`] and [`NoteMarkConfig::set`].
pub const KEYS: [&str; 4] = ["notes-dir", "throttle-ms", "inactivity-ms", "blur-grace-ms"];

/// Configuration for notemark, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteMarkConfig {
    /// Notes root; `<home>/NoteMark` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_dir: Option<PathBuf>,

    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    #[serde(default = "default_inactivity_ms")]
    pub inactivity_ms: u64,

    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,
}

fn default_throttle_ms() -> u64 {
    3000
}

fn default_inactivity_ms() -> u64 {
    10_500
}

fn default_blur_grace_ms() -> u64 {
    200
}

impl Default for NoteMarkConfig {
    fn default() -> Self {
        Self {
            notes_dir: None,
            throttle_ms: default_throttle_ms(),
            inactivity_ms: default_inactivity_ms(),
            blur_grace_ms: default_blur_grace_ms(),
        }
    }
}

impl NoteMarkConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NoteMarkError::Io)?;
        let config: NoteMarkConfig =
            serde_json::from_str(&content).map_err(NoteMarkError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir).map_err(NoteMarkError::Io)?;

        let content = serde_json::to_string_pretty(self).map_err(NoteMarkError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(NoteMarkError::Io)?;
        Ok(())
    }

    pub fn timings(&self) -> AutosaveTimings {
        AutosaveTimings {
            throttle: Duration::from_millis(self.throttle_ms),
            inactivity: Duration::from_millis(self.inactivity_ms),
            blur_grace: Duration::from_millis(self.blur_grace_ms),
        }
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "notes-dir" => self
                .notes_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "throttle-ms" => self.throttle_ms.to_string(),
            "inactivity-ms" => self.inactivity_ms.to_string(),
            "blur-grace-ms" => self.blur_grace_ms.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set `key` from its textual form. An empty `notes-dir` unsets it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "notes-dir" => {
                self.notes_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "throttle-ms" => self.throttle_ms = parse_millis(key, value)?,
            "inactivity-ms" => self.inactivity_ms = parse_millis(key, value)?,
            "blur-grace-ms" => self.blur_grace_ms = parse_millis(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Notes root: `override_dir`, then `$NOTEMARK_DIR`, then the configured
    /// directory, then `<home>/NoteMark`.
    pub fn resolve_notes_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Some(dir) = env::var_os(DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.notes_dir {
            return dir.clone();
        }
        UserDirs::new()
            .map(|dirs| dirs.home_dir().join(DEFAULT_NOTES_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTES_DIR))
    }
}

/// Where `config.json` lives: `$NOTEMARK_CONFIG_DIR`, else the platform
/// config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "notemark", "notemark")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| NoteMarkError::Store("Could not determine config directory".to_string()))
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| NoteMarkError::Api(format!("{} expects milliseconds, got '{}'", key, value)))
}

fn unknown_key(key: &str) -> NoteMarkError {
    NoteMarkError::Api(format!(
        "Unknown config key '{}'. Known keys: {}",
        key,
        KEYS.join(", ")
    ))
}
