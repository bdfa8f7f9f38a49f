//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CinemaError;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory searched for `<name>.json` theme files.
    pub themes_dir: PathBuf,

    /// External tool overrides.
    pub tools: ToolConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Names or paths of the external programs the renderer shells out to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// ImageMagick entry point. `None` tries `magick`, then `convert`.
    pub magick: Option<String>,

    /// ffmpeg binary.
    pub ffmpeg: String,

    /// git binary.
    pub git: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cinema_render=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            themes_dir: PathBuf::from("themes"),
            tools: ToolConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            magick: None,
            ffmpeg: "ffmpeg".to_string(),
            git: "git".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location. A missing file yields the
    /// defaults; an unreadable or malformed one is an error.
    pub fn try_load() -> Result<Self, CinemaError> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, CinemaError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| {
            CinemaError::config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("release-cinema").join("config.json")
}
