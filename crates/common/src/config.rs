//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::LivemixResult;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Preview canvas and composition defaults.
    pub preview: PreviewDefaults,

    /// Screen and window capture parameters.
    pub screen_capture: ScreenCaptureDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Defaults applied to the preview composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewDefaults {
    /// Width (source space) given to a newly added source.
    pub source_width: i32,

    /// Height (source space) given to a newly added source.
    pub source_height: i32,

    /// Output frame rate requested from the engine.
    pub output_frame_rate: u32,

    /// Maximum rate of live (non-committing) drag updates in Hz.
    /// Zero disables throttling.
    pub live_update_hz: u32,
}

/// Screen/window capture parameters handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenCaptureDefaults {
    pub width: u32,
    pub height: u32,
    /// Bitrate in Kbps.
    pub bitrate: u32,
    pub frame_rate: u32,
    pub capture_cursor: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "livemix=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for PreviewDefaults {
    fn default() -> Self {
        Self {
            source_width: 300,
            source_height: 300,
            output_frame_rate: 25,
            live_update_hz: 60,
        }
    }
}

impl Default for ScreenCaptureDefaults {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            bitrate: 1000,
            frame_rate: 15,
            capture_cursor: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match Self::from_json(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Parse a config document. Missing fields take their defaults.
    pub fn from_json(content: &str) -> LivemixResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> LivemixResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Write config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> LivemixResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
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
    base.join("livemix").join("config.json")
}
