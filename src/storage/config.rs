//! Application configuration.
//!
//! Loaded from a TOML file in the platform data directory. A missing file
//! yields defaults.

use crate::platform::TrackingNotice;
use crate::recording::observer::DEFAULT_OBSERVER_CAPACITY;
use crate::sensors::location::{LocationPriority, LocationRequest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Recording settings
    pub recording: RecordingSettings,
    /// Export settings
    pub export: ExportSettings,
    /// Ongoing-tracking notification
    pub notification: NotificationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: get_data_dir(),
            recording: RecordingSettings::default(),
            export: ExportSettings::default(),
            notification: NotificationSettings::default(),
        }
    }
}

impl AppConfig {
    /// Directory exported tracks are written to.
    pub fn export_dir(&self) -> PathBuf {
        match &self.export.directory {
            Some(dir) => dir.clone(),
            None => self.data_dir.join(&self.export.subdirectory),
        }
    }

    /// Location request sent to the feed when tracking starts.
    pub fn location_request(&self) -> LocationRequest {
        LocationRequest {
            interval_ms: self.recording.location_interval_ms,
            min_distance_m: self.recording.min_distance_m,
            priority: self.recording.priority,
        }
    }

    /// Notice shown while tracking.
    pub fn tracking_notice(&self) -> TrackingNotice {
        TrackingNotice {
            title: self.notification.title.clone(),
            text: self.notification.text.clone(),
        }
    }
}

/// Recording-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingSettings {
    /// Requested interval between fixes
    pub location_interval_ms: u64,
    /// Minimum displacement between fixes
    pub min_distance_m: f32,
    /// Provider priority
    pub priority: LocationPriority,
    /// Points buffered per live subscriber
    pub observer_capacity: usize,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        let request = LocationRequest::default();
        Self {
            location_interval_ms: request.interval_ms,
            min_distance_m: request.min_distance_m,
            priority: request.priority,
            observer_capacity: DEFAULT_OBSERVER_CAPACITY,
        }
    }
}

/// Export-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// File name prefix
    pub file_prefix: String,
    /// `creator` attribute of the GPX root
    pub creator: String,
    /// Name of the exported track
    pub track_name: String,
    /// Subdirectory of the data directory
    pub subdirectory: String,
    /// Explicit destination, overriding `subdirectory`
    pub directory: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: "MotoTrack".to_string(),
            creator: "MOTOGPx".to_string(),
            track_name: "Track".to_string(),
            subdirectory: "Documents".to_string(),
            directory: None,
        }
    }
}

/// Notification text shown while tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub title: String,
    pub text: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        let notice = TrackingNotice::default();
        Self {
            title: notice.title,
            text: notice.text,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "mototrack", "MotoTrack")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = get_data_dir();

    Ok(config)
}

/// Save configuration to `path`.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
