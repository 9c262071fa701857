//! Storage module for configuration and exported files.

pub mod config;
pub mod files;

pub use config::{AppConfig, ConfigError, ExportSettings, NotificationSettings, RecordingSettings};
pub use files::{DirectoryStorage, TrackStorage};
