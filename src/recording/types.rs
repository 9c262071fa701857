//! Recording types for track capture and export.

use crate::sensors::imu::AccelerometerSample;
use crate::sensors::location::LocationFix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Status of the track recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingStatus {
    /// Not recording
    #[default]
    Idle,
    /// Feeds are running and fixes are appended
    Tracking,
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingStatus::Idle => write!(f, "Idle"),
            RecordingStatus::Tracking => write!(f, "Tracking"),
        }
    }
}

/// One recorded point of the path.
///
/// Built once from a location fix and the accelerometer sample cached at the
/// time the fix was processed. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timestamp: DateTime<Utc>,
    accel: Option<AccelerometerSample>,
}

impl TrackPoint {
    /// Create a track point.
    pub fn new(
        latitude: f64,
        longitude: f64,
        elevation: f64,
        timestamp: DateTime<Utc>,
        accel: Option<AccelerometerSample>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timestamp,
            accel,
        }
    }

    /// Build a point from a fix. Missing altitude becomes zero.
    ///
    /// Returns `None` if the fix time is outside the representable range.
    pub fn from_fix(fix: &LocationFix, accel: Option<AccelerometerSample>) -> Option<Self> {
        let timestamp = fix.timestamp()?;
        Some(Self::new(
            fix.latitude,
            fix.longitude,
            fix.altitude.unwrap_or(0.0),
            timestamp,
            accel,
        ))
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Elevation in meters (zero when the fix had none).
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Accelerometer sample cached when the fix was processed.
    pub fn accel(&self) -> Option<&AccelerometerSample> {
        self.accel.as_ref()
    }
}

/// An active tracking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Unique identifier
    pub id: Uuid,
    /// When tracking started
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Create a session starting now.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a Start command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session began
    Started(Session),
    /// A session was already running; nothing changed
    AlreadyTracking,
}

/// Result of a Stop command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The track was written to this file
    Exported(PathBuf),
    /// The session ended without any recorded point
    NothingToExport,
    /// No session was running
    NotTracking,
}

/// Result of an export pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The document was written to this file
    Written(PathBuf),
    /// There were no points; no file was created
    NothingToExport,
}

impl From<ExportOutcome> for StopOutcome {
    fn from(outcome: ExportOutcome) -> Self {
        match outcome {
            ExportOutcome::Written(path) => StopOutcome::Exported(path),
            ExportOutcome::NothingToExport => StopOutcome::NothingToExport,
        }
    }
}

/// Errors from the track recorder.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Location permission not granted
    #[error("Location permission not granted")]
    PermissionDenied,

    /// Location feed refused the update request
    #[error("Location feed unavailable: {0}")]
    FeedUnavailable(String),

    /// Operation needs an idle recorder
    #[error("A tracking session is active")]
    SessionActive,

    /// Export at stop failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors during track export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Storage rejected the write
    #[error("Failed to write {}: {reason}", path.display())]
    WriteFailed {
        /// File that was being written
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// XML generation error
    #[error("XML error: {0}")]
    XmlError(String),
}
