//! Replays a recorded feed log through a [`TrackRecorder`].
//!
//! The log is JSON lines, one [`ReplayEvent`] per line. Blank lines and lines
//! starting with `#` are skipped. Fixes and motion readings are only delivered
//! while the simulated platform has the matching feed subscribed, the same
//! way a real location service stops calling back after unsubscribe.

use crate::platform::SimulatedPlatform;
use crate::recording::{StartOutcome, StopOutcome, TrackRecorder, TrackingError};
use crate::sensors::imu::{MotionReading, MotionSensorKind, Vector3};
use crate::sensors::location::LocationFix;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::Arc;
use thiserror::Error;

/// One line of a feed log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// User pressed Start
    Start,
    /// User pressed Stop
    Stop,
    /// Position update
    Fix {
        lat: f64,
        lon: f64,
        #[serde(default)]
        ele: Option<f64>,
        time_ms: i64,
    },
    /// Motion sensor reading
    Motion {
        #[serde(default = "default_sensor")]
        sensor: MotionSensorKind,
        x: f32,
        y: f32,
        z: f32,
    },
    /// Location permission granted in system settings
    GrantPermission,
    /// Location permission revoked in system settings
    RevokePermission,
}

fn default_sensor() -> MotionSensorKind {
    MotionSensorKind::Accelerometer
}

/// Errors while reading a feed log.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Parse a JSON-lines feed log.
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<ReplayEvent>, ReplayError> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event = serde_json::from_str(trimmed).map_err(|e| ReplayError::Parse {
            line: index + 1,
            reason: e.to_string(),
        })?;
        events.push(event);
    }

    Ok(events)
}

/// What happened during a replay.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    /// Sessions that actually started
    pub sessions_started: usize,
    /// Outcome of every stop that ended a session
    pub stops: Vec<StopOutcome>,
    /// Command errors, in order
    pub errors: Vec<String>,
    /// Fixes that became track points
    pub points_recorded: usize,
    /// Fixes dropped because no feed was subscribed
    pub fixes_dropped: usize,
}

/// Drives a recorder from feed log events.
pub struct Replayer {
    recorder: Arc<TrackRecorder>,
    platform: Arc<SimulatedPlatform>,
    summary: ReplaySummary,
}

impl Replayer {
    /// The recorder must have been built on `platform`.
    pub fn new(recorder: Arc<TrackRecorder>, platform: Arc<SimulatedPlatform>) -> Self {
        Self {
            recorder,
            platform,
            summary: ReplaySummary::default(),
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &ReplayEvent) {
        match event {
            ReplayEvent::Start => match self.recorder.start() {
                Ok(StartOutcome::Started(session)) => {
                    tracing::info!("Replay: session {} started", session.id);
                    self.summary.sessions_started += 1;
                }
                Ok(StartOutcome::AlreadyTracking) => {}
                Err(e) => self.record_error(e),
            },
            ReplayEvent::Stop => self.stop(),
            ReplayEvent::Fix {
                lat,
                lon,
                ele,
                time_ms,
            } => {
                if !self.platform.is_location_active() {
                    self.summary.fixes_dropped += 1;
                    return;
                }
                let mut fix = LocationFix::new(*lat, *lon, *time_ms);
                fix.altitude = *ele;
                if self.recorder.on_location_fix(fix).is_some() {
                    self.summary.points_recorded += 1;
                }
            }
            ReplayEvent::Motion { sensor, x, y, z } => {
                if self.platform.is_motion_active() {
                    self.recorder
                        .on_motion_reading(MotionReading::new(*sensor, Vector3::new(*x, *y, *z)));
                }
            }
            ReplayEvent::GrantPermission => self.platform.set_permission(true),
            ReplayEvent::RevokePermission => self.platform.set_permission(false),
        }
    }

    /// Apply every event, then stop a session left running.
    pub fn run<'a, I>(mut self, events: I) -> ReplaySummary
    where
        I: IntoIterator<Item = &'a ReplayEvent>,
    {
        for event in events {
            self.apply(event);
        }
        self.stop();
        self.summary
    }

    fn stop(&mut self) {
        match self.recorder.stop() {
            Ok(StopOutcome::NotTracking) => {}
            Ok(outcome) => self.summary.stops.push(outcome),
            Err(e) => self.record_error(e),
        }
    }

    fn record_error(&mut self, error: TrackingError) {
        tracing::warn!("Replay: {}", error);
        self.summary.errors.push(error.to_string());
    }
}
