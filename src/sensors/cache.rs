//! Latest accelerometer sample.
//!
//! The cache holds exactly one value. Every accelerometer event replaces it;
//! nothing is averaged or archived. Location fixes read whatever is there at
//! the moment they are processed.

use crate::sensors::imu::{AccelerometerSample, MotionReading, MotionSensorKind};
use chrono::Utc;
use std::sync::RwLock;

/// Single-slot, last-writer-wins store for the most recent accelerometer sample.
#[derive(Debug, Default)]
pub struct SensorSampleCache {
    latest: RwLock<Option<AccelerometerSample>>,
}

impl SensorSampleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached sample.
    pub fn on_sensor_event(&self, sample: AccelerometerSample) {
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *latest = Some(sample);
    }

    /// Feed a raw motion reading. Readings from other sensors are ignored.
    ///
    /// Returns `true` if the cache was updated.
    pub fn on_motion_reading(&self, reading: MotionReading) -> bool {
        if reading.sensor != MotionSensorKind::Accelerometer {
            tracing::trace!("Ignoring {} reading", reading.sensor);
            return false;
        }

        self.on_sensor_event(AccelerometerSample::received_at(reading.values, Utc::now()));
        true
    }

    /// Snapshot of the cached sample, or `None` if nothing has arrived yet.
    pub fn current_sample(&self) -> Option<AccelerometerSample> {
        *self.latest.read().unwrap_or_else(|e| e.into_inner())
    }
}
