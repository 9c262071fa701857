//! Fuses location fixes with the latest accelerometer sample.
//!
//! Fixes and sensor events come from independent feeds and may be delivered
//! on different threads. A fix is paired with whatever sample is cached when
//! it is processed; the two are only loosely time-correlated.

use crate::recording::observer::TrackObserver;
use crate::recording::path_store::PathStore;
use crate::recording::types::{RecordingStatus, Session, TrackPoint};
use crate::sensors::cache::SensorSampleCache;
use crate::sensors::imu::{AccelerometerSample, MotionReading};
use crate::sensors::location::LocationFix;
use std::sync::{Arc, Mutex, MutexGuard};

/// Session status and recorded path, guarded together so that the
/// status check and the append happen in one critical section.
#[derive(Debug, Default)]
pub(crate) struct RecordingSlot {
    pub(crate) status: RecordingStatus,
    pub(crate) session: Option<Session>,
    pub(crate) path: PathStore,
}

/// Turns incoming fixes into track points.
#[derive(Debug)]
pub struct Aggregator {
    cache: Arc<SensorSampleCache>,
    slot: Mutex<RecordingSlot>,
    observer: TrackObserver,
}

impl Aggregator {
    /// Create an aggregator publishing to `observer`.
    pub fn new(cache: Arc<SensorSampleCache>, observer: TrackObserver) -> Self {
        Self {
            cache,
            slot: Mutex::new(RecordingSlot::default()),
            observer,
        }
    }

    /// Handle one position update.
    ///
    /// Returns the appended point, or `None` if the fix was discarded because
    /// no session is tracking.
    pub fn on_location_fix(&self, fix: LocationFix) -> Option<TrackPoint> {
        let accel = self.cache.current_sample();

        let Some(point) = TrackPoint::from_fix(&fix, accel) else {
            tracing::warn!("Discarding fix with unrepresentable time {}", fix.time_ms);
            return None;
        };

        let mut slot = self.lock_slot();
        if slot.status != RecordingStatus::Tracking {
            tracing::debug!("Discarding fix received while idle");
            return None;
        }

        slot.path.append(point.clone());
        // Publish under the lock so subscribers see append order
        self.observer.publish(&point);

        tracing::debug!(
            "Recorded point {} ({:.6}, {:.6})",
            slot.path.len(),
            point.latitude(),
            point.longitude()
        );
        Some(point)
    }

    /// Handle a location result that may carry no fix.
    pub fn on_location_result(&self, fix: Option<LocationFix>) -> Option<TrackPoint> {
        fix.and_then(|fix| self.on_location_fix(fix))
    }

    /// Store an accelerometer sample for subsequent fixes.
    pub fn on_sensor_event(&self, sample: AccelerometerSample) {
        self.cache.on_sensor_event(sample);
    }

    /// Feed a raw motion reading; non-accelerometer readings are ignored.
    pub fn on_motion_reading(&self, reading: MotionReading) -> bool {
        self.cache.on_motion_reading(reading)
    }

    /// Channel that receives every appended point.
    pub fn observer(&self) -> &TrackObserver {
        &self.observer
    }

    /// Shared sensor cache.
    pub fn cache(&self) -> &SensorSampleCache {
        &self.cache
    }

    pub(crate) fn lock_slot(&self) -> MutexGuard<'_, RecordingSlot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
