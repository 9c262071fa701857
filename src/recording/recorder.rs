//! Track recorder: the Idle/Tracking state machine.
//!
//! Start checks the location permission, clears the path, enters the
//! foreground and subscribes to both feeds. Stop tears the feeds down and
//! exports the recorded path as GPX before returning.
//!
//! Commands are serialized against each other. Feed callbacks only contend
//! with commands for the short critical section around the path store; the
//! export write happens outside it.

use crate::platform::{PlatformServices, TrackingNotice};
use crate::recording::aggregator::Aggregator;
use crate::recording::exporter_gpx::GpxExporter;
use crate::recording::observer::TrackObserver;
use crate::recording::types::{
    ExportOutcome, RecordingStatus, Session, StartOutcome, StopOutcome, TrackPoint, TrackingError,
};
use crate::sensors::cache::SensorSampleCache;
use crate::sensors::imu::{AccelerometerSample, MotionReading};
use crate::sensors::location::{LocationFix, LocationRequest};
use crate::storage::config::AppConfig;
use crate::storage::files::TrackStorage;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

/// Records a track from the location and motion feeds.
#[derive(Debug)]
pub struct TrackRecorder {
    /// Fix/sample fusion and the guarded path store
    aggregator: Aggregator,
    /// GPX serializer used on stop
    exporter: GpxExporter,
    /// Host collaborators
    platform: PlatformServices,
    /// Parameters for the location subscription
    location_request: LocationRequest,
    /// Notification shown while tracking
    notice: TrackingNotice,
    /// Serializes Start/Stop/export commands
    commands: Mutex<()>,
}

impl TrackRecorder {
    /// Create a recorder from configuration, platform services and storage.
    pub fn new(config: &AppConfig, platform: PlatformServices, storage: Arc<dyn TrackStorage>) -> Self {
        let observer = TrackObserver::new(config.recording.observer_capacity);
        Self {
            aggregator: Aggregator::new(Arc::new(SensorSampleCache::new()), observer),
            exporter: GpxExporter::new(storage, config.export.clone()),
            platform,
            location_request: config.location_request(),
            notice: config.tracking_notice(),
            commands: Mutex::new(()),
        }
    }

    /// Start a session.
    ///
    /// A second start while tracking changes nothing and opens no new feed.
    pub fn start(&self) -> Result<StartOutcome, TrackingError> {
        let _command = self.lock_commands();

        if self.status() == RecordingStatus::Tracking {
            tracing::debug!("Start ignored, already tracking");
            return Ok(StartOutcome::AlreadyTracking);
        }

        if !self.platform.permission.has_location_permission() {
            tracing::warn!("Cannot start tracking without location permission");
            return Err(TrackingError::PermissionDenied);
        }

        self.platform.keep_alive.acquire(&self.notice);

        // Points kept from a failed export survive a start that never begins
        if let Err(e) = self.platform.location.request_updates(&self.location_request) {
            tracing::error!("Location feed refused updates: {}", e);
            self.platform.keep_alive.release();
            return Err(TrackingError::FeedUnavailable(e.to_string()));
        }

        let session = Session::new();
        {
            let mut slot = self.aggregator.lock_slot();
            slot.path.clear();
            slot.session = Some(session.clone());
            slot.status = RecordingStatus::Tracking;
        }

        if let Err(e) = self.platform.motion.register() {
            tracing::warn!("Recording without accelerometer: {}", e);
        }

        tracing::info!("Started tracking session {}", session.id);
        Ok(StartOutcome::Started(session))
    }

    /// Stop the session and export what was recorded.
    ///
    /// On a failed write the points are kept for [`Self::export_pending`].
    pub fn stop(&self) -> Result<StopOutcome, TrackingError> {
        let _command = self.lock_commands();

        // Flip to idle and snapshot in one step; later fixes are discarded
        let (session, points) = {
            let mut slot = self.aggregator.lock_slot();
            if slot.status != RecordingStatus::Tracking {
                tracing::debug!("Stop ignored, not tracking");
                return Ok(StopOutcome::NotTracking);
            }
            slot.status = RecordingStatus::Idle;
            (slot.session.take(), slot.path.points().to_vec())
        };

        self.platform.location.remove_updates();
        self.platform.motion.unregister();
        self.platform.keep_alive.release();

        if let Some(session) = &session {
            tracing::info!(
                "Stopped tracking session {} with {} points",
                session.id,
                points.len()
            );
        }

        let outcome = self.export_snapshot(&points)?;
        Ok(outcome.into())
    }

    /// Retry the export of points kept after a failed write.
    pub fn export_pending(&self) -> Result<ExportOutcome, TrackingError> {
        let _command = self.lock_commands();

        let points = {
            let slot = self.aggregator.lock_slot();
            if slot.status == RecordingStatus::Tracking {
                return Err(TrackingError::SessionActive);
            }
            slot.path.points().to_vec()
        };

        self.export_snapshot(&points)
    }

    /// Handle one position update from the location feed.
    pub fn on_location_fix(&self, fix: LocationFix) -> Option<TrackPoint> {
        self.aggregator.on_location_fix(fix)
    }

    /// Handle a location result that may carry no fix.
    pub fn on_location_result(&self, fix: Option<LocationFix>) -> Option<TrackPoint> {
        self.aggregator.on_location_result(fix)
    }

    /// Handle an accelerometer sample.
    pub fn on_sensor_event(&self, sample: AccelerometerSample) {
        self.aggregator.on_sensor_event(sample);
    }

    /// Handle a raw motion reading.
    pub fn on_motion_reading(&self, reading: MotionReading) -> bool {
        self.aggregator.on_motion_reading(reading)
    }

    /// Get the current recording status.
    pub fn status(&self) -> RecordingStatus {
        self.aggregator.lock_slot().status
    }

    /// The running session, if any.
    pub fn session(&self) -> Option<Session> {
        self.aggregator.lock_slot().session.clone()
    }

    /// Number of points held in the path store.
    pub fn point_count(&self) -> usize {
        self.aggregator.lock_slot().path.len()
    }

    /// Copy of the points held in the path store.
    pub fn points(&self) -> Vec<TrackPoint> {
        self.aggregator.lock_slot().path.points().to_vec()
    }

    /// Most recent accelerometer sample.
    pub fn current_sample(&self) -> Option<AccelerometerSample> {
        self.aggregator.cache().current_sample()
    }

    /// Receive every point appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackPoint> {
        self.aggregator.observer().subscribe()
    }

    /// Export a snapshot and drop it from the store once written.
    fn export_snapshot(&self, points: &[TrackPoint]) -> Result<ExportOutcome, TrackingError> {
        match self.exporter.export(points) {
            Ok(outcome) => {
                self.aggregator.lock_slot().path.clear();
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Export failed, keeping {} points: {}", points.len(), e);
                Err(e.into())
            }
        }
    }

    fn lock_commands(&self) -> MutexGuard<'_, ()> {
        self.commands.lock().unwrap_or_else(|e| e.into_inner())
    }
}
