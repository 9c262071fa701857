//! Live delivery of appended track points.
//!
//! Any number of listeners (typically a map view) subscribe and receive each
//! point as soon as it is appended. Delivery is fire-and-forget: a listener
//! that falls more than the channel capacity behind, or that has been
//! dropped, simply misses points.

use crate::recording::types::TrackPoint;
use tokio::sync::broadcast;

/// Default number of points buffered per subscriber.
pub const DEFAULT_OBSERVER_CAPACITY: usize = 256;

/// Publish side of the track point channel.
#[derive(Debug, Clone)]
pub struct TrackObserver {
    point_tx: broadcast::Sender<TrackPoint>,
}

impl Default for TrackObserver {
    fn default() -> Self {
        Self::new(DEFAULT_OBSERVER_CAPACITY)
    }
}

impl TrackObserver {
    /// Create a channel buffering up to `capacity` points per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (point_tx, _) = broadcast::channel(capacity.max(1));
        Self { point_tx }
    }

    /// Subscribe to points appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackPoint> {
        self.point_tx.subscribe()
    }

    /// Deliver a point to every current subscriber.
    pub fn publish(&self, point: &TrackPoint) {
        // No subscribers is fine
        let _ = self.point_tx.send(point.clone());
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.point_tx.receiver_count()
    }
}
