//! Ordered, append-only storage for the points of the active session.

use crate::recording::types::TrackPoint;

/// Points recorded in the current session, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct PathStore {
    points: Vec<TrackPoint>,
}

impl PathStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point at the end of the path.
    pub fn append(&mut self, point: TrackPoint) {
        self.points.push(point);
    }

    /// Drop every point; used when a new session begins.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Recorded points in insertion order.
    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
