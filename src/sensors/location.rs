//! Position fixes and location request parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One position update from the location feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude above the WGS84 ellipsoid in meters, if the provider reported one
    pub altitude: Option<f64>,
    /// Capture time in milliseconds since the Unix epoch
    pub time_ms: i64,
}

impl LocationFix {
    /// Create a fix without altitude.
    pub fn new(latitude: f64, longitude: f64, time_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            time_ms,
        }
    }

    /// Attach an altitude.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Capture time as a UTC instant, if representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time_ms)
    }
}

/// Accuracy/power trade-off requested from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPriority {
    /// GPS-grade accuracy
    #[default]
    HighAccuracy,
    /// Cell/Wi-Fi grade accuracy
    Balanced,
    /// Only piggy-back on fixes requested by others
    Passive,
}

/// Parameters sent to the location feed when tracking starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    /// Desired update interval in milliseconds
    pub interval_ms: u64,
    /// Minimum displacement between updates in meters
    pub min_distance_m: f32,
    /// Provider priority
    pub priority: LocationPriority,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            min_distance_m: 1.0,
            priority: LocationPriority::HighAccuracy,
        }
    }
}
