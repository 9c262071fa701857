//! Sensor module for location fixes and motion readings.

pub mod cache;
pub mod imu;
pub mod location;

pub use cache::SensorSampleCache;
pub use imu::{AccelerometerSample, MotionReading, MotionSensorKind, Vector3};
pub use location::{LocationFix, LocationPriority, LocationRequest};
