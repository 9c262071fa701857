//! Motion sensor readings.
//!
//! Raw three-axis readings arrive from the platform motion feed. Only the
//! accelerometer is of interest to the tracker; its readings are kept as
//! [`AccelerometerSample`] values stamped with their arrival time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 3D vector for accelerometer/gyroscope readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X-axis component
    pub x: f32,
    /// Y-axis component
    pub y: f32,
    /// Z-axis component
    pub z: f32,
}

impl Vector3 {
    /// Create a new vector with specified components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Kind of motion sensor a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionSensorKind {
    /// Linear acceleration including gravity (m/s²)
    Accelerometer,
    /// Angular velocity (rad/s)
    Gyroscope,
    /// Magnetic field (µT)
    Magnetometer,
    /// Anything else the platform reports
    Other,
}

impl std::fmt::Display for MotionSensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotionSensorKind::Accelerometer => write!(f, "Accelerometer"),
            MotionSensorKind::Gyroscope => write!(f, "Gyroscope"),
            MotionSensorKind::Magnetometer => write!(f, "Magnetometer"),
            MotionSensorKind::Other => write!(f, "Other"),
        }
    }
}

/// A raw reading as delivered by the motion feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionReading {
    /// Sensor that produced the reading
    pub sensor: MotionSensorKind,
    /// Axis values
    pub values: Vector3,
}

impl MotionReading {
    /// Create a new reading.
    pub fn new(sensor: MotionSensorKind, values: Vector3) -> Self {
        Self { sensor, values }
    }

    /// Shorthand for an accelerometer reading.
    pub fn accelerometer(x: f32, y: f32, z: f32) -> Self {
        Self::new(MotionSensorKind::Accelerometer, Vector3::new(x, y, z))
    }
}

/// The accelerometer reading attached to a track point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerometerSample {
    /// Acceleration along each axis (m/s²)
    pub acceleration: Vector3,
    /// When the reading reached the tracker
    pub received_at: DateTime<Utc>,
}

impl AccelerometerSample {
    /// Create a sample received now.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self::received_at(Vector3::new(x, y, z), Utc::now())
    }

    /// Create a sample with an explicit arrival time.
    pub fn received_at(acceleration: Vector3, received_at: DateTime<Utc>) -> Self {
        Self {
            acceleration,
            received_at,
        }
    }

    pub fn x(&self) -> f32 {
        self.acceleration.x
    }

    pub fn y(&self) -> f32 {
        self.acceleration.y
    }

    pub fn z(&self) -> f32 {
        self.acceleration.z
    }
}
