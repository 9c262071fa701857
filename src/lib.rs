//! MotoTrack - position tracking and GPX export core
//!
//! Records location fixes while a session is running, annotates each fix with
//! the latest accelerometer reading, streams the points to live listeners and
//! writes the finished path as a GPX 1.1 file when the session stops.

pub mod platform;
pub mod recording;
pub mod replay;
pub mod sensors;
pub mod storage;

// Re-export commonly used types
pub use platform::{PlatformServices, SimulatedPlatform};
pub use recording::recorder::TrackRecorder;
pub use recording::types::{StartOutcome, StopOutcome, TrackPoint, TrackingError};
pub use sensors::cache::SensorSampleCache;
pub use storage::config::AppConfig;
