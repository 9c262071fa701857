//! Recording module for track capture and GPX export.

pub mod aggregator;
pub mod exporter_gpx;
pub mod observer;
pub mod path_store;
pub mod recorder;
pub mod types;

pub use aggregator::Aggregator;
pub use exporter_gpx::{gpx_file_name, render_gpx, GpxExporter};
pub use observer::TrackObserver;
pub use path_store::PathStore;
pub use recorder::TrackRecorder;
pub use types::{
    ExportError, ExportOutcome, RecordingStatus, Session, StartOutcome, StopOutcome, TrackPoint,
    TrackingError,
};
