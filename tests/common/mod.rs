//! Shared helpers for integration tests.

#![allow(dead_code)]

use mototrack::platform::{PlatformServices, SimulatedPlatform};
use mototrack::sensors::location::LocationFix;
use mototrack::storage::config::AppConfig;
use mototrack::storage::files::DirectoryStorage;
use mototrack::TrackRecorder;
use std::path::Path;
use std::sync::Arc;

/// Epoch milliseconds of 2025-01-15T10:00:00Z.
pub const BASE_TIME_MS: i64 = 1_736_935_200_000;

/// Recorder exporting into `export_dir`, wired to a simulated platform.
pub fn create_recorder(
    export_dir: &Path,
    platform: SimulatedPlatform,
) -> (Arc<TrackRecorder>, Arc<SimulatedPlatform>) {
    let mut config = AppConfig::default();
    config.export.directory = Some(export_dir.to_path_buf());

    let platform = Arc::new(platform);
    let storage = Arc::new(DirectoryStorage::new(config.export_dir()));
    let recorder = TrackRecorder::new(
        &config,
        PlatformServices::from_shared(platform.clone()),
        storage,
    );
    (Arc::new(recorder), platform)
}

/// Fix `seconds` after the base time.
pub fn fix(lat: f64, lon: f64, ele: f64, seconds: i64) -> LocationFix {
    LocationFix::new(lat, lon, BASE_TIME_MS + seconds * 1000).with_altitude(ele)
}

/// Names of the files in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
