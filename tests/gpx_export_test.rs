//! Integration tests for the exported GPX files.

mod common;

use common::{create_recorder, file_names, fix, BASE_TIME_MS};
use mototrack::platform::SimulatedPlatform;
use mototrack::recording::exporter_gpx::{render_gpx, GpxExporter};
use mototrack::recording::types::{ExportError, ExportOutcome, TrackPoint};
use mototrack::sensors::imu::MotionReading;
use mototrack::sensors::location::LocationFix;
use mototrack::storage::config::ExportSettings;
use mototrack::storage::files::DirectoryStorage;
use mototrack::{StopOutcome, TrackingError};
use chrono::{Local, TimeZone};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Record the two-fix scenario: one accelerometer reading, then fixes A and B.
fn record_two_fix_track(temp: &TempDir) -> PathBuf {
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());
    recorder.start().unwrap();

    recorder.on_motion_reading(MotionReading::accelerometer(0.1, 0.2, 9.8));
    recorder.on_location_fix(fix(1.0, 1.0, 10.0, 1));
    recorder.on_location_fix(fix(2.0, 2.0, 20.0, 2));

    match recorder.stop().unwrap() {
        StopOutcome::Exported(path) => path,
        other => panic!("expected an exported file, got {other:?}"),
    }
}

#[test]
fn test_two_fix_scenario_reuses_cached_sample() {
    let temp = TempDir::new().unwrap();
    let path = record_two_fix_track(&temp);
    let xml = std::fs::read_to_string(&path).unwrap();

    assert_eq!(xml.matches("<trkpt ").count(), 2);
    assert_eq!(xml.matches("<desc>accel x:0.1 y:0.2 z:9.8</desc>").count(), 2);
    assert!(xml.contains("<trkpt lat=\"1\" lon=\"1\">"));
    assert!(xml.contains("<ele>10</ele>"));
    assert!(xml.contains("<time>2025-01-15T10:00:01Z</time>"));
    assert!(xml.contains("<trkpt lat=\"2\" lon=\"2\">"));
    assert!(xml.contains("<ele>20</ele>"));
    assert!(xml.contains("<time>2025-01-15T10:00:02Z</time>"));
}

#[test]
fn test_exported_file_name_and_location() {
    let temp = TempDir::new().unwrap();
    let path = record_two_fix_track(&temp);

    assert_eq!(path.parent().unwrap(), temp.path());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("MotoTrack_"));
    assert!(name.ends_with(".gpx"));
    // MotoTrack_yyyyMMdd_HHmmss.gpx
    assert_eq!(name.len(), "MotoTrack_".len() + 15 + ".gpx".len());
    assert_eq!(file_names(temp.path()), vec![name]);
}

#[test]
fn test_export_directory_created_on_demand() {
    let temp = TempDir::new().unwrap();
    let export_dir = temp.path().join("files").join("Documents");
    let (recorder, _) = create_recorder(&export_dir, SimulatedPlatform::new());

    recorder.start().unwrap();
    recorder.on_location_fix(fix(1.0, 1.0, 0.0, 0));
    recorder.stop().unwrap();

    assert_eq!(file_names(&export_dir).len(), 1);
}

#[test]
fn test_exported_file_is_valid_gpx() {
    let temp = TempDir::new().unwrap();
    let path = record_two_fix_track(&temp);

    let file = std::fs::File::open(&path).unwrap();
    let gpx = gpx::read(BufReader::new(file)).unwrap();

    assert_eq!(gpx.version, gpx::GpxVersion::Gpx11);
    assert_eq!(gpx.tracks.len(), 1);
    assert_eq!(gpx.tracks[0].name.as_deref(), Some("Track"));
    assert_eq!(gpx.tracks[0].segments.len(), 1);

    let points = &gpx.tracks[0].segments[0].points;
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].point().y(), 1.0);
    assert_eq!(points[1].point().x(), 2.0);
    assert_eq!(points[1].elevation, Some(20.0));
    assert_eq!(
        points[0].description.as_deref(),
        Some("accel x:0.1 y:0.2 z:9.8")
    );
}

#[test]
fn test_point_without_sample_has_no_desc() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());
    recorder.start().unwrap();

    // No altitude and no accelerometer event ever delivered
    recorder.on_location_fix(LocationFix::new(45.5, -122.5, BASE_TIME_MS));
    let StopOutcome::Exported(path) = recorder.stop().unwrap() else {
        panic!("expected an exported file");
    };
    let xml = std::fs::read_to_string(path).unwrap();

    assert!(!xml.contains("<desc>"));
    assert!(xml.contains("<ele>0</ele>"));
    assert!(xml.contains("<trkpt lat=\"45.5\" lon=\"-122.5\">"));
}

#[test]
fn test_export_content_is_stable_for_fixed_input() {
    let temp = TempDir::new().unwrap();
    let exporter = GpxExporter::new(
        Arc::new(DirectoryStorage::new(temp.path())),
        ExportSettings::default(),
    );
    let points: Vec<TrackPoint> = (0..3)
        .map(|i| TrackPoint::from_fix(&fix(i as f64, i as f64, 5.0, i), None).unwrap())
        .collect();

    let first_at = Local.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
    let second_at = Local.with_ymd_and_hms(2025, 1, 15, 11, 30, 0).unwrap();

    let ExportOutcome::Written(first) = exporter.export_at(&points, first_at).unwrap() else {
        panic!("expected a written file");
    };
    let ExportOutcome::Written(second) = exporter.export_at(&points, second_at).unwrap() else {
        panic!("expected a written file");
    };

    assert_ne!(first, second);
    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        render_gpx(&points, "MOTOGPx", "Track").unwrap()
    );
}

#[test]
fn test_write_failure_surfaces_attempted_path() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("Documents");
    std::fs::write(&blocker, "not a directory").unwrap();

    let (recorder, _) = create_recorder(&blocker, SimulatedPlatform::new());
    recorder.start().unwrap();
    recorder.on_location_fix(fix(1.0, 1.0, 0.0, 0));

    match recorder.stop() {
        Err(TrackingError::Export(ExportError::WriteFailed { path, .. })) => {
            assert_eq!(path.parent().unwrap(), blocker);
            assert!(path.to_string_lossy().ends_with(".gpx"));
        }
        other => panic!("expected a write failure, got {other:?}"),
    }

    // Points survive for a retry, and nothing half-written exists
    assert_eq!(recorder.point_count(), 1);
    assert_eq!(file_names(temp.path()), vec!["Documents".to_string()]);
}
