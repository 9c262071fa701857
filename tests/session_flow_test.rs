//! Integration tests for the Start/Stop session flow.

mod common;

use common::{create_recorder, file_names, fix};
use mototrack::platform::SimulatedPlatform;
use mototrack::recording::types::RecordingStatus;
use mototrack::sensors::imu::AccelerometerSample;
use mototrack::{StartOutcome, StopOutcome, TrackingError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_full_tracking_flow() {
    let temp = TempDir::new().unwrap();
    let (recorder, platform) = create_recorder(temp.path(), SimulatedPlatform::new());

    assert_eq!(recorder.status(), RecordingStatus::Idle);
    assert!(matches!(recorder.start().unwrap(), StartOutcome::Started(_)));
    assert_eq!(recorder.status(), RecordingStatus::Tracking);
    assert!(recorder.session().is_some());

    for i in 0..60 {
        recorder.on_location_fix(fix(45.0 + i as f64 * 0.001, -122.0, 100.0, i));
    }
    assert_eq!(recorder.point_count(), 60);

    let StopOutcome::Exported(path) = recorder.stop().unwrap() else {
        panic!("expected an exported file");
    };

    assert!(path.exists());
    assert_eq!(recorder.status(), RecordingStatus::Idle);
    assert!(recorder.session().is_none());
    assert!(!platform.is_location_active());
    assert!(!platform.is_motion_active());
    assert!(!platform.is_keep_alive_active());
}

#[test]
fn test_points_kept_in_arrival_order() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());
    recorder.start().unwrap();

    // Arrival order, not timestamp order
    let seconds = [5, 1, 3, 2, 4];
    for (i, s) in seconds.iter().enumerate() {
        recorder.on_location_fix(fix(i as f64, 0.0, 0.0, *s));
    }

    let lats: Vec<f64> = recorder.points().iter().map(|p| p.latitude()).collect();
    assert_eq!(lats, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_sample_annotation_is_latest_prior_sample() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());
    recorder.start().unwrap();

    let none = recorder.on_location_fix(fix(1.0, 1.0, 0.0, 0)).unwrap();
    assert!(none.accel().is_none());

    recorder.on_sensor_event(AccelerometerSample::new(1.0, 0.0, 9.0));
    recorder.on_sensor_event(AccelerometerSample::new(2.0, 0.0, 9.0));
    let point = recorder.on_location_fix(fix(2.0, 2.0, 0.0, 1)).unwrap();

    assert_eq!(point.accel().unwrap().x(), 2.0);
}

#[test]
fn test_stop_then_start_clears_points() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());

    recorder.start().unwrap();
    for i in 0..3 {
        recorder.on_location_fix(fix(10.0 + i as f64, 0.0, 0.0, i));
    }
    recorder.stop().unwrap();

    recorder.start().unwrap();
    assert_eq!(recorder.point_count(), 0);
    recorder.on_location_fix(fix(99.0, 0.0, 0.0, 10));

    let StopOutcome::Exported(path) = recorder.stop().unwrap() else {
        panic!("expected an exported file");
    };
    let xml = std::fs::read_to_string(path).unwrap();

    assert_eq!(xml.matches("<trkpt ").count(), 1);
    assert!(xml.contains("lat=\"99\""));
    assert!(!xml.contains("lat=\"10\""));
}

#[test]
fn test_duplicate_start_does_not_duplicate_points() {
    let temp = TempDir::new().unwrap();
    let (recorder, platform) = create_recorder(temp.path(), SimulatedPlatform::new());

    recorder.start().unwrap();
    recorder.on_location_fix(fix(1.0, 1.0, 0.0, 0));
    assert_eq!(recorder.start().unwrap(), StartOutcome::AlreadyTracking);

    recorder.on_location_fix(fix(2.0, 2.0, 0.0, 1));

    assert_eq!(recorder.point_count(), 2);
    assert_eq!(platform.location_requests(), 1);
    assert_eq!(platform.motion_registrations(), 1);
}

#[test]
fn test_permission_denied_records_nothing() {
    let temp = TempDir::new().unwrap();
    let (recorder, platform) = create_recorder(temp.path(), SimulatedPlatform::without_permission());

    assert!(matches!(
        recorder.start(),
        Err(TrackingError::PermissionDenied)
    ));
    assert_eq!(platform.location_requests(), 0);
    assert!(!platform.is_keep_alive_active());

    // Harness injects fixes anyway
    for i in 0..5 {
        assert!(recorder.on_location_fix(fix(1.0, 1.0, 0.0, i)).is_none());
    }
    assert_eq!(recorder.point_count(), 0);
    assert_eq!(recorder.stop().unwrap(), StopOutcome::NotTracking);
    assert!(file_names(temp.path()).is_empty());
}

#[test]
fn test_permission_granted_after_denial() {
    let temp = TempDir::new().unwrap();
    let (recorder, platform) = create_recorder(temp.path(), SimulatedPlatform::without_permission());

    assert!(recorder.start().is_err());
    platform.set_permission(true);
    assert!(matches!(recorder.start().unwrap(), StartOutcome::Started(_)));
}

#[test]
fn test_revoked_permission_does_not_abort_session() {
    let temp = TempDir::new().unwrap();
    let (recorder, platform) = create_recorder(temp.path(), SimulatedPlatform::new());
    recorder.start().unwrap();

    platform.set_permission(false);
    recorder.on_location_fix(fix(1.0, 1.0, 0.0, 0));

    assert_eq!(recorder.status(), RecordingStatus::Tracking);
    assert_eq!(recorder.point_count(), 1);
}

#[test]
fn test_stop_with_no_points_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());

    recorder.start().unwrap();
    assert_eq!(recorder.stop().unwrap(), StopOutcome::NothingToExport);
    assert!(file_names(temp.path()).is_empty());
}

#[test]
fn test_observer_receives_appended_points() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());
    let mut map_view = recorder.subscribe();
    let detached = recorder.subscribe();
    drop(detached);

    recorder.on_location_fix(fix(0.0, 0.0, 0.0, 0));
    recorder.start().unwrap();
    recorder.on_location_fix(fix(1.0, 1.0, 0.0, 1));
    recorder.on_location_fix(fix(2.0, 2.0, 0.0, 2));
    recorder.stop().unwrap();
    recorder.on_location_fix(fix(3.0, 3.0, 0.0, 3));

    assert_eq!(map_view.try_recv().unwrap().latitude(), 1.0);
    assert_eq!(map_view.try_recv().unwrap().latitude(), 2.0);
    assert!(map_view.try_recv().is_err());
}

#[test]
fn test_concurrent_feeds_and_stop() {
    let temp = TempDir::new().unwrap();
    let (recorder, _) = create_recorder(temp.path(), SimulatedPlatform::new());
    recorder.start().unwrap();

    let running = Arc::new(AtomicBool::new(true));
    let recorded = Arc::new(AtomicUsize::new(0));

    let location = {
        let recorder = recorder.clone();
        let running = running.clone();
        let recorded = recorded.clone();
        std::thread::spawn(move || {
            let mut i = 0;
            while running.load(Ordering::SeqCst) {
                if recorder.on_location_fix(fix(1.0, 1.0, 0.0, i)).is_some() {
                    recorded.fetch_add(1, Ordering::SeqCst);
                }
                i += 1;
            }
        })
    };
    let motion = {
        let recorder = recorder.clone();
        let running = running.clone();
        std::thread::spawn(move || {
            let mut v = 0.0f32;
            while running.load(Ordering::SeqCst) {
                recorder.on_sensor_event(AccelerometerSample::new(v, v, v));
                v += 1.0;
            }
        })
    };

    while recorded.load(Ordering::SeqCst) < 50 {
        std::thread::yield_now();
    }
    let outcome = recorder.stop().unwrap();

    // Feed callbacks may keep arriving after stop
    std::thread::sleep(std::time::Duration::from_millis(20));
    running.store(false, Ordering::SeqCst);
    location.join().unwrap();
    motion.join().unwrap();

    let StopOutcome::Exported(path) = outcome else {
        panic!("expected an exported file");
    };
    let xml = std::fs::read_to_string(path).unwrap();

    assert_eq!(xml.matches("<trkpt ").count(), recorded.load(Ordering::SeqCst));
    assert_eq!(recorder.point_count(), 0);
}
