//! In-memory platform used by the replay host and by tests.
//!
//! Every collaborator trait is implemented on one struct. Subscriptions are
//! counted so callers can check that the recorder never opens a second feed.

use super::{FeedError, KeepAlive, LocationFeed, MotionFeed, PermissionChecker, TrackingNotice};
use crate::sensors::location::LocationRequest;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Simulated permission, feeds and keep-alive.
#[derive(Debug)]
pub struct SimulatedPlatform {
    permission_granted: AtomicBool,
    location_available: AtomicBool,
    motion_available: AtomicBool,
    location_active: AtomicBool,
    motion_active: AtomicBool,
    keep_alive_active: AtomicBool,
    location_requests: AtomicUsize,
    motion_registrations: AtomicUsize,
    last_request: Mutex<Option<LocationRequest>>,
    last_notice: Mutex<Option<TrackingNotice>>,
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPlatform {
    /// Platform with permission granted and both feeds available.
    pub fn new() -> Self {
        Self {
            permission_granted: AtomicBool::new(true),
            location_available: AtomicBool::new(true),
            motion_available: AtomicBool::new(true),
            location_active: AtomicBool::new(false),
            motion_active: AtomicBool::new(false),
            keep_alive_active: AtomicBool::new(false),
            location_requests: AtomicUsize::new(0),
            motion_registrations: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_notice: Mutex::new(None),
        }
    }

    /// Platform whose location permission has not been granted.
    pub fn without_permission() -> Self {
        let platform = Self::new();
        platform.set_permission(false);
        platform
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    /// Make the location provider accept or refuse subscriptions.
    pub fn set_location_available(&self, available: bool) {
        self.location_available.store(available, Ordering::SeqCst);
    }

    /// Simulate a device with or without an accelerometer.
    pub fn set_motion_available(&self, available: bool) {
        self.motion_available.store(available, Ordering::SeqCst);
    }

    /// Whether fixes are currently being delivered.
    pub fn is_location_active(&self) -> bool {
        self.location_active.load(Ordering::SeqCst)
    }

    /// Whether motion readings are currently being delivered.
    pub fn is_motion_active(&self) -> bool {
        self.motion_active.load(Ordering::SeqCst)
    }

    pub fn is_keep_alive_active(&self) -> bool {
        self.keep_alive_active.load(Ordering::SeqCst)
    }

    /// Total number of accepted location subscriptions.
    pub fn location_requests(&self) -> usize {
        self.location_requests.load(Ordering::SeqCst)
    }

    /// Total number of accepted motion registrations.
    pub fn motion_registrations(&self) -> usize {
        self.motion_registrations.load(Ordering::SeqCst)
    }

    /// Parameters of the most recent location subscription.
    pub fn last_request(&self) -> Option<LocationRequest> {
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Notice shown by the most recent keep-alive acquisition.
    pub fn last_notice(&self) -> Option<TrackingNotice> {
        self.last_notice
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl PermissionChecker for SimulatedPlatform {
    fn has_location_permission(&self) -> bool {
        self.permission_granted.load(Ordering::SeqCst)
    }
}

impl LocationFeed for SimulatedPlatform {
    fn request_updates(&self, request: &LocationRequest) -> Result<(), FeedError> {
        if !self.location_available.load(Ordering::SeqCst) {
            return Err(FeedError::NotAvailable);
        }
        if self.location_active.swap(true, Ordering::SeqCst) {
            return Err(FeedError::Rejected("already subscribed".to_string()));
        }

        self.location_requests.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(*request);
        Ok(())
    }

    fn remove_updates(&self) {
        self.location_active.store(false, Ordering::SeqCst);
    }
}

impl MotionFeed for SimulatedPlatform {
    fn register(&self) -> Result<(), FeedError> {
        if !self.motion_available.load(Ordering::SeqCst) {
            return Err(FeedError::NotAvailable);
        }
        if self.motion_active.swap(true, Ordering::SeqCst) {
            return Err(FeedError::Rejected("already registered".to_string()));
        }

        self.motion_registrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn unregister(&self) {
        self.motion_active.store(false, Ordering::SeqCst);
    }
}

impl KeepAlive for SimulatedPlatform {
    fn acquire(&self, notice: &TrackingNotice) {
        self.keep_alive_active.store(true, Ordering::SeqCst);
        *self.last_notice.lock().unwrap_or_else(|e| e.into_inner()) = Some(notice.clone());
    }

    fn release(&self) {
        self.keep_alive_active.store(false, Ordering::SeqCst);
    }
}
