//! Collaborators provided by the host platform.
//!
//! The tracker never talks to a real OS service directly. The host hands it
//! implementations of these traits: a permission check, the location and
//! motion feeds, and a keep-alive hook that keeps the process running (and a
//! notification visible) while a session is active.

pub mod simulated;

use crate::sensors::location::LocationRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub use simulated::SimulatedPlatform;

/// The set of collaborators a recorder needs.
#[derive(Clone)]
pub struct PlatformServices {
    pub permission: Arc<dyn PermissionChecker>,
    pub location: Arc<dyn LocationFeed>,
    pub motion: Arc<dyn MotionFeed>,
    pub keep_alive: Arc<dyn KeepAlive>,
}

impl PlatformServices {
    /// Use one object for every collaborator.
    pub fn from_shared<P>(platform: Arc<P>) -> Self
    where
        P: PermissionChecker + LocationFeed + MotionFeed + KeepAlive + 'static,
    {
        Self {
            permission: platform.clone(),
            location: platform.clone(),
            motion: platform.clone(),
            keep_alive: platform,
        }
    }
}

impl std::fmt::Debug for PlatformServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformServices").finish_non_exhaustive()
    }
}

/// Reports whether the app currently holds the precise location permission.
pub trait PermissionChecker: Send + Sync {
    fn has_location_permission(&self) -> bool;
}

/// Platform location service.
///
/// While subscribed, the host forwards each fix to
/// [`TrackRecorder::on_location_fix`](crate::recording::TrackRecorder::on_location_fix).
pub trait LocationFeed: Send + Sync {
    /// Begin delivering fixes.
    fn request_updates(&self, request: &LocationRequest) -> Result<(), FeedError>;

    /// Stop delivering fixes. Must be safe to call when not subscribed.
    fn remove_updates(&self);
}

/// Platform motion sensor service.
pub trait MotionFeed: Send + Sync {
    /// Begin delivering accelerometer readings.
    fn register(&self) -> Result<(), FeedError>;

    /// Stop delivering readings. Must be safe to call when not registered.
    fn unregister(&self);
}

/// Keeps the process alive for the duration of a session.
pub trait KeepAlive: Send + Sync {
    /// Enter the foreground and show `notice`.
    fn acquire(&self, notice: &TrackingNotice);

    /// Leave the foreground and remove the notice.
    fn release(&self);
}

/// Text of the ongoing-tracking notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingNotice {
    /// Notification title
    pub title: String,
    /// Notification body
    pub text: String,
}

impl Default for TrackingNotice {
    fn default() -> Self {
        Self {
            title: "Tracking active".to_string(),
            text: "Recording location in background".to_string(),
        }
    }
}

/// Errors reported by feed collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// The device has no such sensor or provider
    #[error("Feed not available on this device")]
    NotAvailable,

    /// The platform refused the subscription
    #[error("Subscription rejected: {0}")]
    Rejected(String),
}
