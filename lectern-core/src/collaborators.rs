//! Interfaces to services the core consumes but does not implement.
//!
//! The host system supplies object storage and notification delivery; the
//! core stores opaque storage ids and emits fire-and-forget events.

use async_trait::async_trait;
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

use lectern_model::{CourseId, CourseStatus, UserId};

/// Resolves an opaque storage id to a time-limited playback URL.
///
/// Signing and expiry policy belong to the host; the core never persists
/// the resolved URL.
#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait PlaybackUrlResolver: Send + Sync {
    fn signed_url(&self, storage_id: &str) -> String;
}

/// Fire-and-forget platform events. Delivery failures are logged by the
/// implementation and never propagate to the triggering write.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait EnrollmentNotifier: Send + Sync {
    async fn enrollment_created(&self, user_id: UserId, course_id: CourseId);
    async fn course_status_changed(&self, course_id: CourseId, status: CourseStatus);
}
