//! Host-side implementations of the core's collaborator interfaces.

use async_trait::async_trait;
use tracing::info;

use lectern_core::collaborators::{EnrollmentNotifier, PlaybackUrlResolver};
use lectern_model::{CourseId, CourseStatus, UserId};

/// Resolves storage ids against the configured media base URL.
///
/// Real deployments put a signing CDN here; the path shape is the contract,
/// the signature scheme is the host's business.
#[derive(Debug, Clone)]
pub struct MediaUrlResolver {
    base_url: String,
}

impl MediaUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

impl PlaybackUrlResolver for MediaUrlResolver {
    fn signed_url(&self, storage_id: &str) -> String {
        format!("{}/{storage_id}/playback", self.base_url)
    }
}

/// Logs platform events instead of delivering them anywhere.
///
/// Stands in until the notification service is wired up; the interface is
/// fire-and-forget so swapping it in changes nothing upstream.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl EnrollmentNotifier for LoggingNotifier {
    async fn enrollment_created(&self, user_id: UserId, course_id: CourseId) {
        info!(%user_id, %course_id, "event: enrollment created");
    }

    async fn course_status_changed(&self, course_id: CourseId, status: CourseStatus) {
        info!(%course_id, status = status.as_str(), "event: course status changed");
    }
}
