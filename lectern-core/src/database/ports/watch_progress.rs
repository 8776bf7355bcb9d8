use async_trait::async_trait;
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

use lectern_model::{CourseId, LectureId, UserId, WatchedProgress};

use crate::error::Result;

/// Persistence port for per-lecture playback records.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait WatchProgressRepository: Send + Sync {
    /// Atomic monotonic upsert for one (user, course, lecture) tuple.
    ///
    /// The stored duration only moves forward (`GREATEST(old, new)`) and the
    /// completion flag is sticky (`old OR new`), expressed in a single
    /// conditional update so racing beacons cannot lose writes. Returns the
    /// row as stored after the update.
    async fn upsert_monotonic(
        &self,
        user_id: UserId,
        course_id: CourseId,
        lecture_id: LectureId,
        watched_seconds: i32,
        is_completed: bool,
    ) -> Result<WatchedProgress>;

    async fn get(
        &self,
        user_id: UserId,
        course_id: CourseId,
        lecture_id: LectureId,
    ) -> Result<Option<WatchedProgress>>;
}
