use async_trait::async_trait;
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

use lectern_model::{CourseId, Enrollment, EnrollmentId, LectureId, UserId};

use crate::error::Result;

/// Persistence port for enrollments and their completed-lecture sets.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait EnrollmentsRepository: Send + Sync {
    /// Create the enrollment for a (user, course) pair.
    ///
    /// The pair is unique; a duplicate maps to `CoreError::Conflict` so a
    /// re-delivered payment event is rejected rather than re-applied.
    async fn create(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment>;
    async fn get(&self, user_id: UserId, course_id: CourseId) -> Result<Option<Enrollment>>;
    async fn get_by_id(&self, id: EnrollmentId) -> Result<Option<Enrollment>>;
    /// Admin revoke; removes the record entirely.
    async fn delete(&self, id: EnrollmentId) -> Result<()>;

    /// Update the resume pointer and last-access time unconditionally.
    async fn touch_last_access(&self, id: EnrollmentId, lecture_id: LectureId) -> Result<()>;

    /// Insert into the completed set with `ON CONFLICT DO NOTHING`.
    ///
    /// Returns `true` only when the row was newly inserted, i.e. on the
    /// false -> true completion transition; a retried beacon returns `false`.
    async fn add_completed_lecture(&self, id: EnrollmentId, lecture_id: LectureId)
    -> Result<bool>;

    /// Completed-set entries still pointing at active lectures of the
    /// enrollment's course (prune-on-read: deleted lectures drop out of the
    /// numerator together with the denominator).
    async fn count_completed_active_lectures(&self, id: EnrollmentId) -> Result<i64>;

    /// Raw completed-set ids, for the learner content view.
    async fn completed_lecture_ids(&self, id: EnrollmentId) -> Result<Vec<LectureId>>;

    async fn set_progress(&self, id: EnrollmentId, progress: i32, completed: bool)
    -> Result<()>;
}
