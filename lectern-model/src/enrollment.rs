use chrono::{DateTime, Utc};

use crate::ids::{CourseId, EnrollmentId, LectureId, UserId};

/// A learner's access grant to one course, created at payment capture.
///
/// `progress` and `completed` are derived from the completed-lecture set and
/// recomputed on each completion event; `last_lecture_id` is a resume
/// pointer, not an ownership reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    /// Completion percentage, 0..=100.
    pub progress: i32,
    pub completed: bool,
    pub last_lecture_id: Option<LectureId>,
    pub enrolled_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}
