use chrono::{DateTime, Utc};

use crate::ids::{CourseId, LectureId, UserId};

/// Per-learner, per-lecture playback record, one row per
/// (user, course, lecture) tuple, upserted by playback beacons.
///
/// `watched_seconds` is monotonically non-decreasing across updates and
/// `is_completed` is sticky: once true it never reverts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchedProgress {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub lecture_id: LectureId,
    pub watched_seconds: i32,
    pub is_completed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Per-learner lecture playback state machine.
///
/// `NotStarted -> InProgress` on the first report with watched time,
/// `InProgress -> Completed` on a completion claim or when the watched time
/// reaches the lecture duration (1s tolerance). `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LectureWatchState {
    NotStarted,
    InProgress,
    Completed,
}

impl LectureWatchState {
    pub fn is_completed(&self) -> bool {
        matches!(self, LectureWatchState::Completed)
    }
}
