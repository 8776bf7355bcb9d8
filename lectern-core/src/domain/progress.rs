//! Watch-progress math shared by the tracker, the aggregators, and the
//! learner content view.
//!
//! Every percentage displayed anywhere in the system comes from
//! [`completion_percentage`]; nothing re-derives the formula locally, so the
//! enrollment summary and the per-course view cannot drift apart.

use lectern_model::LectureWatchState;

/// Player rounding slack: a report within one second of the full duration
/// counts as watched to the end.
pub const COMPLETION_TOLERANCE_SECONDS: i32 = 1;

/// Whether a progress report completes the lecture.
///
/// Either the client claims completion explicitly (end-of-video event) or
/// the watched time reaches the duration minus the tolerance.
pub fn report_completes_lecture(
    watched_seconds: i32,
    duration_seconds: i32,
    claimed_completed: bool,
) -> bool {
    claimed_completed
        || watched_seconds >= duration_seconds - COMPLETION_TOLERANCE_SECONDS
}

/// Classify a stored progress record into the per-lecture state machine.
///
/// `Completed` is terminal: the stored `is_completed` flag is sticky, so a
/// record never leaves that state regardless of later reports.
pub fn watch_state(watched_seconds: i32, is_completed: bool) -> LectureWatchState {
    if is_completed {
        LectureWatchState::Completed
    } else if watched_seconds > 0 {
        LectureWatchState::InProgress
    } else {
        LectureWatchState::NotStarted
    }
}

/// Canonical completion percentage: `floor(100 * completed / total)`.
///
/// A scope with no lectures yields 0, never a division error; the result is
/// bounded to 0..=100 even if a caller passes a completed count that ran
/// ahead of a shrinking denominator.
pub fn completion_percentage(completed: u64, total: u64) -> i32 {
    if total == 0 {
        return 0;
    }
    ((completed * 100) / total).min(100) as i32
}

/// Seconds to hours, rounded to two decimals, the unit of all hour rollups.
pub fn seconds_to_hours(seconds: i64) -> f64 {
    (seconds as f64 / 3600.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_requires_claim_or_full_watch() {
        assert!(report_completes_lecture(0, 300, true));
        assert!(report_completes_lecture(300, 300, false));
        assert!(report_completes_lecture(299, 300, false));
        assert!(!report_completes_lecture(298, 300, false));
        assert!(!report_completes_lecture(0, 300, false));
    }

    #[test]
    fn watch_state_transitions() {
        assert_eq!(watch_state(0, false), LectureWatchState::NotStarted);
        assert_eq!(watch_state(1, false), LectureWatchState::InProgress);
        assert_eq!(watch_state(500, false), LectureWatchState::InProgress);
        // Sticky completion dominates the watched time.
        assert_eq!(watch_state(0, true), LectureWatchState::Completed);
        assert_eq!(watch_state(500, true), LectureWatchState::Completed);
    }

    #[test]
    fn percentage_floors_and_bounds() {
        assert_eq!(completion_percentage(0, 4), 0);
        assert_eq!(completion_percentage(3, 4), 75);
        assert_eq!(completion_percentage(4, 4), 100);
        assert_eq!(completion_percentage(1, 3), 33);
        // Zero-lecture course must not divide by zero.
        assert_eq!(completion_percentage(0, 0), 0);
        // Completed set briefly larger than a shrunken denominator stays bounded.
        assert_eq!(completion_percentage(5, 4), 100);
    }

    #[test]
    fn hours_round_to_two_decimals() {
        assert_eq!(seconds_to_hours(300), 0.08);
        assert_eq!(seconds_to_hours(180), 0.05);
        assert_eq!(seconds_to_hours(0), 0.0);
        assert_eq!(seconds_to_hours(3600), 1.0);
        assert_eq!(seconds_to_hours(5400), 1.5);
    }
}
