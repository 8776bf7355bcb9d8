use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use lectern_model::{CourseId, LectureId, UserId, WatchedProgress};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::progress::{completion_percentage, report_completes_lecture};
use crate::error::{CoreError, Result};

/// Outcome of one progress report, for the HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReportOutcome {
    pub stored: WatchedProgress,
    /// True only on the false -> true completion transition.
    pub newly_completed: bool,
    /// Enrollment percentage after this report.
    pub enrollment_progress: i32,
    pub enrollment_completed: bool,
}

/// Records playback beacons and keeps the derived enrollment percentages
/// consistent with the completed-lecture set.
///
/// Beacons are at-least-once and may arrive out of order (periodic timer,
/// unload, explicit end-of-video); every step here is idempotent and the
/// duration update is monotonic at the storage layer, so re-delivery and
/// races never regress state.
#[derive(Clone, Debug)]
pub struct ProgressService {
    uow: Arc<AppUnitOfWork>,
}

impl ProgressService {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn report_progress(
        &self,
        user_id: UserId,
        course_id: CourseId,
        lecture_id: LectureId,
        watched_seconds: i32,
        claimed_completed: bool,
    ) -> Result<ProgressReportOutcome> {
        if watched_seconds < 0 {
            return Err(CoreError::Validation(
                "watched duration must not be negative".into(),
            ));
        }

        let enrollment = self
            .uow
            .enrollments
            .get(user_id, course_id)
            .await?
            .ok_or_else(|| {
                CoreError::Forbidden("you are not enrolled in this course".into())
            })?;

        // Reject a lecture id that resolves under a different course before
        // touching any state.
        let lecture = self
            .uow
            .catalog
            .get_lecture(lecture_id)
            .await?
            .filter(|l| !l.is_deleted)
            .ok_or_else(|| CoreError::NotFound(format!("lecture {lecture_id}")))?;
        let section = self
            .uow
            .catalog
            .get_section(lecture.section_id)
            .await?
            .filter(|s| !s.is_deleted)
            .ok_or_else(|| CoreError::NotFound(format!("lecture {lecture_id}")))?;
        if section.course_id != course_id {
            return Err(CoreError::NotFound(format!(
                "lecture {lecture_id} does not belong to course {course_id}"
            )));
        }

        let completes = report_completes_lecture(
            watched_seconds,
            lecture.duration_seconds,
            claimed_completed,
        );

        let stored = self
            .uow
            .watch_progress
            .upsert_monotonic(user_id, course_id, lecture_id, watched_seconds, completes)
            .await?;

        // The resume pointer always reflects the most recent activity, even
        // when the monotonic rule discarded the duration itself.
        self.uow
            .enrollments
            .touch_last_access(enrollment.id, lecture_id)
            .await?;

        let mut newly_completed = false;
        let mut progress = enrollment.progress;
        let mut completed = enrollment.completed;

        if stored.is_completed {
            newly_completed = self
                .uow
                .enrollments
                .add_completed_lecture(enrollment.id, lecture_id)
                .await?;
            if newly_completed {
                (progress, completed) = self.recompute_enrollment_progress(enrollment.id).await?;
                info!(
                    %user_id, %course_id, %lecture_id, progress,
                    "lecture completed"
                );
            } else {
                debug!(%user_id, %lecture_id, "completion beacon re-delivered; no-op");
            }
        }

        Ok(ProgressReportOutcome {
            stored,
            newly_completed,
            enrollment_progress: progress,
            enrollment_completed: completed,
        })
    }

    /// Derive the enrollment percentage from the completed set and the
    /// current active lecture count, and persist it.
    ///
    /// Both sides of the division come from the active tree: completed-set
    /// entries whose lecture has since been deleted drop out of the
    /// numerator (prune-on-read), so the percentage stays bounded.
    pub async fn recompute_enrollment_progress(
        &self,
        enrollment_id: lectern_model::EnrollmentId,
    ) -> Result<(i32, bool)> {
        let enrollment = self
            .uow
            .enrollments
            .get_by_id(enrollment_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("enrollment {enrollment_id}")))?;

        let total = self
            .uow
            .catalog
            .count_active_lectures_in_course(enrollment.course_id)
            .await?;
        let completed_count = self
            .uow
            .enrollments
            .count_completed_active_lectures(enrollment_id)
            .await?;

        let progress = completion_percentage(completed_count.max(0) as u64, total.max(0) as u64);
        let completed = progress == 100;

        self.uow
            .enrollments
            .set_progress(enrollment_id, progress, completed)
            .await?;

        Ok((progress, completed))
    }

    /// Per-section percentage for the learner content view, same canonical
    /// formula scoped to one section's active lectures.
    pub async fn section_progress(
        &self,
        section_id: lectern_model::SectionId,
        completed_lecture_ids: &HashSet<LectureId>,
    ) -> Result<i32> {
        let lectures = self.uow.catalog.active_lectures(section_id).await?;
        let completed = lectures
            .iter()
            .filter(|l| completed_lecture_ids.contains(&l.id))
            .count() as u64;
        Ok(completion_percentage(completed, lectures.len() as u64))
    }
}
