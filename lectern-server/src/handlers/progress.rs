//! Watch-progress reporting and the enrolled learner's course view.

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use lectern_model::{CourseId, EnrollmentId, LectureId, SectionId};

use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::handlers::catalog::{SectionView, assemble_sections, require_visible_course};
use crate::infra::app_state::AppState;

/// Beacon body. The aliases keep older players sending the original
/// camelCase keys working.
#[derive(Debug, Deserialize)]
pub struct ProgressReport {
    #[serde(alias = "watchedDuration")]
    pub watched_seconds: i32,
    /// Player-asserted completion (e.g. the `ended` event fired).
    #[serde(default, alias = "isLectureCompleted")]
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressReportResponse {
    pub lecture_id: LectureId,
    pub watched_seconds: i32,
    pub is_completed: bool,
    pub newly_completed: bool,
    pub course_progress: i32,
    pub course_completed: bool,
}

/// POST /user/courses/{course_id}/lectures/{lecture_id}/progress
///
/// Playback beacon. Requires enrollment even for free-preview lectures;
/// anonymous preview playback is not tracked.
pub async fn report_progress(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((course_id, lecture_id)): Path<(CourseId, LectureId)>,
    Json(report): Json<ProgressReport>,
) -> AppResult<Json<ProgressReportResponse>> {
    let outcome = state
        .progress
        .report_progress(
            user.id,
            course_id,
            lecture_id,
            report.watched_seconds,
            report.completed,
        )
        .await?;

    Ok(Json(ProgressReportResponse {
        lecture_id,
        watched_seconds: outcome.stored.watched_seconds,
        is_completed: outcome.stored.is_completed,
        newly_completed: outcome.newly_completed,
        course_progress: outcome.enrollment_progress,
        course_completed: outcome.enrollment_completed,
    }))
}

#[derive(Debug, Serialize)]
pub struct SectionProgressView {
    #[serde(flatten)]
    pub section: SectionView,
    /// Completion percentage over this section's active lectures.
    pub progress: i32,
}

#[derive(Debug, Serialize)]
pub struct EnrolledContentResponse {
    pub course_id: CourseId,
    pub enrollment_id: EnrollmentId,
    pub progress: i32,
    pub completed: bool,
    pub completed_lecture_ids: Vec<LectureId>,
    pub sections: Vec<SectionProgressView>,
}

/// GET /user/courses/{course_id}/content
///
/// The enrolled learner's view: full listing with playback URLs plus
/// per-section and overall completion.
pub async fn get_course_content(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(course_id): Path<CourseId>,
) -> AppResult<Json<EnrolledContentResponse>> {
    require_visible_course(&state, course_id, Some(&user)).await?;

    let enrollment = state
        .unit_of_work
        .enrollments
        .get(user.id, course_id)
        .await?
        .ok_or_else(|| AppError::forbidden("you are not enrolled in this course"))?;

    let completed_ids = state
        .unit_of_work
        .enrollments
        .completed_lecture_ids(enrollment.id)
        .await?;
    let completed_set: HashSet<LectureId> = completed_ids.iter().copied().collect();

    let sections = assemble_sections(&state, course_id, true).await?;
    let mut views = Vec::with_capacity(sections.len());
    for section in sections {
        let progress = state
            .progress
            .section_progress(section.id, &completed_set)
            .await?;
        views.push(SectionProgressView { section, progress });
    }

    Ok(Json(EnrolledContentResponse {
        course_id,
        enrollment_id: enrollment.id,
        progress: enrollment.progress,
        completed: enrollment.completed,
        completed_lecture_ids: completed_ids,
        sections: views,
    }))
}

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub course_id: CourseId,
    pub progress: i32,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecture_id: Option<LectureId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watched_seconds: Option<i32>,
}

/// GET /user/courses/{course_id}/resume
///
/// Where to drop the learner back in. Empty pointer when nothing has been
/// watched yet or the last lecture has since been removed.
pub async fn get_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(course_id): Path<CourseId>,
) -> AppResult<(StatusCode, Json<ResumeResponse>)> {
    let (enrollment, lecture) = state.enrollment.resume_point(user.id, course_id).await?;

    let watched = match &lecture {
        Some(l) => {
            state
                .unit_of_work
                .watch_progress
                .get(user.id, course_id, l.id)
                .await?
        }
        None => None,
    };

    Ok((
        StatusCode::OK,
        Json(ResumeResponse {
            course_id,
            progress: enrollment.progress,
            completed: enrollment.completed,
            lecture_id: lecture.as_ref().map(|l| l.id),
            section_id: lecture.as_ref().map(|l| l.section_id),
            watched_seconds: watched.map(|w| w.watched_seconds),
        }),
    ))
}
