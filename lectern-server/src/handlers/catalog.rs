//! Learner-facing catalog views.
//!
//! Listings are assembled from active rows only and carry playback URLs
//! solely where the caller is allowed to play: free-preview lectures for
//! everyone, the rest only for enrolled learners.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use lectern_core::domain::progress::watch_state;
use lectern_model::{
    Course, CourseId, CourseStatus, Lecture, LectureId, LectureWatchState, Section, SectionId,
};

use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct LectureView {
    pub id: LectureId,
    pub title: String,
    pub description: String,
    pub duration_seconds: i32,
    pub index: i32,
    pub is_free_preview: bool,
    /// Present only when the caller may play this lecture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    pub title: String,
    pub description: String,
    pub index: i32,
    pub total_hours: f64,
    pub lectures: Vec<LectureView>,
}

#[derive(Debug, Serialize)]
pub struct CourseContentResponse {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub status: CourseStatus,
    pub total_hours: f64,
    pub enrolled: bool,
    pub sections: Vec<SectionView>,
}

/// GET /courses/{course_id}/sections
///
/// The public course page: full section and lecture listing, with playback
/// URLs gated per lecture. Draft courses are invisible to everyone but
/// admins.
pub async fn get_course_sections(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path(course_id): Path<CourseId>,
) -> AppResult<Json<CourseContentResponse>> {
    let course = require_visible_course(&state, course_id, user.as_deref()).await?;

    let enrolled = match user.as_deref() {
        Some(u) => state.access_gate.is_enrolled(u.id, course_id).await?,
        None => false,
    };

    let sections = assemble_sections(&state, course_id, enrolled).await?;

    Ok(Json(CourseContentResponse {
        id: course.id,
        title: course.title,
        description: course.description,
        status: course.status,
        total_hours: course.total_hours,
        enrolled,
        sections,
    }))
}

#[derive(Debug, Serialize)]
pub struct LectureDetailResponse {
    pub id: LectureId,
    pub section_id: SectionId,
    pub title: String,
    pub description: String,
    pub duration_seconds: i32,
    pub index: i32,
    pub is_free_preview: bool,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watched_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    /// Playback state for the authenticated caller; absent for anonymous
    /// preview fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_state: Option<LectureWatchState>,
}

/// GET /courses/{course_id}/lectures/{lecture_id}
///
/// Single-lecture playback view. Authorization runs through the access
/// gate, so a non-preview lecture without enrollment is a 403 and a lecture
/// outside the claimed course is a 404.
pub async fn get_lecture(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path((course_id, lecture_id)): Path<(CourseId, LectureId)>,
) -> AppResult<Json<LectureDetailResponse>> {
    let user_id = user.as_deref().map(|u| u.id);
    let lecture = state
        .access_gate
        .authorize_lecture(user_id, course_id, lecture_id)
        .await?;

    let watched = match user_id {
        Some(uid) => {
            state
                .unit_of_work
                .watch_progress
                .get(uid, course_id, lecture_id)
                .await?
        }
        None => None,
    };

    // No progress row yet still classifies as not started for a signed-in
    // caller.
    let state_view = user_id.map(|_| match &watched {
        Some(w) => watch_state(w.watched_seconds, w.is_completed),
        None => LectureWatchState::NotStarted,
    });

    Ok(Json(LectureDetailResponse {
        id: lecture.id,
        section_id: lecture.section_id,
        title: lecture.title,
        description: lecture.description,
        duration_seconds: lecture.duration_seconds,
        index: lecture.index,
        is_free_preview: lecture.is_free_preview,
        video_url: state.url_resolver.signed_url(&lecture.storage_id),
        watched_seconds: watched.as_ref().map(|w| w.watched_seconds),
        is_completed: watched.as_ref().map(|w| w.is_completed),
        watch_state: state_view,
    }))
}

pub(crate) async fn require_visible_course(
    state: &AppState,
    course_id: CourseId,
    user: Option<&AuthenticatedUser>,
) -> Result<Course, AppError> {
    let course = state
        .unit_of_work
        .catalog
        .get_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("course {course_id}")))?;

    let is_admin = user.map(|u| u.is_admin).unwrap_or(false);
    if course.status == CourseStatus::Draft && !is_admin {
        return Err(AppError::not_found(format!("course {course_id}")));
    }
    Ok(course)
}

pub(crate) async fn assemble_sections(
    state: &AppState,
    course_id: CourseId,
    enrolled: bool,
) -> Result<Vec<SectionView>, AppError> {
    let sections = state.unit_of_work.catalog.active_sections(course_id).await?;

    let mut views = Vec::with_capacity(sections.len());
    for section in sections {
        let lectures = state
            .unit_of_work
            .catalog
            .active_lectures(section.id)
            .await?;
        views.push(section_view(state, section, lectures, enrolled));
    }
    Ok(views)
}

fn section_view(
    state: &AppState,
    section: Section,
    lectures: Vec<Lecture>,
    enrolled: bool,
) -> SectionView {
    let lectures = lectures
        .into_iter()
        .map(|l| {
            let video_url = (enrolled || l.is_free_preview)
                .then(|| state.url_resolver.signed_url(&l.storage_id));
            LectureView {
                id: l.id,
                title: l.title,
                description: l.description,
                duration_seconds: l.duration_seconds,
                index: l.index,
                is_free_preview: l.is_free_preview,
                video_url,
            }
        })
        .collect();

    SectionView {
        id: section.id,
        title: section.title,
        description: section.description,
        index: section.index,
        total_hours: section.total_hours,
        lectures,
    }
}
