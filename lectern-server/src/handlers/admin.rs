//! Author-side curriculum management. Every route here sits behind the
//! admin middleware.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use lectern_core::application::services::curriculum::LectureInput;
use lectern_core::database::ports::catalog::LectureUpdate;
use lectern_model::{Course, CourseId, CourseStatus, Lecture, LectureId, Section, SectionId};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// POST /admin/courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<Course>)> {
    let course = state
        .curriculum
        .create_course(&req.title, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: CourseStatus,
}

/// PUT /admin/courses/{course_id}/status
pub async fn set_course_status(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<Course>> {
    let course = state
        .curriculum
        .set_course_status(course_id, req.status)
        .await?;
    Ok(Json(course))
}

#[derive(Debug, Deserialize)]
pub struct CreateSectionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// POST /admin/courses/{course_id}/sections
pub async fn create_section(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    Json(req): Json<CreateSectionRequest>,
) -> AppResult<(StatusCode, Json<Section>)> {
    let section = state
        .curriculum
        .add_section(course_id, &req.title, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(section)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PUT /admin/courses/{course_id}/sections/{section_id}
pub async fn update_section(
    State(state): State<AppState>,
    Path((course_id, section_id)): Path<(CourseId, SectionId)>,
    Json(req): Json<UpdateSectionRequest>,
) -> AppResult<Json<Section>> {
    let section = state
        .curriculum
        .update_section(course_id, section_id, req.title, req.description)
        .await?;
    Ok(Json(section))
}

#[derive(Debug, Deserialize)]
pub struct ReorderSectionsRequest {
    /// Every active section of the course, in the desired order.
    #[serde(alias = "orderedSectionIds")]
    pub ordered_ids: Vec<SectionId>,
}

/// PATCH /admin/courses/{course_id}/sections/reorder
pub async fn reorder_sections(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    Json(req): Json<ReorderSectionsRequest>,
) -> AppResult<Json<Vec<Section>>> {
    let sections = state
        .curriculum
        .reorder_sections(course_id, req.ordered_ids)
        .await?;
    Ok(Json(sections))
}

/// DELETE /admin/courses/{course_id}/sections/{section_id}
pub async fn delete_section(
    State(state): State<AppState>,
    Path((course_id, section_id)): Path<(CourseId, SectionId)>,
) -> AppResult<StatusCode> {
    state.curriculum.delete_section(course_id, section_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreateLectureRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub storage_id: String,
    pub duration_seconds: i32,
}

/// POST /admin/courses/{course_id}/sections/{section_id}/lectures
pub async fn create_lecture(
    State(state): State<AppState>,
    Path((course_id, section_id)): Path<(CourseId, SectionId)>,
    Json(req): Json<CreateLectureRequest>,
) -> AppResult<(StatusCode, Json<Lecture>)> {
    let lecture = state
        .curriculum
        .add_lecture(
            course_id,
            section_id,
            LectureInput {
                title: req.title,
                description: req.description,
                storage_id: req.storage_id,
                duration_seconds: req.duration_seconds,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(lecture)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateLectureRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub storage_id: Option<String>,
    pub duration_seconds: Option<i32>,
}

/// PUT /admin/courses/{course_id}/sections/{section_id}/lectures/{lecture_id}
pub async fn update_lecture(
    State(state): State<AppState>,
    Path((course_id, section_id, lecture_id)): Path<(CourseId, SectionId, LectureId)>,
    Json(req): Json<UpdateLectureRequest>,
) -> AppResult<Json<Lecture>> {
    let lecture = state
        .curriculum
        .update_lecture(
            course_id,
            section_id,
            lecture_id,
            LectureUpdate {
                title: req.title,
                description: req.description,
                storage_id: req.storage_id,
                duration_seconds: req.duration_seconds,
            },
        )
        .await?;
    Ok(Json(lecture))
}

#[derive(Debug, Deserialize)]
pub struct ReorderLecturesRequest {
    /// Every active lecture of the section, in the desired order.
    #[serde(alias = "orderedLectureIds")]
    pub ordered_ids: Vec<LectureId>,
}

/// PATCH /admin/courses/{course_id}/sections/{section_id}/lectures/reorder
pub async fn reorder_lectures(
    State(state): State<AppState>,
    Path((course_id, section_id)): Path<(CourseId, SectionId)>,
    Json(req): Json<ReorderLecturesRequest>,
) -> AppResult<Json<Vec<Lecture>>> {
    let lectures = state
        .curriculum
        .reorder_lectures(course_id, section_id, req.ordered_ids)
        .await?;
    Ok(Json(lectures))
}

/// DELETE /admin/courses/{course_id}/sections/{section_id}/lectures/{lecture_id}
pub async fn delete_lecture(
    State(state): State<AppState>,
    Path((course_id, section_id, lecture_id)): Path<(CourseId, SectionId, LectureId)>,
) -> AppResult<StatusCode> {
    state
        .curriculum
        .delete_lecture(course_id, section_id, lecture_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /admin/courses/{course_id}/sections/{section_id}/lectures/{lecture_id}/toggle-preview
pub async fn toggle_free_preview(
    State(state): State<AppState>,
    Path((course_id, section_id, lecture_id)): Path<(CourseId, SectionId, LectureId)>,
) -> AppResult<Json<Lecture>> {
    let lecture = state
        .curriculum
        .toggle_free_preview(course_id, section_id, lecture_id)
        .await?;
    Ok(Json(lecture))
}
