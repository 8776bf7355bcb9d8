use async_trait::async_trait;
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

use lectern_model::{Course, CourseId, CourseStatus, Lecture, LectureId, Section, SectionId};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    /// Dense append position, assigned by the ordering manager.
    pub index: i32,
}

#[derive(Debug, Clone)]
pub struct NewLecture {
    pub section_id: SectionId,
    pub title: String,
    pub description: String,
    pub storage_id: String,
    pub duration_seconds: i32,
    pub index: i32,
}

/// Partial lecture update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct LectureUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Replacing the video swaps the storage id and duration together.
    pub storage_id: Option<String>,
    pub duration_seconds: Option<i32>,
}

/// Persistence port for the Course -> Section -> Lecture content tree.
///
/// Children are derived queries over a parent-id column; no child arrays are
/// stored. Every listing filters soft-deleted rows and orders by `index`,
/// so the density invariant only concerns the rows these methods return.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_course(&self, new: NewCourse) -> Result<Course>;
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>>;
    async fn set_course_status(&self, id: CourseId, status: CourseStatus) -> Result<Course>;
    async fn set_course_hours(&self, id: CourseId, total_hours: f64) -> Result<()>;

    async fn create_section(&self, new: NewSection) -> Result<Section>;
    async fn get_section(&self, id: SectionId) -> Result<Option<Section>>;
    async fn update_section(
        &self,
        id: SectionId,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Section>;
    /// Marks the section deleted; surviving siblings keep their indices.
    async fn soft_delete_section(&self, id: SectionId) -> Result<()>;
    /// Non-deleted sections of a course, ordered by index.
    async fn active_sections(&self, course_id: CourseId) -> Result<Vec<Section>>;
    /// Assign `index = position` for each id, as one atomic batch.
    async fn apply_section_order(
        &self,
        course_id: CourseId,
        ordered_ids: Vec<SectionId>,
    ) -> Result<()>;
    async fn set_section_hours(&self, id: SectionId, total_hours: f64) -> Result<()>;

    async fn create_lecture(&self, new: NewLecture) -> Result<Lecture>;
    async fn get_lecture(&self, id: LectureId) -> Result<Option<Lecture>>;
    async fn update_lecture(&self, id: LectureId, update: LectureUpdate) -> Result<Lecture>;
    async fn toggle_free_preview(&self, id: LectureId) -> Result<Lecture>;
    /// Non-deleted lectures of a section, ordered by index.
    async fn active_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>>;
    async fn apply_lecture_order(
        &self,
        section_id: SectionId,
        ordered_ids: Vec<LectureId>,
    ) -> Result<()>;
    /// Removes the row and closes the index gap by shifting later active
    /// siblings down by one, in the same transaction.
    async fn hard_delete_lecture(&self, id: LectureId) -> Result<()>;

    /// Sum of active lecture durations for one section, in seconds.
    async fn sum_active_lecture_seconds(&self, section_id: SectionId) -> Result<i64>;
    /// Sum of cached active section hours for one course.
    async fn sum_active_section_hours(&self, course_id: CourseId) -> Result<f64>;
    /// Canonical progress denominator: active lectures across the course's
    /// active sections.
    async fn count_active_lectures_in_course(&self, course_id: CourseId) -> Result<i64>;
    /// Whether the course has at least one active section containing at
    /// least one active lecture (publish precondition).
    async fn has_publishable_content(&self, course_id: CourseId) -> Result<bool>;
}
