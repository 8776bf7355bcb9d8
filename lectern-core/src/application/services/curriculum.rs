use std::sync::Arc;

use tracing::warn;

use lectern_model::{
    Course, CourseId, CourseStatus, Lecture, LectureId, Section, SectionId,
};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::collaborators::EnrollmentNotifier;
use crate::database::ports::catalog::{LectureUpdate, NewCourse, NewLecture, NewSection};
use crate::domain::ordering::validate_reorder;
use crate::domain::progress::seconds_to_hours;
use crate::error::{CoreError, Result};

/// Author-side operations on the content tree: section/lecture CRUD,
/// ordering, and the duration rollups that keep cached hour totals
/// consistent with lecture durations.
#[derive(Clone)]
pub struct CurriculumService {
    uow: Arc<AppUnitOfWork>,
    notifier: Arc<dyn EnrollmentNotifier>,
}

/// Input for creating a lecture from an upload's metadata.
#[derive(Debug, Clone)]
pub struct LectureInput {
    pub title: String,
    pub description: String,
    pub storage_id: String,
    pub duration_seconds: i32,
}

impl CurriculumService {
    pub fn new(uow: Arc<AppUnitOfWork>, notifier: Arc<dyn EnrollmentNotifier>) -> Self {
        Self { uow, notifier }
    }

    /// New courses start as drafts with no content and zero hours.
    pub async fn create_course(&self, title: &str, description: &str) -> Result<Course> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("course title is required".into()));
        }
        self.uow
            .catalog
            .create_course(NewCourse {
                title: title.to_string(),
                description: description.trim().to_string(),
            })
            .await
    }

    pub async fn get_course(&self, course_id: CourseId) -> Result<Course> {
        self.require_course(course_id).await
    }

    pub async fn add_section(
        &self,
        course_id: CourseId,
        title: &str,
        description: &str,
    ) -> Result<Section> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("section title is required".into()));
        }
        self.require_course(course_id).await?;

        // Append after the highest live index. Soft-deleted siblings leave
        // gaps behind, so counting would reuse an index a survivor still
        // holds.
        let index = self
            .uow
            .catalog
            .active_sections(course_id)
            .await?
            .iter()
            .map(|s| s.index + 1)
            .max()
            .unwrap_or(0);
        self.uow
            .catalog
            .create_section(NewSection {
                course_id,
                title: title.to_string(),
                description: description.trim().to_string(),
                index,
            })
            .await
    }

    pub async fn update_section(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Section> {
        self.require_section(course_id, section_id).await?;
        self.uow
            .catalog
            .update_section(section_id, title, description)
            .await
    }

    pub async fn reorder_sections(
        &self,
        course_id: CourseId,
        ordered_ids: Vec<SectionId>,
    ) -> Result<Vec<Section>> {
        self.require_course(course_id).await?;

        let current: Vec<SectionId> = self
            .uow
            .catalog
            .active_sections(course_id)
            .await?
            .iter()
            .map(|s| s.id)
            .collect();
        validate_reorder(&current, &ordered_ids)?;

        self.uow
            .catalog
            .apply_section_order(course_id, ordered_ids)
            .await?;
        self.uow.catalog.active_sections(course_id).await
    }

    /// Soft delete: the section disappears from listings and aggregates but
    /// stays on record; surviving siblings keep their indices.
    pub async fn delete_section(
        &self,
        course_id: CourseId,
        section_id: SectionId,
    ) -> Result<()> {
        self.require_section(course_id, section_id).await?;
        self.uow.catalog.soft_delete_section(section_id).await?;
        self.refresh_course_hours_best_effort(course_id).await;
        Ok(())
    }

    pub async fn add_lecture(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        input: LectureInput,
    ) -> Result<Lecture> {
        if input.title.trim().is_empty() {
            return Err(CoreError::Validation("lecture title is required".into()));
        }
        if input.storage_id.trim().is_empty() {
            return Err(CoreError::Validation("video storage id is required".into()));
        }
        if input.duration_seconds <= 0 {
            return Err(CoreError::Validation(
                "lecture duration must be positive".into(),
            ));
        }
        self.require_section(course_id, section_id).await?;

        let index = self
            .uow
            .catalog
            .active_lectures(section_id)
            .await?
            .iter()
            .map(|l| l.index + 1)
            .max()
            .unwrap_or(0);

        let lecture = self
            .uow
            .catalog
            .create_lecture(NewLecture {
                section_id,
                title: input.title.trim().to_string(),
                description: input.description.trim().to_string(),
                storage_id: input.storage_id,
                duration_seconds: input.duration_seconds,
                index,
            })
            .await?;

        self.refresh_hours_best_effort(section_id, course_id).await;
        Ok(lecture)
    }

    pub async fn update_lecture(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
        update: LectureUpdate,
    ) -> Result<Lecture> {
        if let Some(duration) = update.duration_seconds
            && duration <= 0
        {
            return Err(CoreError::Validation(
                "lecture duration must be positive".into(),
            ));
        }
        self.require_lecture(course_id, section_id, lecture_id).await?;

        let duration_changed = update.duration_seconds.is_some();
        let lecture = self.uow.catalog.update_lecture(lecture_id, update).await?;

        if duration_changed {
            self.refresh_hours_best_effort(section_id, course_id).await;
        }
        Ok(lecture)
    }

    pub async fn reorder_lectures(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        ordered_ids: Vec<LectureId>,
    ) -> Result<Vec<Lecture>> {
        self.require_section(course_id, section_id).await?;

        let current: Vec<LectureId> = self
            .uow
            .catalog
            .active_lectures(section_id)
            .await?
            .iter()
            .map(|l| l.id)
            .collect();
        validate_reorder(&current, &ordered_ids)?;

        self.uow
            .catalog
            .apply_lecture_order(section_id, ordered_ids)
            .await?;
        self.uow.catalog.active_lectures(section_id).await
    }

    /// Hard delete: the row goes away and later siblings shift down one
    /// index, restoring exact density for the section.
    pub async fn delete_lecture(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
    ) -> Result<()> {
        self.require_lecture(course_id, section_id, lecture_id).await?;
        self.uow.catalog.hard_delete_lecture(lecture_id).await?;
        self.refresh_hours_best_effort(section_id, course_id).await;
        Ok(())
    }

    pub async fn toggle_free_preview(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
    ) -> Result<Lecture> {
        self.require_lecture(course_id, section_id, lecture_id).await?;
        self.uow.catalog.toggle_free_preview(lecture_id).await
    }

    /// Draft <-> published transition. Publishing requires at least one
    /// active section containing at least one active lecture.
    pub async fn set_course_status(
        &self,
        course_id: CourseId,
        status: CourseStatus,
    ) -> Result<Course> {
        self.require_course(course_id).await?;

        if status == CourseStatus::Published
            && !self.uow.catalog.has_publishable_content(course_id).await?
        {
            return Err(CoreError::Validation(
                "a published course needs at least one section with a lecture".into(),
            ));
        }

        let course = self.uow.catalog.set_course_status(course_id, status).await?;

        // Status events go out off the request path; delivery never delays
        // or fails the transition.
        let notifier = Arc::clone(&self.notifier);
        let new_status = course.status;
        tokio::spawn(async move {
            notifier.course_status_changed(course_id, new_status).await;
        });

        Ok(course)
    }

    /// Recompute the section's hour total from its active lectures and
    /// cascade to the owning course.
    pub async fn recompute_section_hours(
        &self,
        section_id: SectionId,
        course_id: CourseId,
    ) -> Result<f64> {
        let seconds = self
            .uow
            .catalog
            .sum_active_lecture_seconds(section_id)
            .await?;
        let hours = seconds_to_hours(seconds);
        self.uow.catalog.set_section_hours(section_id, hours).await?;
        self.recompute_course_hours(course_id).await?;
        Ok(hours)
    }

    pub async fn recompute_course_hours(&self, course_id: CourseId) -> Result<f64> {
        let hours = self
            .uow
            .catalog
            .sum_active_section_hours(course_id)
            .await?;
        self.uow.catalog.set_course_hours(course_id, hours).await?;
        Ok(hours)
    }

    /// Display-only rollup: retry transient failures once, then log and move
    /// on. The triggering write has already committed and the totals are
    /// reconciled by the next recompute.
    async fn refresh_hours_best_effort(&self, section_id: SectionId, course_id: CourseId) {
        let attempt = self.recompute_section_hours(section_id, course_id).await;
        if let Err(err) = attempt {
            let retried = if err.is_transient() {
                self.recompute_section_hours(section_id, course_id).await
            } else {
                Err(err)
            };
            if let Err(err) = retried {
                warn!(%section_id, %course_id, error = %err, "duration rollup failed; deferring to next recompute");
            }
        }
    }

    async fn refresh_course_hours_best_effort(&self, course_id: CourseId) {
        let attempt = self.recompute_course_hours(course_id).await;
        if let Err(err) = attempt {
            let retried = if err.is_transient() {
                self.recompute_course_hours(course_id).await
            } else {
                Err(err)
            };
            if let Err(err) = retried {
                warn!(%course_id, error = %err, "course hours rollup failed; deferring to next recompute");
            }
        }
    }

    async fn require_course(&self, course_id: CourseId) -> Result<Course> {
        self.uow
            .catalog
            .get_course(course_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("course {course_id}")))
    }

    async fn require_section(
        &self,
        course_id: CourseId,
        section_id: SectionId,
    ) -> Result<Section> {
        let section = self
            .uow
            .catalog
            .get_section(section_id)
            .await?
            .filter(|s| !s.is_deleted)
            .ok_or_else(|| CoreError::NotFound(format!("section {section_id}")))?;
        if section.course_id != course_id {
            return Err(CoreError::NotFound(format!(
                "section {section_id} does not belong to course {course_id}"
            )));
        }
        Ok(section)
    }

    async fn require_lecture(
        &self,
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
    ) -> Result<Lecture> {
        self.require_section(course_id, section_id).await?;
        let lecture = self
            .uow
            .catalog
            .get_lecture(lecture_id)
            .await?
            .filter(|l| !l.is_deleted)
            .ok_or_else(|| CoreError::NotFound(format!("lecture {lecture_id}")))?;
        if lecture.section_id != section_id {
            return Err(CoreError::NotFound(format!(
                "lecture {lecture_id} does not belong to section {section_id}"
            )));
        }
        Ok(lecture)
    }
}

impl std::fmt::Debug for CurriculumService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurriculumService")
            .field("uow", &self.uow)
            .finish_non_exhaustive()
    }
}
