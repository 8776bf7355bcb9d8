use std::sync::Arc;

use lectern_model::{CourseId, Lecture, LectureId, UserId};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::error::{CoreError, Result};

/// Decides whether a caller may fetch or play a lecture.
///
/// Free-preview lectures are open to everyone, anonymous callers included;
/// everything else requires an enrollment for the (user, course) pair and
/// fails closed. Decisions are always computed fresh from the store, never
/// from cached aggregates.
#[derive(Clone, Debug)]
pub struct AccessGate {
    uow: Arc<AppUnitOfWork>,
}

impl AccessGate {
    pub fn new(uow: Arc<AppUnitOfWork>) -> Self {
        Self { uow }
    }

    /// Resolve the lecture and authorize the caller against it.
    ///
    /// The lecture's parent chain is validated explicitly: a lecture that
    /// resolves but hangs off a different course than claimed is reported as
    /// `NotFound` rather than leaking cross-course content.
    pub async fn authorize_lecture(
        &self,
        user_id: Option<UserId>,
        course_id: CourseId,
        lecture_id: LectureId,
    ) -> Result<Lecture> {
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

        if lecture.is_free_preview {
            return Ok(lecture);
        }

        let user_id = user_id.ok_or_else(|| {
            CoreError::Forbidden("authentication required for non-preview lectures".into())
        })?;

        if self.uow.enrollments.get(user_id, course_id).await?.is_none() {
            return Err(CoreError::Forbidden(
                "you are not enrolled in this course".into(),
            ));
        }

        Ok(lecture)
    }

    /// Cheap enrollment check used by views that list many lectures.
    pub async fn is_enrolled(&self, user_id: UserId, course_id: CourseId) -> Result<bool> {
        Ok(self.uow.enrollments.get(user_id, course_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fixtures::{
        enrollment, lecture, section, uow_from_mocks,
    };
    use crate::database::ports::catalog::MockCatalogRepository;
    use crate::database::ports::enrollments::MockEnrollmentsRepository;
    use crate::database::ports::watch_progress::MockWatchProgressRepository;
    use lectern_model::{EnrollmentId, SectionId};

    fn catalog_with_lecture(
        course_id: CourseId,
        section_id: SectionId,
        lecture_id: LectureId,
        free_preview: bool,
    ) -> MockCatalogRepository {
        let mut catalog = MockCatalogRepository::new();
        let mut l = lecture(lecture_id, section_id, 0, 600);
        l.is_free_preview = free_preview;
        catalog
            .expect_get_lecture()
            .returning(move |_| Ok(Some(l.clone())));
        let s = section(section_id, course_id, 0);
        catalog
            .expect_get_section()
            .returning(move |_| Ok(Some(s.clone())));
        catalog
    }

    #[tokio::test]
    async fn free_preview_is_open_to_anonymous_callers() {
        let (course_id, section_id, lecture_id) =
            (CourseId::new(), SectionId::new(), LectureId::new());
        let catalog = catalog_with_lecture(course_id, section_id, lecture_id, true);

        let gate = AccessGate::new(uow_from_mocks(
            catalog,
            MockEnrollmentsRepository::new(),
            MockWatchProgressRepository::new(),
        ));
        let lecture = gate
            .authorize_lecture(None, course_id, lecture_id)
            .await
            .unwrap();
        assert_eq!(lecture.id, lecture_id);
    }

    #[tokio::test]
    async fn non_preview_requires_authentication() {
        let (course_id, section_id, lecture_id) =
            (CourseId::new(), SectionId::new(), LectureId::new());
        let catalog = catalog_with_lecture(course_id, section_id, lecture_id, false);

        let gate = AccessGate::new(uow_from_mocks(
            catalog,
            MockEnrollmentsRepository::new(),
            MockWatchProgressRepository::new(),
        ));
        let err = gate
            .authorize_lecture(None, course_id, lecture_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn non_preview_requires_enrollment() {
        let (course_id, section_id, lecture_id) =
            (CourseId::new(), SectionId::new(), LectureId::new());
        let catalog = catalog_with_lecture(course_id, section_id, lecture_id, false);
        let mut enrollments = MockEnrollmentsRepository::new();
        enrollments.expect_get().returning(|_, _| Ok(None));

        let gate = AccessGate::new(uow_from_mocks(
            catalog,
            enrollments,
            MockWatchProgressRepository::new(),
        ));
        let err = gate
            .authorize_lecture(Some(UserId::new()), course_id, lecture_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn enrolled_caller_is_authorized() {
        let (course_id, section_id, lecture_id, user_id) = (
            CourseId::new(),
            SectionId::new(),
            LectureId::new(),
            UserId::new(),
        );
        let catalog = catalog_with_lecture(course_id, section_id, lecture_id, false);
        let mut enrollments = MockEnrollmentsRepository::new();
        let e = enrollment(EnrollmentId::new(), user_id, course_id);
        enrollments
            .expect_get()
            .returning(move |_, _| Ok(Some(e.clone())));

        let gate = AccessGate::new(uow_from_mocks(
            catalog,
            enrollments,
            MockWatchProgressRepository::new(),
        ));
        let lecture = gate
            .authorize_lecture(Some(user_id), course_id, lecture_id)
            .await
            .unwrap();
        assert_eq!(lecture.id, lecture_id);
    }

    #[tokio::test]
    async fn cross_course_lecture_is_hidden() {
        let (section_id, lecture_id) = (SectionId::new(), LectureId::new());
        // Lecture is free preview, but the claimed course does not own it.
        let catalog = catalog_with_lecture(CourseId::new(), section_id, lecture_id, true);

        let gate = AccessGate::new(uow_from_mocks(
            catalog,
            MockEnrollmentsRepository::new(),
            MockWatchProgressRepository::new(),
        ));
        let err = gate
            .authorize_lecture(None, CourseId::new(), lecture_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleted_lecture_is_not_found() {
        let (course_id, section_id, lecture_id) =
            (CourseId::new(), SectionId::new(), LectureId::new());
        let mut catalog = MockCatalogRepository::new();
        let mut l = lecture(lecture_id, section_id, 0, 600);
        l.is_deleted = true;
        catalog
            .expect_get_lecture()
            .returning(move |_| Ok(Some(l.clone())));

        let gate = AccessGate::new(uow_from_mocks(
            catalog,
            MockEnrollmentsRepository::new(),
            MockWatchProgressRepository::new(),
        ));
        let err = gate
            .authorize_lecture(None, course_id, lecture_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
