use std::sync::Arc;

use tracing::info;

use lectern_model::{CourseId, Enrollment, EnrollmentId, Lecture, UserId};

use crate::application::unit_of_work::AppUnitOfWork;
use crate::collaborators::EnrollmentNotifier;
use crate::error::{CoreError, Result};

/// Grants and revokes course access.
///
/// Enrollment is created exactly once per captured payment; the unique
/// (user, course) constraint turns a re-delivered payment event into a
/// `Conflict` instead of a second grant.
#[derive(Clone)]
pub struct EnrollmentService {
    uow: Arc<AppUnitOfWork>,
    notifier: Arc<dyn EnrollmentNotifier>,
}

impl EnrollmentService {
    pub fn new(uow: Arc<AppUnitOfWork>, notifier: Arc<dyn EnrollmentNotifier>) -> Self {
        Self { uow, notifier }
    }

    /// Handle a captured payment: create the enrollment and emit the
    /// notification off the request path.
    pub async fn enroll_on_payment_captured(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment> {
        self.uow
            .catalog
            .get_course(course_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("course {course_id}")))?;

        let enrollment = self.uow.enrollments.create(user_id, course_id).await?;
        info!(%user_id, %course_id, "enrollment created");

        // Notification delivery must not delay or fail the grant.
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            notifier.enrollment_created(user_id, course_id).await;
        });

        Ok(enrollment)
    }

    /// The enrollment plus the lecture to resume at, if the learner has
    /// watched anything and that lecture is still active.
    pub async fn resume_point(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<(Enrollment, Option<Lecture>)> {
        let enrollment = self
            .uow
            .enrollments
            .get(user_id, course_id)
            .await?
            .ok_or_else(|| {
                CoreError::Forbidden("you are not enrolled in this course".into())
            })?;

        let lecture = match enrollment.last_lecture_id {
            Some(lecture_id) => self
                .uow
                .catalog
                .get_lecture(lecture_id)
                .await?
                .filter(|l| !l.is_deleted),
            None => None,
        };

        Ok((enrollment, lecture))
    }

    pub async fn get_enrollment(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>> {
        self.uow.enrollments.get(user_id, course_id).await
    }

    /// Admin revoke. Watch history is kept; only the access grant goes away.
    pub async fn revoke(&self, enrollment_id: EnrollmentId) -> Result<()> {
        self.uow
            .enrollments
            .get_by_id(enrollment_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("enrollment {enrollment_id}")))?;
        self.uow.enrollments.delete(enrollment_id).await?;
        info!(%enrollment_id, "enrollment revoked");
        Ok(())
    }
}


impl std::fmt::Debug for EnrollmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentService")
            .field("uow", &self.uow)
            .finish_non_exhaustive()
    }
}
