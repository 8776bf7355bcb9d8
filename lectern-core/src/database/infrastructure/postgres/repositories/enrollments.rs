use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use lectern_model::{CourseId, Enrollment, EnrollmentId, LectureId, UserId};

use crate::database::ports::enrollments::EnrollmentsRepository;
use crate::error::{CoreError, Result};

#[derive(Clone, Debug)]
pub struct PostgresEnrollmentsRepository {
    pool: PgPool,
}

impl PostgresEnrollmentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    progress: i32,
    completed: bool,
    last_lecture_id: Option<Uuid>,
    enrolled_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Enrollment {
            id: EnrollmentId(row.id),
            user_id: UserId(row.user_id),
            course_id: CourseId(row.course_id),
            progress: row.progress,
            completed: row.completed,
            last_lecture_id: row.last_lecture_id.map(LectureId),
            enrolled_at: row.enrolled_at,
            last_accessed_at: row.last_accessed_at,
        }
    }
}

const ENROLLMENT_COLUMNS: &str =
    "id, user_id, course_id, progress, completed, last_lecture_id, enrolled_at, last_accessed_at";

#[async_trait]
impl EnrollmentsRepository for PostgresEnrollmentsRepository {
    async fn create(&self, user_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            r#"
            INSERT INTO enrollments (id, user_id, course_id)
            VALUES ($1, $2, $3)
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(user_id.to_uuid())
        .bind(course_id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| match &e {
            // The (user, course) pair is unique; a duplicate payment event
            // must be rejected, not re-applied.
            sqlx::Error::Database(db) if db.is_unique_violation() => CoreError::Conflict(
                format!("user {user_id} is already enrolled in course {course_id}"),
            ),
            _ => CoreError::Internal(format!("Failed to create enrollment: {}", e)),
        })?;

        info!("Enrolled user {} in course {}", user_id, course_id);
        Ok(row.into())
    }

    async fn get(&self, user_id: UserId, course_id: CourseId) -> Result<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2"
        ))
        .bind(user_id.to_uuid())
        .bind(course_id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to get enrollment: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn get_by_id(&self, id: EnrollmentId) -> Result<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to get enrollment: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: EnrollmentId) -> Result<()> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id.to_uuid())
            .execute(self.pool())
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to delete enrollment: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("enrollment {id}")));
        }
        info!("Revoked enrollment {}", id);
        Ok(())
    }

    async fn touch_last_access(&self, id: EnrollmentId, lecture_id: LectureId) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE enrollments
            SET last_lecture_id = $2, last_accessed_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.to_uuid())
        .bind(lecture_id.to_uuid())
        .execute(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to touch enrollment: {}", e)))?;
        Ok(())
    }

    async fn add_completed_lecture(
        &self,
        id: EnrollmentId,
        lecture_id: LectureId,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollment_completed_lectures (enrollment_id, lecture_id)
            VALUES ($1, $2)
            ON CONFLICT (enrollment_id, lecture_id) DO NOTHING
            "#,
        )
        .bind(id.to_uuid())
        .bind(lecture_id.to_uuid())
        .execute(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to record completed lecture: {}", e)))?;

        // Zero rows affected means the lecture was already in the set, so a
        // retried beacon does not count as a new completion.
        Ok(result.rows_affected() > 0)
    }

    async fn count_completed_active_lectures(&self, id: EnrollmentId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM enrollment_completed_lectures ecl
            JOIN enrollments e ON e.id = ecl.enrollment_id
            JOIN lectures l ON l.id = ecl.lecture_id AND l.is_deleted = FALSE
            JOIN sections s ON s.id = l.section_id
                AND s.is_deleted = FALSE
                AND s.course_id = e.course_id
            WHERE ecl.enrollment_id = $1
            "#,
        )
        .bind(id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to count completed lectures: {}", e)))
    }

    async fn completed_lecture_ids(&self, id: EnrollmentId) -> Result<Vec<LectureId>> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT lecture_id FROM enrollment_completed_lectures WHERE enrollment_id = $1",
        )
        .bind(id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to list completed lectures: {}", e)))?;

        Ok(rows.into_iter().map(LectureId).collect())
    }

    async fn set_progress(
        &self,
        id: EnrollmentId,
        progress: i32,
        completed: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE enrollments
            SET progress = $2, completed = $3
            WHERE id = $1
            "#,
        )
        .bind(id.to_uuid())
        .bind(progress)
        .bind(completed)
        .execute(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to set enrollment progress: {}", e)))?;
        Ok(())
    }
}
