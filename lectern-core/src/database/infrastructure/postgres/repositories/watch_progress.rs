use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use lectern_model::{CourseId, LectureId, UserId, WatchedProgress};

use crate::database::ports::watch_progress::WatchProgressRepository;
use crate::error::{CoreError, Result};

#[derive(Clone, Debug)]
pub struct PostgresWatchProgressRepository {
    pool: PgPool,
}

impl PostgresWatchProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WatchedProgressRow {
    user_id: Uuid,
    course_id: Uuid,
    lecture_id: Uuid,
    watched_seconds: i32,
    is_completed: bool,
    updated_at: DateTime<Utc>,
}

impl From<WatchedProgressRow> for WatchedProgress {
    fn from(row: WatchedProgressRow) -> Self {
        WatchedProgress {
            user_id: UserId(row.user_id),
            course_id: CourseId(row.course_id),
            lecture_id: LectureId(row.lecture_id),
            watched_seconds: row.watched_seconds,
            is_completed: row.is_completed,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl WatchProgressRepository for PostgresWatchProgressRepository {
    async fn upsert_monotonic(
        &self,
        user_id: UserId,
        course_id: CourseId,
        lecture_id: LectureId,
        watched_seconds: i32,
        is_completed: bool,
    ) -> Result<WatchedProgress> {
        // Single conditional statement: racing beacons from the same client
        // resolve at the storage layer, duration never regresses, and the
        // completion flag never reverts.
        let row = sqlx::query_as::<_, WatchedProgressRow>(
            r#"
            INSERT INTO watched_progress (
                user_id, course_id, lecture_id, watched_seconds, is_completed
            )
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, course_id, lecture_id) DO UPDATE SET
                watched_seconds = GREATEST(watched_progress.watched_seconds, EXCLUDED.watched_seconds),
                is_completed = watched_progress.is_completed OR EXCLUDED.is_completed,
                updated_at = NOW()
            RETURNING user_id, course_id, lecture_id, watched_seconds, is_completed, updated_at
            "#,
        )
        .bind(user_id.to_uuid())
        .bind(course_id.to_uuid())
        .bind(lecture_id.to_uuid())
        .bind(watched_seconds)
        .bind(is_completed)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to upsert watch progress: {}", e)))?;

        Ok(row.into())
    }

    async fn get(
        &self,
        user_id: UserId,
        course_id: CourseId,
        lecture_id: LectureId,
    ) -> Result<Option<WatchedProgress>> {
        let row = sqlx::query_as::<_, WatchedProgressRow>(
            r#"
            SELECT user_id, course_id, lecture_id, watched_seconds, is_completed, updated_at
            FROM watched_progress
            WHERE user_id = $1 AND course_id = $2 AND lecture_id = $3
            "#,
        )
        .bind(user_id.to_uuid())
        .bind(course_id.to_uuid())
        .bind(lecture_id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to get watch progress: {}", e)))?;

        Ok(row.map(Into::into))
    }
}
