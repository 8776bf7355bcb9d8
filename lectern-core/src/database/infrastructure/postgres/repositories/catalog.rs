use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use lectern_model::{Course, CourseId, CourseStatus, Lecture, LectureId, Section, SectionId};

use crate::database::ports::catalog::{
    CatalogRepository, LectureUpdate, NewCourse, NewLecture, NewSection,
};
use crate::error::{CoreError, Result};

#[derive(Clone, Debug)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    total_hours: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> Result<Course> {
        let status: CourseStatus = self.status.parse().map_err(CoreError::Internal)?;
        Ok(Course {
            id: CourseId(self.id),
            title: self.title,
            description: self.description,
            status,
            total_hours: self.total_hours,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SectionRow {
    id: Uuid,
    course_id: Uuid,
    title: String,
    description: String,
    index: i32,
    is_published: bool,
    is_deleted: bool,
    total_hours: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SectionRow> for Section {
    fn from(row: SectionRow) -> Self {
        Section {
            id: SectionId(row.id),
            course_id: CourseId(row.course_id),
            title: row.title,
            description: row.description,
            index: row.index,
            is_published: row.is_published,
            is_deleted: row.is_deleted,
            total_hours: row.total_hours,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LectureRow {
    id: Uuid,
    section_id: Uuid,
    title: String,
    description: String,
    storage_id: String,
    duration_seconds: i32,
    index: i32,
    is_free_preview: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LectureRow> for Lecture {
    fn from(row: LectureRow) -> Self {
        Lecture {
            id: LectureId(row.id),
            section_id: SectionId(row.section_id),
            title: row.title,
            description: row.description,
            storage_id: row.storage_id,
            duration_seconds: row.duration_seconds,
            index: row.index,
            is_free_preview: row.is_free_preview,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COURSE_COLUMNS: &str =
    "id, title, description, status, total_hours, created_at, updated_at";
const SECTION_COLUMNS: &str = r#"id, course_id, title, description, "index", is_published, is_deleted, total_hours, created_at, updated_at"#;
const LECTURE_COLUMNS: &str = r#"id, section_id, title, description, storage_id, duration_seconds, "index", is_free_preview, is_deleted, created_at, updated_at"#;

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn create_course(&self, new: NewCourse) -> Result<Course> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            INSERT INTO courses (id, title, description, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(new.title)
        .bind(new.description)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to create course: {}", e)))?;

        row.into_course()
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to get course: {}", e)))?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn set_course_status(&self, id: CourseId, status: CourseStatus) -> Result<Course> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            r#"
            UPDATE courses
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(id.to_uuid())
        .bind(status.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to update course status: {}", e)))?
        .ok_or_else(|| CoreError::NotFound(format!("course {id}")))?;

        row.into_course()
    }

    async fn set_course_hours(&self, id: CourseId, total_hours: f64) -> Result<()> {
        sqlx::query("UPDATE courses SET total_hours = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.to_uuid())
            .bind(total_hours)
            .execute(self.pool())
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to set course hours: {}", e)))?;
        Ok(())
    }

    async fn create_section(&self, new: NewSection) -> Result<Section> {
        let row = sqlx::query_as::<_, SectionRow>(&format!(
            r#"
            INSERT INTO sections (id, course_id, title, description, "index", is_published)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {SECTION_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(new.course_id.to_uuid())
        .bind(new.title)
        .bind(new.description)
        .bind(new.index)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to create section: {}", e)))?;

        Ok(row.into())
    }

    async fn get_section(&self, id: SectionId) -> Result<Option<Section>> {
        let row = sqlx::query_as::<_, SectionRow>(&format!(
            "SELECT {SECTION_COLUMNS} FROM sections WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to get section: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn update_section(
        &self,
        id: SectionId,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Section> {
        let row = sqlx::query_as::<_, SectionRow>(&format!(
            r#"
            UPDATE sections
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {SECTION_COLUMNS}
            "#
        ))
        .bind(id.to_uuid())
        .bind(title)
        .bind(description)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to update section: {}", e)))?
        .ok_or_else(|| CoreError::NotFound(format!("section {id}")))?;

        Ok(row.into())
    }

    async fn soft_delete_section(&self, id: SectionId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE sections SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id.to_uuid())
        .execute(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to soft-delete section: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("section {id}")));
        }
        Ok(())
    }

    async fn active_sections(&self, course_id: CourseId) -> Result<Vec<Section>> {
        let rows = sqlx::query_as::<_, SectionRow>(&format!(
            r#"
            SELECT {SECTION_COLUMNS}
            FROM sections
            WHERE course_id = $1 AND is_deleted = FALSE
            ORDER BY "index"
            "#
        ))
        .bind(course_id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to list sections: {}", e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn apply_section_order(
        &self,
        course_id: CourseId,
        ordered_ids: Vec<SectionId>,
    ) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to start transaction: {}", e)))?;

        for (position, section_id) in ordered_ids.iter().enumerate() {
            let result = sqlx::query(
                r#"
                UPDATE sections
                SET "index" = $1, updated_at = NOW()
                WHERE id = $2 AND course_id = $3 AND is_deleted = FALSE
                "#,
            )
            .bind(position as i32)
            .bind(section_id.to_uuid())
            .bind(course_id.to_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to reorder sections: {}", e)))?;

            // The set was validated up front; a miss here means the tree
            // changed underneath us and the whole batch must roll back.
            if result.rows_affected() != 1 {
                return Err(CoreError::Conflict(format!(
                    "section {section_id} changed during reorder"
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to commit reorder: {}", e)))?;

        info!("Reordered {} sections of course {}", ordered_ids.len(), course_id);
        Ok(())
    }

    async fn set_section_hours(&self, id: SectionId, total_hours: f64) -> Result<()> {
        sqlx::query("UPDATE sections SET total_hours = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.to_uuid())
            .bind(total_hours)
            .execute(self.pool())
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to set section hours: {}", e)))?;
        Ok(())
    }

    async fn create_lecture(&self, new: NewLecture) -> Result<Lecture> {
        let row = sqlx::query_as::<_, LectureRow>(&format!(
            r#"
            INSERT INTO lectures (id, section_id, title, description, storage_id, duration_seconds, "index")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {LECTURE_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(new.section_id.to_uuid())
        .bind(new.title)
        .bind(new.description)
        .bind(new.storage_id)
        .bind(new.duration_seconds)
        .bind(new.index)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to create lecture: {}", e)))?;

        Ok(row.into())
    }

    async fn get_lecture(&self, id: LectureId) -> Result<Option<Lecture>> {
        let row = sqlx::query_as::<_, LectureRow>(&format!(
            "SELECT {LECTURE_COLUMNS} FROM lectures WHERE id = $1"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to get lecture: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn update_lecture(&self, id: LectureId, update: LectureUpdate) -> Result<Lecture> {
        let row = sqlx::query_as::<_, LectureRow>(&format!(
            r#"
            UPDATE lectures
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                storage_id = COALESCE($4, storage_id),
                duration_seconds = COALESCE($5, duration_seconds),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {LECTURE_COLUMNS}
            "#
        ))
        .bind(id.to_uuid())
        .bind(update.title)
        .bind(update.description)
        .bind(update.storage_id)
        .bind(update.duration_seconds)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to update lecture: {}", e)))?
        .ok_or_else(|| CoreError::NotFound(format!("lecture {id}")))?;

        Ok(row.into())
    }

    async fn toggle_free_preview(&self, id: LectureId) -> Result<Lecture> {
        let row = sqlx::query_as::<_, LectureRow>(&format!(
            r#"
            UPDATE lectures
            SET is_free_preview = NOT is_free_preview, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {LECTURE_COLUMNS}
            "#
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to toggle preview: {}", e)))?
        .ok_or_else(|| CoreError::NotFound(format!("lecture {id}")))?;

        Ok(row.into())
    }

    async fn active_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>> {
        let rows = sqlx::query_as::<_, LectureRow>(&format!(
            r#"
            SELECT {LECTURE_COLUMNS}
            FROM lectures
            WHERE section_id = $1 AND is_deleted = FALSE
            ORDER BY "index"
            "#
        ))
        .bind(section_id.to_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to list lectures: {}", e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn apply_lecture_order(
        &self,
        section_id: SectionId,
        ordered_ids: Vec<LectureId>,
    ) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to start transaction: {}", e)))?;

        for (position, lecture_id) in ordered_ids.iter().enumerate() {
            let result = sqlx::query(
                r#"
                UPDATE lectures
                SET "index" = $1, updated_at = NOW()
                WHERE id = $2 AND section_id = $3 AND is_deleted = FALSE
                "#,
            )
            .bind(position as i32)
            .bind(lecture_id.to_uuid())
            .bind(section_id.to_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to reorder lectures: {}", e)))?;

            if result.rows_affected() != 1 {
                return Err(CoreError::Conflict(format!(
                    "lecture {lecture_id} changed during reorder"
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to commit reorder: {}", e)))?;

        info!("Reordered {} lectures of section {}", ordered_ids.len(), section_id);
        Ok(())
    }

    async fn hard_delete_lecture(&self, id: LectureId) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to start transaction: {}", e)))?;

        let target = sqlx::query_as::<_, (Uuid, i32)>(
            r#"SELECT section_id, "index" FROM lectures WHERE id = $1 AND is_deleted = FALSE FOR UPDATE"#,
        )
        .bind(id.to_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to load lecture for delete: {}", e)))?
        .ok_or_else(|| CoreError::NotFound(format!("lecture {id}")))?;

        let (section_id, deleted_index) = target;

        sqlx::query("DELETE FROM lectures WHERE id = $1")
            .bind(id.to_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to delete lecture: {}", e)))?;

        // Close the gap so the surviving active lectures are dense again.
        sqlx::query(
            r#"
            UPDATE lectures
            SET "index" = "index" - 1, updated_at = NOW()
            WHERE section_id = $1 AND is_deleted = FALSE AND "index" > $2
            "#,
        )
        .bind(section_id)
        .bind(deleted_index)
        .execute(&mut *tx)
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to shift lecture indices: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to commit delete: {}", e)))?;

        Ok(())
    }

    async fn sum_active_lecture_seconds(&self, section_id: SectionId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(duration_seconds), 0)
            FROM lectures
            WHERE section_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(section_id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to sum lecture durations: {}", e)))
    }

    async fn sum_active_section_hours(&self, course_id: CourseId) -> Result<f64> {
        sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(total_hours), 0)::float8
            FROM sections
            WHERE course_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(course_id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to sum section hours: {}", e)))
    }

    async fn count_active_lectures_in_course(&self, course_id: CourseId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM lectures l
            JOIN sections s ON s.id = l.section_id
            WHERE s.course_id = $1 AND s.is_deleted = FALSE AND l.is_deleted = FALSE
            "#,
        )
        .bind(course_id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to count course lectures: {}", e)))
    }

    async fn has_publishable_content(&self, course_id: CourseId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM lectures l
                JOIN sections s ON s.id = l.section_id
                WHERE s.course_id = $1 AND s.is_deleted = FALSE AND l.is_deleted = FALSE
            )
            "#,
        )
        .bind(course_id.to_uuid())
        .fetch_one(self.pool())
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to check publishable content: {}", e)))
    }
}
