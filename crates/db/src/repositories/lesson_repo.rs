//! Repository for the `lessons` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::lesson::{CreateLesson, Lesson, LessonScope, UpdateLesson};

/// Column list for the `lessons` table.
const COLUMNS: &str = "id, section_id, title, video_url, duration_sec, is_preview, order_no, \
    created_at, updated_at";

/// Provides CRUD operations for lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Insert a lesson. A taken `(section_id, order_no)` slot fails with a
    /// unique violation on `uq_lessons_section_order`.
    pub async fn create(pool: &PgPool, input: &CreateLesson) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (section_id, title, video_url, duration_sec, is_preview, order_no) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(input.section_id)
            .bind(&input.title)
            .bind(&input.video_url)
            .bind(input.duration_sec)
            .bind(input.is_preview)
            .bind(input.order_no)
            .fetch_one(pool)
            .await
    }

    /// Resolve the section and course a lesson belongs to.
    pub async fn find_scope(pool: &PgPool, id: DbId) -> Result<Option<LessonScope>, sqlx::Error> {
        sqlx::query_as::<_, LessonScope>(
            "SELECT l.id AS lesson_id, l.section_id, s.course_id \
             FROM lessons l \
             JOIN sections s ON s.id = l.section_id \
             WHERE l.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List the lessons of a section in display order.
    pub async fn list_by_section(pool: &PgPool, section_id: DbId) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE section_id = $1 ORDER BY order_no, id"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(section_id)
            .fetch_all(pool)
            .await
    }

    /// Patch a lesson. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLesson,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!(
            "UPDATE lessons SET \
                title = COALESCE($2, title), \
                video_url = COALESCE($3, video_url), \
                duration_sec = COALESCE($4, duration_sec), \
                is_preview = COALESCE($5, is_preview), \
                order_no = COALESCE($6, order_no) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.video_url)
            .bind(input.duration_sec)
            .bind(input.is_preview)
            .bind(input.order_no)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lesson. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
