//! Repository for the `sections` table and the course outline query.

use academy_core::integrity::{DeleteBlocker, DeleteOutcome};
use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::section::{
    CreateSection, OutlineLesson, OutlineRow, OutlineSection, Section, UpdateSection,
};

/// Column list for the `sections` table.
const COLUMNS: &str = "id, course_id, title, order_no, created_at, updated_at";

/// Provides CRUD operations and outline assembly for course sections.
pub struct SectionRepo;

impl SectionRepo {
    /// Insert a section. A taken `(course_id, order_no)` slot fails with a
    /// unique violation on `uq_sections_course_order`.
    pub async fn create(pool: &PgPool, input: &CreateSection) -> Result<Section, sqlx::Error> {
        let query = format!(
            "INSERT INTO sections (course_id, title, order_no) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(input.order_no)
            .fetch_one(pool)
            .await
    }

    /// Find a section by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rename or reorder a section. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "UPDATE sections SET \
                title = COALESCE($2, title), \
                order_no = COALESCE($3, order_no) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.order_no)
            .fetch_optional(pool)
            .await
    }

    /// Delete a section unless a lesson still references it.
    ///
    /// Holds a row lock on the section between the check and the delete; a
    /// concurrent lesson insert waits on the lock through its foreign key.
    pub async fn safe_delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query_scalar::<_, DbId>("SELECT id FROM sections WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let has_lesson = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM lessons WHERE section_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if has_lesson {
            return Ok(DeleteOutcome::Blocked(DeleteBlocker::HasLesson));
        }

        sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Assemble the outline of a course: sections by `(order_no, id)`, each
    /// with its lessons by `(order_no, id)`.
    ///
    /// With `preview_only`, non-preview lessons are filtered inside the join
    /// so sections left without lessons still appear.
    pub async fn outline(
        pool: &PgPool,
        course_id: DbId,
        preview_only: bool,
    ) -> Result<Vec<OutlineSection>, sqlx::Error> {
        let rows = sqlx::query_as::<_, OutlineRow>(
            "SELECT s.id AS section_id, s.title AS section_title, s.order_no AS section_order_no, \
                    l.id AS lesson_id, l.title AS lesson_title, l.video_url, l.duration_sec, \
                    l.is_preview, l.order_no AS lesson_order_no \
             FROM sections s \
             LEFT JOIN lessons l ON l.section_id = s.id AND ($2 = FALSE OR l.is_preview) \
             WHERE s.course_id = $1 \
             ORDER BY s.order_no, s.id, l.order_no, l.id",
        )
        .bind(course_id)
        .bind(preview_only)
        .fetch_all(pool)
        .await?;

        Ok(group_outline(rows))
    }
}

/// Fold ordered join rows into sections. Relies on rows of one section
/// being contiguous, which the query's ordering guarantees.
fn group_outline(rows: Vec<OutlineRow>) -> Vec<OutlineSection> {
    let mut sections: Vec<OutlineSection> = Vec::new();
    for row in rows {
        if sections.last().map(|s| s.id) != Some(row.section_id) {
            sections.push(OutlineSection {
                id: row.section_id,
                title: row.section_title.clone(),
                order_no: row.section_order_no,
                lessons: Vec::new(),
            });
        }
        let lesson = match (row.lesson_id, row.lesson_title, row.video_url, row.lesson_order_no) {
            (Some(id), Some(title), Some(video_url), Some(order_no)) => OutlineLesson {
                id,
                title,
                video_url,
                duration_sec: row.duration_sec,
                is_preview: row.is_preview.unwrap_or(false),
                order_no,
            },
            _ => continue,
        };
        if let Some(section) = sections.last_mut() {
            section.lessons.push(lesson);
        }
    }
    sections
}
