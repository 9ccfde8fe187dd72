//! Repository for the `progress` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{LessonCounts, Progress, RecordProgress};

/// Column list for the `progress` table.
const COLUMNS: &str = "user_id, lesson_id, watched_sec, is_done, updated_at";

/// Provides lesson progress upserts and per-course completion counts.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Record progress on a lesson. A later write overwrites an earlier one.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &RecordProgress,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, lesson_id, watched_sec, is_done) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, lesson_id) DO UPDATE SET \
                watched_sec = EXCLUDED.watched_sec, \
                is_done = EXCLUDED.is_done \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(input.lesson_id)
            .bind(input.watched_sec)
            .bind(input.is_done)
            .fetch_one(pool)
            .await
    }

    /// Find a learner's progress on one lesson.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE user_id = $1 AND lesson_id = $2");
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(pool)
            .await
    }

    /// Completed and total lesson counts of a learner in a course.
    pub async fn course_counts(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<LessonCounts, sqlx::Error> {
        sqlx::query_as::<_, LessonCounts>(
            "SELECT COUNT(l.id) FILTER (WHERE p.is_done) AS done_lessons, \
                    COUNT(l.id) AS total_lessons \
             FROM sections s \
             JOIN lessons l ON l.section_id = s.id \
             LEFT JOIN progress p ON p.lesson_id = l.id AND p.user_id = $1 \
             WHERE s.course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }
}
