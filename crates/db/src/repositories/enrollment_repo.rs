//! Repository for the `enrollments` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{Enrollment, MyCourseRow};

/// Column list for the `enrollments` table.
const COLUMNS: &str = "user_id, course_id, purchased_at";

/// Provides enrollment membership and the per-learner course listing.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a user. Idempotent: returns `false` when already enrolled.
    pub async fn enroll(pool: &PgPool, user_id: DbId, course_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the enrollment of a user in a course.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments WHERE user_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user is enrolled in a course.
    pub async fn is_enrolled(pool: &PgPool, user_id: DbId, course_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// Number of learners enrolled in a course.
    pub async fn count_for_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    /// Every enrollment of a user with done/total lesson counts, newest
    /// purchase first. One grouped query; removed courses are included.
    pub async fn list_for_user_with_counts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<MyCourseRow>, sqlx::Error> {
        sqlx::query_as::<_, MyCourseRow>(
            "SELECT c.id AS course_id, c.title, c.cover_url, c.is_removed, \
                    u.name AS instructor_name, e.purchased_at, \
                    COUNT(l.id) FILTER (WHERE p.is_done) AS done_lessons, \
                    COUNT(l.id) AS total_lessons \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             JOIN instructors i ON i.id = c.instructor_id \
             JOIN users u ON u.id = i.user_id \
             LEFT JOIN sections s ON s.course_id = c.id \
             LEFT JOIN lessons l ON l.section_id = s.id \
             LEFT JOIN progress p ON p.lesson_id = l.id AND p.user_id = e.user_id \
             WHERE e.user_id = $1 \
             GROUP BY c.id, c.title, c.cover_url, c.is_removed, u.name, e.purchased_at \
             ORDER BY e.purchased_at DESC, c.id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
