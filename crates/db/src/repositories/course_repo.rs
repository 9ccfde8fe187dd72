//! Repository for the `courses` table.

use academy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::course::{
    AdminCourseFilter, AdminCourseRow, Course, CourseDetail, CourseOwner, CreateCourse,
    UpdateCourse,
};

/// Column list for the `courses` table.
const COLUMNS: &str = "id, cat_id, instructor_id, title, short_desc, long_desc, cover_url, \
    price, promo_price, is_completed, is_removed, view_count, created_at, updated_at";

/// Shared FROM/JOIN clause and filter for the admin listing.
///
/// `$1` keyword pattern, `$2` category, `$3` instructor, `$4` include removed.
const ADMIN_FROM_WHERE: &str = "\
    FROM courses c \
    JOIN categories cat ON cat.id = c.cat_id \
    JOIN instructors i ON i.id = c.instructor_id \
    JOIN users u ON u.id = i.user_id \
    WHERE ($1::TEXT IS NULL OR c.title ILIKE $1) \
      AND ($2::BIGINT IS NULL OR c.cat_id = $2) \
      AND ($3::BIGINT IS NULL OR c.instructor_id = $3) \
      AND ($4 OR c.is_removed = FALSE)";

/// Provides CRUD, moderation and admin listing for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a course for the given instructor. Inputs must be validated.
    pub async fn create(
        conn: &mut PgConnection,
        instructor_id: DbId,
        input: &CreateCourse,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses \
                (cat_id, instructor_id, title, short_desc, long_desc, cover_url, price, promo_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(input.cat_id)
            .bind(instructor_id)
            .bind(&input.title)
            .bind(&input.short_desc)
            .bind(&input.long_desc)
            .bind(&input.cover_url)
            .bind(input.price)
            .bind(input.promo_price)
            .fetch_one(conn)
            .await
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a course row for update and return it.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Load the owning user and lifecycle flags of a course.
    pub async fn find_owner(pool: &PgPool, id: DbId) -> Result<Option<CourseOwner>, sqlx::Error> {
        sqlx::query_as::<_, CourseOwner>(
            "SELECT c.id AS course_id, i.user_id AS owner_user_id \
             FROM courses c \
             JOIN instructors i ON i.id = c.instructor_id \
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Apply a patch to a course. Only non-`None` fields are applied.
    ///
    /// `clear_promo_price` nulls the promotional price. Returns `None` if no
    /// row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET \
                cat_id = COALESCE($2, cat_id), \
                title = COALESCE($3, title), \
                short_desc = COALESCE($4, short_desc), \
                long_desc = COALESCE($5, long_desc), \
                cover_url = COALESCE($6, cover_url), \
                price = COALESCE($7, price), \
                promo_price = CASE WHEN $9 THEN NULL ELSE COALESCE($8, promo_price) END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(input.cat_id)
            .bind(&input.title)
            .bind(&input.short_desc)
            .bind(&input.long_desc)
            .bind(&input.cover_url)
            .bind(input.price)
            .bind(input.promo_price)
            .bind(input.clear_promo_price)
            .fetch_optional(conn)
            .await
    }

    /// Set or clear the soft-delete flag. Returns `true` if a row was updated.
    pub async fn set_removed(pool: &PgPool, id: DbId, removed: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE courses SET is_removed = $2 WHERE id = $1")
            .bind(id)
            .bind(removed)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flag a course as completed. Returns `true` if a row was updated.
    pub async fn mark_completed(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE courses SET is_completed = TRUE WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a course. Lessons are removed first since they restrict
    /// their sections; sections, enrollments and reviews cascade.
    ///
    /// Returns `true` if the course existed.
    pub async fn purge(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "DELETE FROM lessons \
             WHERE section_id IN (SELECT id FROM sections WHERE course_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the view counter of a visible course.
    pub async fn record_view(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET view_count = view_count + 1 \
             WHERE id = $1 AND is_removed = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the course has a section, and a lesson in any of its sections.
    pub async fn content_presence(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<(bool, bool), sqlx::Error> {
        sqlx::query_as::<_, (bool, bool)>(
            "SELECT \
                EXISTS(SELECT 1 FROM sections s WHERE s.course_id = $1), \
                EXISTS(SELECT 1 FROM lessons l \
                       JOIN sections s ON s.id = l.section_id \
                       WHERE s.course_id = $1)",
        )
        .bind(id)
        .fetch_one(conn)
        .await
    }

    /// One page of the admin listing, most recently edited first.
    pub async fn list_admin(
        pool: &PgPool,
        filter: &AdminCourseFilter,
        keyword_pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminCourseRow>, sqlx::Error> {
        let query = format!(
            "SELECT c.id, c.title, c.cat_id, cat.name AS category_name, \
                    c.instructor_id, u.name AS instructor_name, \
                    c.price, c.promo_price, c.is_completed, c.is_removed, c.view_count, \
                    c.created_at, c.updated_at \
             {ADMIN_FROM_WHERE} \
             ORDER BY c.updated_at DESC, c.id DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, AdminCourseRow>(&query)
            .bind(keyword_pattern)
            .bind(filter.category_id)
            .bind(filter.instructor_id)
            .bind(filter.include_removed.unwrap_or(true))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of rows matching the admin listing filter.
    pub async fn count_admin(
        pool: &PgPool,
        filter: &AdminCourseFilter,
        keyword_pattern: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) {ADMIN_FROM_WHERE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(keyword_pattern)
            .bind(filter.category_id)
            .bind(filter.instructor_id)
            .bind(filter.include_removed.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// One page of an instructor's own courses, removed ones included.
    pub async fn list_by_instructor(
        pool: &PgPool,
        instructor_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses \
             WHERE instructor_id = $1 \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(instructor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of courses owned by an instructor.
    pub async fn count_by_instructor(pool: &PgPool, instructor_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses WHERE instructor_id = $1")
            .bind(instructor_id)
            .fetch_one(pool)
            .await
    }

    /// Load the joined detail view of a course, removed or not.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<CourseDetail>, sqlx::Error> {
        sqlx::query_as::<_, CourseDetail>(
            "SELECT c.id, c.cat_id, cat.name AS category_name, \
                    c.instructor_id, i.user_id AS instructor_user_id, \
                    u.name AS instructor_name, i.bio AS instructor_bio, \
                    c.title, c.short_desc, c.long_desc, c.cover_url, \
                    c.price, c.promo_price, c.is_completed, c.is_removed, c.view_count, \
                    COALESCE(r.rating_avg, 0)::FLOAT8 AS rating_avg, \
                    r.rating_count, e.students_count, lc.lesson_count, \
                    c.created_at, c.updated_at \
             FROM courses c \
             JOIN categories cat ON cat.id = c.cat_id \
             JOIN instructors i ON i.id = c.instructor_id \
             JOIN users u ON u.id = i.user_id \
             LEFT JOIN LATERAL ( \
                 SELECT AVG(rv.rating)::FLOAT8 AS rating_avg, COUNT(*) AS rating_count \
                 FROM reviews rv WHERE rv.course_id = c.id \
             ) r ON TRUE \
             LEFT JOIN LATERAL ( \
                 SELECT COUNT(*) AS students_count \
                 FROM enrollments en WHERE en.course_id = c.id \
             ) e ON TRUE \
             LEFT JOIN LATERAL ( \
                 SELECT COUNT(*) AS lesson_count \
                 FROM lessons l JOIN sections s ON s.id = l.section_id \
                 WHERE s.course_id = c.id \
             ) lc ON TRUE \
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
