//! Learner-facing course listings: full-text search, category listings and
//! discovery feeds.
//!
//! Every query here excludes soft-deleted courses. Aggregates are joined in
//! through `LATERAL` subqueries so they can drive ordering without being
//! stored on `courses`.

use academy_core::search::{CourseSort, TS_CONFIG};
use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::search::{CourseCard, ListParams};

/// Card projection with category, instructor and aggregates joined in.
/// Callers append further joins and their own `WHERE` clause.
pub(crate) const CARD_SELECT: &str = "\
    SELECT c.id, c.title, c.short_desc, c.cover_url, c.cat_id, cat.name AS category_name, \
           u.name AS instructor_name, c.price, c.promo_price, c.is_completed, c.view_count, \
           COALESCE(r.rating_avg, 0)::FLOAT8 AS rating_avg, r.rating_count, \
           e.students_count, c.created_at \
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
    ) e ON TRUE";

/// Primary `ORDER BY` expression for a sort key.
fn order_by(sort: CourseSort) -> &'static str {
    match sort {
        CourseSort::Rating => "COALESCE(r.rating_avg, 0) DESC",
        CourseSort::Price => "COALESCE(c.promo_price, c.price) ASC",
        CourseSort::Newest => "c.created_at DESC",
        CourseSort::Bestseller => "e.students_count DESC",
    }
}

/// Provides the ranked, paginated course listings.
pub struct SearchRepo;

impl SearchRepo {
    /// Count visible courses matching a `tsquery` string.
    pub async fn count_matches(pool: &PgPool, tsquery: &str) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM courses c \
             WHERE c.is_removed = FALSE AND c.fts @@ to_tsquery('{TS_CONFIG}', $1)"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(tsquery)
            .fetch_one(pool)
            .await
    }

    /// One page of visible courses matching a `tsquery` string.
    ///
    /// Ordered by the sort key, then text rank, then id.
    pub async fn search(
        pool: &PgPool,
        tsquery: &str,
        params: &ListParams,
    ) -> Result<Vec<CourseCard>, sqlx::Error> {
        let order = order_by(params.sort);
        let query = format!(
            "{CARD_SELECT} \
             WHERE c.is_removed = FALSE AND c.fts @@ to_tsquery('{TS_CONFIG}', $1) \
             ORDER BY {order}, ts_rank(c.fts, to_tsquery('{TS_CONFIG}', $1)) DESC, c.id ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CourseCard>(&query)
            .bind(tsquery)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Count visible courses in a category. A root category covers the
    /// courses of all its children.
    pub async fn count_by_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM courses c \
             WHERE c.is_removed = FALSE \
               AND c.cat_id IN (SELECT id FROM categories WHERE id = $1 OR parent_id = $1)",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    /// One page of visible courses in a category (and its children).
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
        params: &ListParams,
    ) -> Result<Vec<CourseCard>, sqlx::Error> {
        let order = order_by(params.sort);
        let query = format!(
            "{CARD_SELECT} \
             WHERE c.is_removed = FALSE \
               AND c.cat_id IN (SELECT id FROM categories WHERE id = $1 OR parent_id = $1) \
             ORDER BY {order}, c.id ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CourseCard>(&query)
            .bind(category_id)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Most recently created courses.
    pub async fn newest(pool: &PgPool, limit: i64) -> Result<Vec<CourseCard>, sqlx::Error> {
        Self::feed(pool, "c.created_at DESC, c.id DESC", limit).await
    }

    /// Most viewed courses.
    pub async fn most_viewed(pool: &PgPool, limit: i64) -> Result<Vec<CourseCard>, sqlx::Error> {
        Self::feed(pool, "c.view_count DESC, c.id ASC", limit).await
    }

    /// Courses with the most enrollments.
    pub async fn bestsellers(pool: &PgPool, limit: i64) -> Result<Vec<CourseCard>, sqlx::Error> {
        Self::feed(pool, "e.students_count DESC, c.id ASC", limit).await
    }

    /// Other visible courses in the same category, bestsellers first.
    pub async fn related(
        pool: &PgPool,
        course_id: DbId,
        limit: i64,
    ) -> Result<Vec<CourseCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} \
             WHERE c.is_removed = FALSE \
               AND c.id <> $1 \
               AND c.cat_id = (SELECT cat_id FROM courses WHERE id = $1) \
             ORDER BY e.students_count DESC, c.id ASC \
             LIMIT $2"
        );
        sqlx::query_as::<_, CourseCard>(&query)
            .bind(course_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    async fn feed(
        pool: &PgPool,
        order: &'static str,
        limit: i64,
    ) -> Result<Vec<CourseCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} \
             WHERE c.is_removed = FALSE \
             ORDER BY {order} \
             LIMIT $1"
        );
        sqlx::query_as::<_, CourseCard>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
