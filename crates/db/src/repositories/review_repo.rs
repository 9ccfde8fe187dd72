//! Repository for the `reviews` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{RatingStats, Review, ReviewWithAuthor};

/// Column list for the `reviews` table.
const COLUMNS: &str = "id, user_id, course_id, rating, comment, created_at, updated_at";

/// Provides review creation, listing and rating aggregates.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. A second review by the same user fails with a unique
    /// violation on `uq_reviews_user_course`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (user_id, course_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(rating)
            .bind(comment)
            .fetch_one(pool)
            .await
    }

    /// Newest reviews of a course with author names.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
        limit: i64,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.user_id, u.name AS user_name, r.rating, r.comment, r.created_at \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.course_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT $2",
        )
        .bind(course_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Review count and raw average rating (`0.0` without reviews).
    pub async fn stats(pool: &PgPool, course_id: DbId) -> Result<RatingStats, sqlx::Error> {
        sqlx::query_as::<_, RatingStats>(
            "SELECT COUNT(*) AS count, COALESCE(AVG(rating), 0)::FLOAT8 AS avg \
             FROM reviews WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(pool)
        .await
    }
}
