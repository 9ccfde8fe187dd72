//! Repository for the `watchlist` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use super::search_repo::CARD_SELECT;
use crate::models::search::CourseCard;

/// Provides the idempotent user/course favourites relation.
pub struct WatchlistRepo;

impl WatchlistRepo {
    /// Add a course. Returns `false` if it was already on the list.
    pub async fn add(pool: &PgPool, user_id: DbId, course_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO watchlist (user_id, course_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, course_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a course. Returns `true` if it was on the list.
    pub async fn remove(pool: &PgPool, user_id: DbId, course_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a course is on the user's list.
    pub async fn contains(pool: &PgPool, user_id: DbId, course_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM watchlist WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// The user's listed courses that are still visible, most recently added first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<CourseCard>, sqlx::Error> {
        let query = format!(
            "{CARD_SELECT} \
             JOIN watchlist w ON w.course_id = c.id \
             WHERE w.user_id = $1 AND c.is_removed = FALSE \
             ORDER BY w.created_at DESC, c.id ASC"
        );
        sqlx::query_as::<_, CourseCard>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
