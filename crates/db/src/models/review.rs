//! Review entity model and DTOs.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for reviewing a course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub course_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
}

/// A review with the author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithAuthor {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// Review count and average rating for one course.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct RatingStats {
    pub count: i64,
    /// Average rating rounded to one decimal; `0.0` without reviews.
    pub avg: f64,
}
