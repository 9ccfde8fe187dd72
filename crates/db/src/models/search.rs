//! Learner-facing course card and search parameters.

use academy_core::search::CourseSort;
use academy_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A course as rendered in listings, feeds and search results.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseCard {
    pub id: DbId,
    pub title: String,
    pub short_desc: Option<String>,
    pub cover_url: Option<String>,
    pub cat_id: DbId,
    pub category_name: String,
    pub instructor_name: String,
    pub price: Money,
    pub promo_price: Option<Money>,
    pub is_completed: bool,
    pub view_count: i64,
    pub rating_avg: f64,
    pub rating_count: i64,
    pub students_count: i64,
    pub created_at: Timestamp,
}

/// One page request for a ranked listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub sort: CourseSort,
    pub limit: i64,
    pub offset: i64,
}
