//! Course entity model and DTOs.
//!
//! Aggregates (`students_count`, `rating_avg`, `rating_count`) are never
//! stored; read models derive them from `enrollments` and `reviews`.

use academy_core::course::CourseState;
use academy_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub cat_id: DbId,
    pub instructor_id: DbId,
    pub title: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub cover_url: Option<String>,
    pub price: Money,
    pub promo_price: Option<Money>,
    pub is_completed: bool,
    pub is_removed: bool,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    pub fn state(&self) -> CourseState {
        CourseState::from_flags(self.is_completed, self.is_removed)
    }
}

/// DTO for creating a course. The instructor comes from the acting user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub cat_id: DbId,
    pub title: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub cover_url: Option<String>,
    pub price: Money,
    pub promo_price: Option<Money>,
}

/// DTO for updating a course. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourse {
    pub cat_id: Option<DbId>,
    pub title: Option<String>,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub cover_url: Option<String>,
    pub price: Option<Money>,
    pub promo_price: Option<Money>,
    /// Drop the promotional price. Takes precedence over `promo_price`.
    #[serde(default)]
    pub clear_promo_price: bool,
}

/// Ownership facts used to authorize course mutations.
#[derive(Debug, Clone, FromRow)]
pub struct CourseOwner {
    pub course_id: DbId,
    /// The user behind `courses.instructor_id`.
    pub owner_user_id: DbId,
}

/// Admin listing row with category and instructor names joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminCourseRow {
    pub id: DbId,
    pub title: String,
    pub cat_id: DbId,
    pub category_name: String,
    pub instructor_id: DbId,
    pub instructor_name: String,
    pub price: Money,
    pub promo_price: Option<Money>,
    pub is_completed: bool,
    pub is_removed: bool,
    pub view_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Filters for the admin course listing. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCourseFilter {
    /// Case-insensitive title substring.
    pub keyword: Option<String>,
    pub category_id: Option<DbId>,
    pub instructor_id: Option<DbId>,
    /// Include soft-deleted courses. Defaults to `true` for moderation.
    pub include_removed: Option<bool>,
}

/// One course as shown on its detail page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseDetail {
    pub id: DbId,
    pub cat_id: DbId,
    pub category_name: String,
    pub instructor_id: DbId,
    pub instructor_user_id: DbId,
    pub instructor_name: String,
    pub instructor_bio: Option<String>,
    pub title: String,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub cover_url: Option<String>,
    pub price: Money,
    pub promo_price: Option<Money>,
    pub is_completed: bool,
    pub is_removed: bool,
    pub view_count: i64,
    pub rating_avg: f64,
    pub rating_count: i64,
    pub students_count: i64,
    pub lesson_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
