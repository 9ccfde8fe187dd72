//! Section entity model, DTOs and the course outline read model.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub order_no: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a section to a course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSection {
    pub course_id: DbId,
    pub title: String,
    pub order_no: i32,
}

/// DTO for renaming or reordering a section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSection {
    pub title: Option<String>,
    pub order_no: Option<i32>,
}

/// A section with its (possibly filtered) lessons.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineSection {
    pub id: DbId,
    pub title: String,
    pub order_no: i32,
    pub lessons: Vec<OutlineLesson>,
}

/// A lesson as listed in a course outline.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineLesson {
    pub id: DbId,
    pub title: String,
    pub video_url: String,
    pub duration_sec: Option<i32>,
    pub is_preview: bool,
    pub order_no: i32,
}

/// Flat section/lesson join row; lesson columns are null for empty sections.
#[derive(Debug, Clone, FromRow)]
pub struct OutlineRow {
    pub section_id: DbId,
    pub section_title: String,
    pub section_order_no: i32,
    pub lesson_id: Option<DbId>,
    pub lesson_title: Option<String>,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    pub is_preview: Option<bool>,
    pub lesson_order_no: Option<i32>,
}
