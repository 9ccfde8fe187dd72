//! Lesson entity model and DTOs.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub section_id: DbId,
    pub title: String,
    pub video_url: String,
    pub duration_sec: Option<i32>,
    pub is_preview: bool,
    pub order_no: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a lesson to a section.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLesson {
    pub section_id: DbId,
    pub title: String,
    pub video_url: String,
    pub duration_sec: Option<i32>,
    #[serde(default)]
    pub is_preview: bool,
    pub order_no: i32,
}

/// DTO for patching a lesson. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLesson {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    pub is_preview: Option<bool>,
    pub order_no: Option<i32>,
}

/// Where a lesson sits: its section and that section's course.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LessonScope {
    pub lesson_id: DbId,
    pub section_id: DbId,
    pub course_id: DbId,
}
