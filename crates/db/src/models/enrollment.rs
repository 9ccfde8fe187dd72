//! Enrollment and lesson-progress models.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub user_id: DbId,
    pub course_id: DbId,
    pub purchased_at: Timestamp,
}

/// A row from the `progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Progress {
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub watched_sec: i32,
    pub is_done: bool,
    pub updated_at: Timestamp,
}

/// DTO for recording playback progress on a lesson.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordProgress {
    pub lesson_id: DbId,
    pub watched_sec: i32,
    #[serde(default)]
    pub is_done: bool,
}

/// Completed and total lesson counts for one learner in one course.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct LessonCounts {
    pub done_lessons: i64,
    pub total_lessons: i64,
}

/// Grouped "my courses" row before the percentage is derived.
#[derive(Debug, Clone, FromRow)]
pub struct MyCourseRow {
    pub course_id: DbId,
    pub title: String,
    pub cover_url: Option<String>,
    pub is_removed: bool,
    pub instructor_name: String,
    pub purchased_at: Timestamp,
    pub done_lessons: i64,
    pub total_lessons: i64,
}

/// An enrolled course with the learner's completion percentage.
#[derive(Debug, Clone, Serialize)]
pub struct MyCourseProgress {
    pub course_id: DbId,
    pub title: String,
    pub cover_url: Option<String>,
    pub is_removed: bool,
    pub instructor_name: String,
    pub purchased_at: Timestamp,
    pub progress_percent: i32,
}
