//! Category entity model and DTOs.
//!
//! Categories form a two-level tree: roots (`parent_id IS NULL`) and their
//! children. Courses attach to leaves only.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A root category with its children, as rendered in navigation menus.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
}

/// Admin table row: a category with its parent name and usage counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithParent {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<DbId>,
    pub parent_name: Option<String>,
    pub course_count: i64,
    pub child_count: i64,
}

/// A category ranked by enrollments in the current week.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub enroll_count: i64,
}

/// DTO for creating a category. The slug is derived from the name when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<DbId>,
}

/// DTO for updating a category. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<DbId>,
    /// Detach the category from its parent, making it a root.
    #[serde(default)]
    pub make_root: bool,
}
