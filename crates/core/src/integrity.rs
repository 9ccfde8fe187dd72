//! Safe-delete outcomes.
//!
//! Deletions that have referential dependents are refused, never cascaded.
//! Repositories report the outcome as a [`DeleteOutcome`]; callers turn it
//! into a `Result` with [`DeleteOutcome::into_result`].

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Why a safe delete was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteBlocker {
    /// Another category still has this one as its parent.
    HasChildren,
    /// At least one course is attached to the category.
    HasCourses,
    /// At least one lesson still belongs to the section.
    HasLesson,
}

impl DeleteBlocker {
    /// Stable reason code surfaced to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HasChildren => "HAS_CHILDREN",
            Self::HasCourses => "HAS_COURSES",
            Self::HasLesson => "HAS_LESSON",
        }
    }
}

impl std::fmt::Display for DeleteBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a safe-delete attempt as observed inside its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Blocked(DeleteBlocker),
    NotFound,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Map the outcome onto the error taxonomy.
    pub fn into_result(self, entity: &'static str, id: DbId) -> Result<(), CoreError> {
        match self {
            Self::Deleted => Ok(()),
            Self::Blocked(blocker) => Err(CoreError::ReferentialIntegrity(blocker)),
            Self::NotFound => Err(CoreError::NotFound { entity, id }),
        }
    }
}
