//! Roles and the acting-user context passed into every core operation.
//!
//! Role names must match the `ck_users_role` check in the users migration.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_STUDENT: &str = "student";

/// All valid role strings.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_INSTRUCTOR => Ok(Self::Instructor),
            ROLE_STUDENT => Ok(Self::Student),
            _ => Err(CoreError::validation(
                "role",
                format!("Invalid role '{s}'. Must be one of: {}", VALID_ROLES.join(", ")),
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Instructor => ROLE_INSTRUCTOR,
            Self::Student => ROLE_STUDENT,
        }
    }
}

/// The authenticated user performing an operation.
///
/// Built once by the request layer and passed by reference; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: DbId,
    pub role: Role,
}

impl ActorContext {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require the admin role.
    pub fn require_admin(&self) -> Result<(), CoreError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden("admin role required".to_string()))
        }
    }

    /// Require the instructor role.
    pub fn require_instructor(&self) -> Result<(), CoreError> {
        if self.role == Role::Instructor {
            Ok(())
        } else {
            Err(CoreError::Forbidden("instructor role required".to_string()))
        }
    }

    /// Require that the actor is the instructor user owning a course.
    ///
    /// `owner_user_id` is the user behind `courses.instructor_id`.
    pub fn require_owner(&self, owner_user_id: DbId) -> Result<(), CoreError> {
        if self.role == Role::Instructor && self.user_id == owner_user_id {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "only the owning instructor may modify this course".to_string(),
            ))
        }
    }

    /// Admins moderate every course; instructors only their own.
    pub fn require_owner_or_admin(&self, owner_user_id: DbId) -> Result<(), CoreError> {
        if self.is_admin() {
            return Ok(());
        }
        self.require_owner(owner_user_id)
    }
}
