//! Repositories for the `users` and `instructors` tables.

use academy_core::roles::ROLE_STUDENT;
use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, Instructor, User};

/// Column list for the `users` table.
const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

/// Column list for the `instructors` table.
const INSTRUCTOR_COLUMNS: &str = "id, user_id, bio, created_at, updated_at";

/// Provides the minimal user operations the catalog needs.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.role.as_deref().unwrap_or(ROLE_STUDENT))
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Provides instructor profile lookups.
pub struct InstructorRepo;

impl InstructorRepo {
    /// Create the instructor profile of a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        bio: Option<&str>,
    ) -> Result<Instructor, sqlx::Error> {
        let query = format!(
            "INSERT INTO instructors (user_id, bio) VALUES ($1, $2) \
             RETURNING {INSTRUCTOR_COLUMNS}"
        );
        sqlx::query_as::<_, Instructor>(&query)
            .bind(user_id)
            .bind(bio)
            .fetch_one(pool)
            .await
    }

    /// Find the instructor profile belonging to a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Instructor>, sqlx::Error> {
        let query = format!("SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE user_id = $1");
        sqlx::query_as::<_, Instructor>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
