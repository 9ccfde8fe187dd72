//! Repository for the `categories` table.

use academy_core::category::ParentFacts;
use academy_core::integrity::{DeleteBlocker, DeleteOutcome};
use academy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::category::{Category, CategoryWithParent, TopCategory};

/// Column list for the `categories` table.
const COLUMNS: &str = "id, name, slug, parent_id, created_at, updated_at";

/// Provides reads, checked writes and safe deletion for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List every category, roots first, each group by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             ORDER BY parent_id NULLS FIRST, id"
        );
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// List every category with its parent name and usage counts.
    ///
    /// Course counts include soft-deleted courses since they still block
    /// deletion.
    pub async fn list_with_parent(pool: &PgPool) -> Result<Vec<CategoryWithParent>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithParent>(
            "SELECT c.id, c.name, c.slug, c.parent_id, p.name AS parent_name, \
                    (SELECT COUNT(*) FROM courses co WHERE co.cat_id = c.id) AS course_count, \
                    (SELECT COUNT(*) FROM categories ch WHERE ch.parent_id = c.id) AS child_count \
             FROM categories c \
             LEFT JOIN categories p ON p.id = c.parent_id \
             ORDER BY COALESCE(c.parent_id, c.id), c.parent_id NULLS FIRST, c.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Lock a category row for update and return it.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock a category row in share mode.
    ///
    /// Held by course writes so a concurrent child insert (which locks the
    /// parent for update) cannot turn the category into a non-leaf meanwhile.
    pub async fn lock_for_share(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 FOR SHARE");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Lock a prospective parent and load the facts placement rules need.
    pub async fn lock_parent_facts(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<ParentFacts>, sqlx::Error> {
        let Some(parent) = Self::lock_for_update(&mut *conn, id).await? else {
            return Ok(None);
        };
        let has_courses = Self::has_courses(&mut *conn, id).await?;
        Ok(Some(ParentFacts {
            id: parent.id,
            parent_id: parent.parent_id,
            has_courses,
        }))
    }

    /// Number of direct children of a category.
    pub async fn count_children(conn: &mut PgConnection, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Whether any category names this one as parent.
    pub async fn has_children(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1)",
        )
        .bind(id)
        .fetch_one(conn)
        .await
    }

    /// Whether any course, removed or not, is attached to the category.
    pub async fn has_courses(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE cat_id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Insert a category. Inputs must already be validated and normalized.
    pub async fn create(
        conn: &mut PgConnection,
        name: &str,
        slug: &str,
        parent_id: Option<DbId>,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, parent_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(slug)
            .bind(parent_id)
            .fetch_one(conn)
            .await
    }

    /// Overwrite name, slug and parent of a category.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        name: &str,
        slug: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $2, slug = $3, parent_id = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .bind(slug)
            .bind(parent_id)
            .fetch_optional(conn)
            .await
    }

    /// Delete a category unless children or courses still reference it.
    ///
    /// The checks and the delete run in one transaction holding a row lock
    /// on the category, so a concurrent child or course insert either waits
    /// and then fails its foreign key, or commits first and blocks the delete.
    pub async fn safe_delete(pool: &PgPool, id: DbId) -> Result<DeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if Self::lock_for_update(&mut tx, id).await?.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }
        if Self::has_children(&mut tx, id).await? {
            return Ok(DeleteOutcome::Blocked(DeleteBlocker::HasChildren));
        }
        if Self::has_courses(&mut tx, id).await? {
            return Ok(DeleteOutcome::Blocked(DeleteBlocker::HasCourses));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Categories ranked by enrollments purchased since the start of the
    /// current ISO week.
    pub async fn top_this_week(pool: &PgPool, limit: i64) -> Result<Vec<TopCategory>, sqlx::Error> {
        sqlx::query_as::<_, TopCategory>(
            "SELECT cat.id, cat.name, cat.slug, COUNT(*) AS enroll_count \
             FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             JOIN categories cat ON cat.id = c.cat_id \
             WHERE e.purchased_at >= date_trunc('week', NOW()) \
             GROUP BY cat.id, cat.name, cat.slug \
             ORDER BY enroll_count DESC, cat.id ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
