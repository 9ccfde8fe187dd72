//! CategoryTree: the two-level category hierarchy.
//!
//! Reads are public; every mutation requires an admin actor. Placement
//! checks run inside the same transaction as the write, holding a row lock
//! on the prospective parent.

use academy_core::category::{
    group_two_level, resolve_slug, validate_category_name, validate_placement,
};
use academy_core::error::CoreError;
use academy_core::roles::ActorContext;
use academy_core::search::{clamp_limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT};
use academy_core::types::DbId;
use academy_db::models::category::{
    Category, CategoryNode, CategoryWithParent, CreateCategory, TopCategory, UpdateCategory,
};
use academy_db::repositories::CategoryRepo;
use sqlx::PgPool;

use crate::error::CatalogResult;

pub struct CategoryService;

impl CategoryService {
    /// Roots ordered by id, each with its children ordered by id.
    pub async fn build_tree(pool: &PgPool) -> CatalogResult<Vec<CategoryNode>> {
        let rows = CategoryRepo::list(pool).await?;
        let tree = group_two_level(rows, |c| c.id, |c| c.parent_id)
            .into_iter()
            .map(|(category, children)| CategoryNode { category, children })
            .collect();
        Ok(tree)
    }

    /// Flat admin listing with parent names and usage counts.
    pub async fn list_with_parent(pool: &PgPool) -> CatalogResult<Vec<CategoryWithParent>> {
        Ok(CategoryRepo::list_with_parent(pool).await?)
    }

    pub async fn get(pool: &PgPool, id: DbId) -> CatalogResult<Category> {
        let category = CategoryRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(category)
    }

    /// Categories with the most enrollments since the start of this week.
    pub async fn top_this_week(pool: &PgPool, limit: Option<i64>) -> CatalogResult<Vec<TopCategory>> {
        let limit = clamp_limit(limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT);
        Ok(CategoryRepo::top_this_week(pool, limit).await?)
    }

    /// Create a category, optionally under a root parent.
    pub async fn create(
        pool: &PgPool,
        actor: &ActorContext,
        input: &CreateCategory,
    ) -> CatalogResult<Category> {
        actor.require_admin()?;
        let name = validate_category_name(&input.name)?;
        let slug = resolve_slug(input.slug.as_deref(), &name)?;

        let mut tx = pool.begin().await?;
        if let Some(parent_id) = input.parent_id {
            let parent = CategoryRepo::lock_parent_facts(&mut tx, parent_id).await?;
            validate_placement(None, false, parent_id, parent.as_ref())?;
        }
        let category = CategoryRepo::create(&mut tx, &name, &slug, input.parent_id).await?;
        tx.commit().await?;

        tracing::info!(
            category_id = category.id,
            parent_id = ?category.parent_id,
            slug = %category.slug,
            user_id = actor.user_id,
            "Category created",
        );
        Ok(category)
    }

    /// Rename, re-slug or move a category.
    ///
    /// `make_root` detaches the category from its parent; otherwise a given
    /// `parent_id` moves it under that root.
    pub async fn update(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
        input: &UpdateCategory,
    ) -> CatalogResult<Category> {
        actor.require_admin()?;

        let mut tx = pool.begin().await?;
        let current = CategoryRepo::lock_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let name = match &input.name {
            Some(name) => validate_category_name(name)?,
            None => current.name.clone(),
        };
        let slug = match &input.slug {
            Some(slug) => resolve_slug(Some(slug.as_str()), &name)?,
            None => current.slug.clone(),
        };
        let parent_id = if input.make_root {
            None
        } else {
            input.parent_id.or(current.parent_id)
        };

        if let Some(parent_id) = parent_id {
            if current.parent_id != Some(parent_id) {
                let has_children = CategoryRepo::has_children(&mut tx, id).await?;
                let parent = if parent_id == id {
                    None
                } else {
                    CategoryRepo::lock_parent_facts(&mut tx, parent_id).await?
                };
                validate_placement(Some(id), has_children, parent_id, parent.as_ref())?;
            }
        }

        let category = CategoryRepo::update(&mut tx, id, &name, &slug, parent_id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tx.commit().await?;

        tracing::info!(
            category_id = id,
            parent_id = ?category.parent_id,
            user_id = actor.user_id,
            "Category updated",
        );
        Ok(category)
    }

    /// Delete a category that has neither children nor courses.
    ///
    /// Fails with `ReferentialIntegrity(HAS_CHILDREN | HAS_COURSES)` or
    /// `NotFound`; never cascades.
    pub async fn safe_delete(pool: &PgPool, actor: &ActorContext, id: DbId) -> CatalogResult<()> {
        actor.require_admin()?;
        let outcome = CategoryRepo::safe_delete(pool, id).await?;
        tracing::info!(category_id = id, outcome = ?outcome, user_id = actor.user_id, "Category delete");
        outcome.into_result("Category", id)?;
        Ok(())
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Category",
        id,
    }
}
