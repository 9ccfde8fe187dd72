//! Watchlist: courses a learner has saved for later.

use academy_core::error::CoreError;
use academy_core::roles::ActorContext;
use academy_core::types::DbId;
use academy_db::models::search::CourseCard;
use academy_db::repositories::{CourseRepo, WatchlistRepo};
use sqlx::PgPool;

use crate::error::{CatalogError, CatalogResult};

pub struct WatchlistService;

impl WatchlistService {
    /// Save a visible course. Idempotent; returns whether it was newly added.
    pub async fn add(pool: &PgPool, actor: &ActorContext, course_id: DbId) -> CatalogResult<bool> {
        let visible = CourseRepo::find_by_id(pool, course_id)
            .await?
            .is_some_and(|c| !c.is_removed);
        if !visible {
            return Err(CoreError::NotFound {
                entity: "Course",
                id: course_id,
            }
            .into());
        }
        let added = WatchlistRepo::add(pool, actor.user_id, course_id)
            .await
            .map_err(|e| CatalogError::missing_reference(e, "Course", course_id))?;
        if added {
            tracing::info!(user_id = actor.user_id, course_id, "Added to watchlist");
        }
        Ok(added)
    }

    /// Returns whether the course was on the list.
    pub async fn remove(pool: &PgPool, actor: &ActorContext, course_id: DbId) -> CatalogResult<bool> {
        let removed = WatchlistRepo::remove(pool, actor.user_id, course_id).await?;
        if removed {
            tracing::info!(user_id = actor.user_id, course_id, "Removed from watchlist");
        }
        Ok(removed)
    }

    pub async fn contains(pool: &PgPool, actor: &ActorContext, course_id: DbId) -> CatalogResult<bool> {
        Ok(WatchlistRepo::contains(pool, actor.user_id, course_id).await?)
    }

    pub async fn list(pool: &PgPool, actor: &ActorContext) -> CatalogResult<Vec<CourseCard>> {
        Ok(WatchlistRepo::list_for_user(pool, actor.user_id).await?)
    }
}
