//! CourseCatalog: course authoring, moderation and admin listing.
//!
//! Ownership is resolved through `courses.instructor_id -> instructors.user_id`.
//! On mutating operations a missing course and a course owned by someone
//! else both surface as `Forbidden`; the distinction is only logged.

use academy_core::category::validate_course_category;
use academy_core::content::check_publishable;
use academy_core::course::{
    check_can_mark_completed, keyword_pattern, validate_course_title, validate_pricing,
};
use academy_core::error::CoreError;
use academy_core::pagination::paginate;
use academy_core::roles::ActorContext;
use academy_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use academy_core::types::DbId;
use academy_db::models::course::{
    AdminCourseFilter, AdminCourseRow, Course, CourseDetail, CourseOwner, CreateCourse,
    UpdateCourse,
};
use academy_db::repositories::{CategoryRepo, CourseRepo, EnrollmentRepo, InstructorRepo};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::CatalogResult;
use crate::search::Page;

/// One page of the admin listing with the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct AdminCourseListing {
    pub rows: Vec<AdminCourseRow>,
    pub total_count: i64,
}

pub struct CourseService;

impl CourseService {
    /// Create a draft course owned by the acting instructor.
    pub async fn create(
        pool: &PgPool,
        actor: &ActorContext,
        input: &CreateCourse,
    ) -> CatalogResult<Course> {
        actor.require_instructor()?;
        let instructor = InstructorRepo::find_by_user_id(pool, actor.user_id)
            .await?
            .ok_or_else(|| CoreError::Forbidden("instructor profile required".to_string()))?;

        let title = validate_course_title(&input.title)?;
        validate_pricing(input.price, input.promo_price)?;
        let input = CreateCourse {
            title,
            ..input.clone()
        };

        let mut tx = pool.begin().await?;
        ensure_leaf_category(&mut tx, input.cat_id).await?;
        let course = CourseRepo::create(&mut tx, instructor.id, &input).await?;
        tx.commit().await?;

        tracing::info!(
            course_id = course.id,
            cat_id = course.cat_id,
            instructor_id = instructor.id,
            user_id = actor.user_id,
            "Course created",
        );
        Ok(course)
    }

    /// Patch a course owned by the acting instructor.
    ///
    /// Pricing is validated against the merged row, so a lower `price` alone
    /// cannot leave an existing promo price above it.
    pub async fn update(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
        input: &UpdateCourse,
    ) -> CatalogResult<Course> {
        Self::owned(pool, actor, id).await?;

        let title = match &input.title {
            Some(title) => Some(validate_course_title(title)?),
            None => None,
        };
        let input = UpdateCourse {
            title,
            ..input.clone()
        };

        let mut tx = pool.begin().await?;
        let current = CourseRepo::lock_for_update(&mut tx, id)
            .await?
            .ok_or_else(forbidden)?;

        let price = input.price.unwrap_or(current.price);
        let promo_price = if input.clear_promo_price {
            None
        } else {
            input.promo_price.or(current.promo_price)
        };
        validate_pricing(price, promo_price)?;

        if let Some(cat_id) = input.cat_id {
            if cat_id != current.cat_id {
                ensure_leaf_category(&mut tx, cat_id).await?;
            }
        }

        let course = CourseRepo::update(&mut tx, id, &input)
            .await?
            .ok_or_else(forbidden)?;
        tx.commit().await?;

        tracing::info!(course_id = id, user_id = actor.user_id, "Course updated");
        Ok(course)
    }

    /// Soft-delete or restore a course. Admins moderate any course; the
    /// owning instructor may toggle their own.
    pub async fn set_removed(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
        removed: bool,
    ) -> CatalogResult<()> {
        let Some(owner) = CourseRepo::find_owner(pool, id).await? else {
            if actor.is_admin() {
                return Err(CoreError::NotFound {
                    entity: "Course",
                    id,
                }
                .into());
            }
            tracing::debug!(course_id = id, user_id = actor.user_id, "Course not found");
            return Err(forbidden().into());
        };
        actor.require_owner_or_admin(owner.owner_user_id)?;

        CourseRepo::set_removed(pool, id, removed).await?;
        tracing::info!(course_id = id, removed, user_id = actor.user_id, "Course removal toggled");
        Ok(())
    }

    /// Permanently delete a course with all of its content. Admin only.
    pub async fn purge(pool: &PgPool, actor: &ActorContext, id: DbId) -> CatalogResult<()> {
        actor.require_admin()?;
        if !CourseRepo::purge(pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "Course",
                id,
            }
            .into());
        }
        tracing::info!(course_id = id, user_id = actor.user_id, "Course purged");
        Ok(())
    }

    /// Flag a course as completed.
    ///
    /// Refused for removed courses, and re-checks on every call that the
    /// course has a section and a lesson.
    pub async fn mark_completed(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
    ) -> CatalogResult<Course> {
        Self::owned(pool, actor, id).await?;

        let mut tx = pool.begin().await?;
        let mut course = CourseRepo::lock_for_update(&mut tx, id)
            .await?
            .ok_or_else(forbidden)?;
        check_can_mark_completed(course.state())?;

        let (has_section, has_lesson) = CourseRepo::content_presence(&mut tx, id).await?;
        check_publishable(has_section, has_lesson)?;

        CourseRepo::mark_completed(&mut tx, id).await?;
        tx.commit().await?;
        course.is_completed = true;

        tracing::info!(course_id = id, user_id = actor.user_id, "Course marked completed");
        Ok(course)
    }

    /// Admin listing: rows at `offset` plus the total matching count.
    pub async fn list_admin(
        pool: &PgPool,
        actor: &ActorContext,
        filter: &AdminCourseFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> CatalogResult<AdminCourseListing> {
        actor.require_admin()?;
        let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = clamp_offset(offset);
        let pattern = keyword_pattern(filter.keyword.as_deref());

        let total_count = CourseRepo::count_admin(pool, filter, pattern.as_deref()).await?;
        let rows = CourseRepo::list_admin(pool, filter, pattern.as_deref(), limit, offset).await?;
        Ok(AdminCourseListing { rows, total_count })
    }

    /// One page of the acting instructor's own courses.
    pub async fn list_by_instructor(
        pool: &PgPool,
        actor: &ActorContext,
        page: i64,
        limit: Option<i64>,
    ) -> CatalogResult<Page<Course>> {
        actor.require_instructor()?;
        let Some(instructor) = InstructorRepo::find_by_user_id(pool, actor.user_id).await? else {
            return Ok(Page::empty(limit));
        };

        let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let total_count = CourseRepo::count_by_instructor(pool, instructor.id).await?;
        let pagination = paginate(page, total_count, limit);
        let rows =
            CourseRepo::list_by_instructor(pool, instructor.id, pagination.limit, pagination.offset)
                .await?;
        Ok(Page { rows, pagination })
    }

    /// Course detail with aggregates.
    ///
    /// A removed course is only visible to admins, its owner and enrolled
    /// learners; everyone else gets `NotFound`.
    pub async fn detail(
        pool: &PgPool,
        viewer: Option<&ActorContext>,
        id: DbId,
    ) -> CatalogResult<CourseDetail> {
        let not_found = || CoreError::NotFound {
            entity: "Course",
            id,
        };
        let detail = CourseRepo::find_detail(pool, id)
            .await?
            .ok_or_else(not_found)?;
        if !detail.is_removed {
            return Ok(detail);
        }

        let visible = match viewer {
            None => false,
            Some(actor) if actor.is_admin() || actor.user_id == detail.instructor_user_id => true,
            Some(actor) => EnrollmentRepo::is_enrolled(pool, actor.user_id, id).await?,
        };
        if !visible {
            return Err(not_found().into());
        }
        Ok(detail)
    }

    /// Count one page view of a visible course.
    pub async fn record_view(pool: &PgPool, id: DbId) -> CatalogResult<()> {
        if !CourseRepo::record_view(pool, id).await? {
            return Err(CoreError::NotFound {
                entity: "Course",
                id,
            }
            .into());
        }
        Ok(())
    }

    /// Resolve a course and require the actor to own it.
    pub(crate) async fn owned(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
    ) -> CatalogResult<CourseOwner> {
        let Some(owner) = CourseRepo::find_owner(pool, id).await? else {
            tracing::debug!(course_id = id, user_id = actor.user_id, "Course not found");
            return Err(forbidden().into());
        };
        if let Err(err) = actor.require_owner(owner.owner_user_id) {
            tracing::debug!(
                course_id = id,
                user_id = actor.user_id,
                owner_user_id = owner.owner_user_id,
                "Course owned by another user",
            );
            return Err(err.into());
        }
        Ok(owner)
    }
}

/// Lock the category in share mode and require it to exist and be a leaf.
async fn ensure_leaf_category(conn: &mut PgConnection, cat_id: DbId) -> CatalogResult<()> {
    let child_count = match CategoryRepo::lock_for_share(&mut *conn, cat_id).await? {
        Some(_) => Some(CategoryRepo::count_children(&mut *conn, cat_id).await?),
        None => None,
    };
    validate_course_category(cat_id, child_count)?;
    Ok(())
}

fn forbidden() -> CoreError {
    CoreError::Forbidden("only the owning instructor may modify this course".to_string())
}
