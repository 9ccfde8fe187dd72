//! ContentStructure: sections and lessons of a course.
//!
//! Every mutation requires the acting user to own the course. Order slots
//! are never auto-assigned: a taken `order_no` surfaces as `Conflict` from
//! the scope's unique constraint.

use academy_core::content::{
    check_publishable, validate_content_title, validate_duration_sec, validate_order_no,
    validate_video_url,
};
use academy_core::error::CoreError;
use academy_core::roles::ActorContext;
use academy_core::types::DbId;
use academy_db::models::lesson::{CreateLesson, Lesson, UpdateLesson};
use academy_db::models::section::{CreateSection, OutlineSection, Section, UpdateSection};
use academy_db::repositories::{CourseRepo, LessonRepo, SectionRepo};
use sqlx::PgPool;

use crate::courses::CourseService;
use crate::error::{CatalogError, CatalogResult};

pub struct ContentService;

impl ContentService {
    /// Add a section at an explicit order slot.
    pub async fn add_section(
        pool: &PgPool,
        actor: &ActorContext,
        input: &CreateSection,
    ) -> CatalogResult<Section> {
        CourseService::owned(pool, actor, input.course_id).await?;
        let input = CreateSection {
            title: validate_content_title(&input.title)?,
            ..input.clone()
        };
        validate_order_no(input.order_no)?;

        let section = SectionRepo::create(pool, &input)
            .await
            .map_err(|e| CatalogError::missing_reference(e, "Course", input.course_id))?;
        tracing::info!(
            course_id = section.course_id,
            section_id = section.id,
            order_no = section.order_no,
            "Section added",
        );
        Ok(section)
    }

    /// Rename or move a section to another order slot.
    pub async fn update_section(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
        input: &UpdateSection,
    ) -> CatalogResult<Section> {
        let section = Self::owned_section(pool, actor, id).await?;
        let title = match &input.title {
            Some(title) => Some(validate_content_title(title)?),
            None => None,
        };
        if let Some(order_no) = input.order_no {
            validate_order_no(order_no)?;
        }
        let input = UpdateSection {
            title,
            order_no: input.order_no,
        };

        let updated = SectionRepo::update(pool, section.id, &input)
            .await?
            .ok_or_else(|| section_not_found(id))?;
        tracing::info!(
            course_id = updated.course_id,
            section_id = id,
            order_no = updated.order_no,
            "Section updated",
        );
        Ok(updated)
    }

    /// Delete a section that no longer has lessons.
    pub async fn safe_delete_section(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
    ) -> CatalogResult<()> {
        let section = Self::owned_section(pool, actor, id).await?;
        let outcome = SectionRepo::safe_delete(pool, id).await?;
        tracing::info!(
            course_id = section.course_id,
            section_id = id,
            outcome = ?outcome,
            "Section delete",
        );
        outcome.into_result("Section", id)?;
        Ok(())
    }

    /// Add a lesson at an explicit order slot within a section.
    pub async fn add_lesson(
        pool: &PgPool,
        actor: &ActorContext,
        input: &CreateLesson,
    ) -> CatalogResult<Lesson> {
        let section = Self::owned_section(pool, actor, input.section_id).await?;
        let input = CreateLesson {
            title: validate_content_title(&input.title)?,
            video_url: validate_video_url(&input.video_url)?,
            ..input.clone()
        };
        validate_duration_sec(input.duration_sec)?;
        validate_order_no(input.order_no)?;

        let lesson = LessonRepo::create(pool, &input)
            .await
            .map_err(|e| CatalogError::missing_reference(e, "Section", input.section_id))?;
        tracing::info!(
            course_id = section.course_id,
            section_id = section.id,
            lesson_id = lesson.id,
            order_no = lesson.order_no,
            "Lesson added",
        );
        Ok(lesson)
    }

    /// Patch a lesson, including moving it to another order slot.
    pub async fn update_lesson(
        pool: &PgPool,
        actor: &ActorContext,
        id: DbId,
        input: &UpdateLesson,
    ) -> CatalogResult<Lesson> {
        let course_id = Self::owned_lesson(pool, actor, id).await?;
        let title = match &input.title {
            Some(title) => Some(validate_content_title(title)?),
            None => None,
        };
        let video_url = match &input.video_url {
            Some(url) => Some(validate_video_url(url)?),
            None => None,
        };
        validate_duration_sec(input.duration_sec)?;
        if let Some(order_no) = input.order_no {
            validate_order_no(order_no)?;
        }
        let input = UpdateLesson {
            title,
            video_url,
            ..input.clone()
        };

        let lesson = LessonRepo::update(pool, id, &input)
            .await?
            .ok_or_else(|| lesson_not_found(id))?;
        tracing::info!(course_id, lesson_id = id, order_no = lesson.order_no, "Lesson updated");
        Ok(lesson)
    }

    /// Delete a lesson. Progress rows on it go with it.
    pub async fn delete_lesson(pool: &PgPool, actor: &ActorContext, id: DbId) -> CatalogResult<()> {
        let course_id = Self::owned_lesson(pool, actor, id).await?;
        if !LessonRepo::delete(pool, id).await? {
            return Err(lesson_not_found(id).into());
        }
        tracing::info!(course_id, lesson_id = id, "Lesson deleted");
        Ok(())
    }

    /// Sections by `(order_no, id)` with their lessons by `(order_no, id)`.
    ///
    /// With `preview_only` only preview lessons are listed; sections are
    /// kept even when that leaves them empty.
    pub async fn outline(
        pool: &PgPool,
        course_id: DbId,
        preview_only: bool,
    ) -> CatalogResult<Vec<OutlineSection>> {
        Ok(SectionRepo::outline(pool, course_id, preview_only).await?)
    }

    /// Whether the course has at least one section and one lesson.
    pub async fn can_publish(pool: &PgPool, course_id: DbId) -> CatalogResult<bool> {
        let mut conn = pool.acquire().await?;
        let (has_section, has_lesson) = CourseRepo::content_presence(&mut conn, course_id).await?;
        Ok(check_publishable(has_section, has_lesson).is_ok())
    }

    async fn owned_section(pool: &PgPool, actor: &ActorContext, id: DbId) -> CatalogResult<Section> {
        let section = SectionRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| section_not_found(id))?;
        CourseService::owned(pool, actor, section.course_id).await?;
        Ok(section)
    }

    /// Returns the id of the course the lesson belongs to.
    async fn owned_lesson(pool: &PgPool, actor: &ActorContext, id: DbId) -> CatalogResult<DbId> {
        let scope = LessonRepo::find_scope(pool, id)
            .await?
            .ok_or_else(|| lesson_not_found(id))?;
        CourseService::owned(pool, actor, scope.course_id).await?;
        Ok(scope.course_id)
    }
}

fn section_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Section",
        id,
    }
}

fn lesson_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Lesson",
        id,
    }
}
