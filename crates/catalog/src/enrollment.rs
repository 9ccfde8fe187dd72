//! EnrollmentProgress: enrollment membership and lesson completion.

use academy_core::error::CoreError;
use academy_core::progress::{progress_percent, validate_watched_sec};
use academy_core::roles::ActorContext;
use academy_core::types::DbId;
use academy_db::models::enrollment::{MyCourseProgress, Progress, RecordProgress};
use academy_db::repositories::{CourseRepo, EnrollmentRepo, LessonRepo, ProgressRepo};
use sqlx::PgPool;

use crate::error::{CatalogError, CatalogResult};

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enroll the actor in a course.
    ///
    /// Re-enrolling is a successful no-op; the return value tells whether a
    /// new enrollment was created. Removed courses take no new enrollments.
    pub async fn enroll(pool: &PgPool, actor: &ActorContext, course_id: DbId) -> CatalogResult<bool> {
        let course = CourseRepo::find_by_id(pool, course_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Course",
                id: course_id,
            })?;
        if course.is_removed {
            if EnrollmentRepo::is_enrolled(pool, actor.user_id, course_id).await? {
                return Ok(false);
            }
            return Err(CoreError::validation(
                "course_id",
                "this course is no longer available for enrollment",
            )
            .into());
        }

        let created = EnrollmentRepo::enroll(pool, actor.user_id, course_id)
            .await
            .map_err(|e| CatalogError::missing_reference(e, "Course", course_id))?;
        if created {
            tracing::info!(user_id = actor.user_id, course_id, "Enrolled");
        }
        Ok(created)
    }

    pub async fn is_enrolled(pool: &PgPool, user_id: DbId, course_id: DbId) -> CatalogResult<bool> {
        Ok(EnrollmentRepo::is_enrolled(pool, user_id, course_id).await?)
    }

    /// Record playback progress on a lesson; later writes overwrite.
    ///
    /// The actor must be enrolled in the lesson's course.
    pub async fn record_progress(
        pool: &PgPool,
        actor: &ActorContext,
        input: &RecordProgress,
    ) -> CatalogResult<Progress> {
        validate_watched_sec(input.watched_sec)?;
        let scope = LessonRepo::find_scope(pool, input.lesson_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lesson",
                id: input.lesson_id,
            })?;
        if !EnrollmentRepo::is_enrolled(pool, actor.user_id, scope.course_id).await? {
            return Err(
                CoreError::Forbidden("enrollment in this course is required".to_string()).into(),
            );
        }

        let progress = ProgressRepo::upsert(pool, actor.user_id, input)
            .await
            .map_err(|e| CatalogError::missing_reference(e, "Lesson", input.lesson_id))?;
        tracing::debug!(
            user_id = actor.user_id,
            lesson_id = input.lesson_id,
            watched_sec = progress.watched_sec,
            is_done = progress.is_done,
            "Progress recorded",
        );
        Ok(progress)
    }

    /// Percentage of the course's lessons the user has completed.
    pub async fn course_progress_percent(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> CatalogResult<i32> {
        let counts = ProgressRepo::course_counts(pool, user_id, course_id).await?;
        Ok(progress_percent(counts.done_lessons, counts.total_lessons))
    }

    /// Every enrolled course of the user with its completion percentage.
    pub async fn my_courses_with_progress(
        pool: &PgPool,
        user_id: DbId,
    ) -> CatalogResult<Vec<MyCourseProgress>> {
        let rows = EnrollmentRepo::list_for_user_with_counts(pool, user_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| MyCourseProgress {
                progress_percent: progress_percent(row.done_lessons, row.total_lessons),
                course_id: row.course_id,
                title: row.title,
                cover_url: row.cover_url,
                is_removed: row.is_removed,
                instructor_name: row.instructor_name,
                purchased_at: row.purchased_at,
            })
            .collect())
    }
}
