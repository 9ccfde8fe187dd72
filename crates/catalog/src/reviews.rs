//! Course reviews: one per learner and course, enrollment required.

use academy_core::error::CoreError;
use academy_core::progress::{normalize_comment, round_rating, validate_rating};
use academy_core::roles::ActorContext;
use academy_core::search::{clamp_limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use academy_core::types::DbId;
use academy_db::models::review::{CreateReview, RatingStats, Review, ReviewWithAuthor};
use academy_db::repositories::{EnrollmentRepo, ReviewRepo};
use sqlx::PgPool;

use crate::error::{CatalogError, CatalogResult};

pub struct ReviewService;

impl ReviewService {
    /// Review a course the actor is enrolled in. A second review of the
    /// same course is a `Conflict`.
    pub async fn add_review(
        pool: &PgPool,
        actor: &ActorContext,
        input: &CreateReview,
    ) -> CatalogResult<Review> {
        validate_rating(input.rating)?;
        let comment = normalize_comment(input.comment.as_deref())?;
        if !EnrollmentRepo::is_enrolled(pool, actor.user_id, input.course_id).await? {
            return Err(CoreError::Forbidden(
                "only enrolled learners can review this course".to_string(),
            )
            .into());
        }

        let review = ReviewRepo::create(
            pool,
            actor.user_id,
            input.course_id,
            input.rating,
            comment.as_deref(),
        )
        .await
        .map_err(|e| CatalogError::missing_reference(e, "Course", input.course_id))?;
        tracing::info!(
            user_id = actor.user_id,
            course_id = input.course_id,
            rating = review.rating,
            "Review added",
        );
        Ok(review)
    }

    /// Newest reviews first.
    pub async fn reviews(
        pool: &PgPool,
        course_id: DbId,
        limit: Option<i64>,
    ) -> CatalogResult<Vec<ReviewWithAuthor>> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        Ok(ReviewRepo::list_by_course(pool, course_id, limit).await?)
    }

    /// Review count and average rating rounded to one decimal.
    pub async fn rating_stats(pool: &PgPool, course_id: DbId) -> CatalogResult<RatingStats> {
        let stats = ReviewRepo::stats(pool, course_id).await?;
        Ok(RatingStats {
            avg: round_rating(stats.avg),
            ..stats
        })
    }
}
