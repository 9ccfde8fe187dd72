//! Integration tests for course authoring, moderation and listings.

mod common;

use academy_catalog::{CatalogError, ContentService, CourseService, EnrollmentService};
use academy_core::error::CoreError;
use academy_db::models::course::{AdminCourseFilter, CreateCourse, UpdateCourse};
use assert_matches::assert_matches;
use common::{admin, category, course, instructor, lesson, new_course, section, student};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create / update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_requires_leaf_category(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let root = category(&pool, &admin, "Programming", None).await;
    let leaf = category(&pool, &admin, "Web Development", Some(root.id)).await;

    let err = CourseService::create(&pool, &owner, &new_course(root.id, "Rust", 0))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CatalogError::Core(CoreError::Validation { field: "cat_id", .. })
    );

    let err = CourseService::create(&pool, &owner, &new_course(424_242, "Rust", 0))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CatalogError::Core(CoreError::Validation { field: "cat_id", .. })
    );

    let created = CourseService::create(&pool, &owner, &new_course(leaf.id, "  Rust  ", 0))
        .await
        .unwrap();
    assert_eq!(created.title, "Rust");
    assert!(!created.is_completed);
    assert!(!created.is_removed);
    assert_eq!(created.view_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_requires_instructor_profile(pool: PgPool) {
    let admin = admin(&pool).await;
    let learner = student(&pool, "learner@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;

    let err = CourseService::create(&pool, &learner, &new_course(cat.id, "Rust", 0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promo_price_bounded_by_price(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;

    let input = CreateCourse {
        promo_price: Some(1500),
        ..new_course(cat.id, "Rust", 1000)
    };
    let err = CourseService::create(&pool, &owner, &input).await.unwrap_err();
    assert_matches!(
        err,
        CatalogError::Core(CoreError::Validation {
            field: "promo_price",
            ..
        })
    );

    let input = CreateCourse {
        promo_price: Some(700),
        ..new_course(cat.id, "Rust", 1000)
    };
    let c = CourseService::create(&pool, &owner, &input).await.unwrap();

    // Lowering the price alone must not strand the existing promo above it.
    let err = CourseService::update(
        &pool,
        &owner,
        c.id,
        &UpdateCourse {
            price: Some(500),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        CatalogError::Core(CoreError::Validation {
            field: "promo_price",
            ..
        })
    );

    let updated = CourseService::update(
        &pool,
        &owner,
        c.id,
        &UpdateCourse {
            price: Some(500),
            clear_promo_price: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.price, 500);
    assert_eq!(updated.promo_price, None);
    assert_eq!(updated.title, "Rust");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_by_other_instructor_forbidden(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let other = instructor(&pool, "other@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let c = course(&pool, &owner, cat.id, "Rust").await;

    let patch = UpdateCourse {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    let err = CourseService::update(&pool, &other, c.id, &patch)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = CourseService::update(&pool, &owner, 999_999, &patch)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_course_to_leaf_only(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let programming = category(&pool, &admin, "Programming", None).await;
    let web = category(&pool, &admin, "Web Development", Some(programming.id)).await;
    let design = category(&pool, &admin, "Design", None).await;
    let c = course(&pool, &owner, web.id, "Rust").await;

    let err = CourseService::update(
        &pool,
        &owner,
        c.id,
        &UpdateCourse {
            cat_id: Some(programming.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let moved = CourseService::update(
        &pool,
        &owner,
        c.id,
        &UpdateCourse {
            cat_id: Some(design.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.cat_id, design.id);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_completed_requires_content(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let c = course(&pool, &owner, cat.id, "Rust").await;

    let err = CourseService::mark_completed(&pool, &owner, c.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let s = section(&pool, &owner, c.id, 1).await;
    let err = CourseService::mark_completed(&pool, &owner, c.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    lesson(&pool, &owner, s.id, 1).await;
    let completed = CourseService::mark_completed(&pool, &owner, c.id)
        .await
        .unwrap();
    assert!(completed.is_completed);

    // Idempotent while the content is still there.
    CourseService::mark_completed(&pool, &owner, c.id)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removed_course_cannot_be_completed(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let c = course(&pool, &owner, cat.id, "Rust").await;
    let s = section(&pool, &owner, c.id, 1).await;
    lesson(&pool, &owner, s.id, 1).await;

    CourseService::set_removed(&pool, &admin, c.id, true)
        .await
        .unwrap();
    let err = CourseService::mark_completed(&pool, &owner, c.id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CatalogError::Core(CoreError::Validation {
            field: "is_completed",
            ..
        })
    );

    CourseService::set_removed(&pool, &owner, c.id, false)
        .await
        .unwrap();
    assert!(ContentService::can_publish(&pool, c.id).await.unwrap());
    CourseService::mark_completed(&pool, &owner, c.id)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_removed_permissions(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let learner = student(&pool, "learner@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let c = course(&pool, &owner, cat.id, "Rust").await;

    let err = CourseService::set_removed(&pool, &learner, c.id, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = CourseService::set_removed(&pool, &admin, 777_777, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    let err = CourseService::purge(&pool, &owner, c.id).await.unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Listings and detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_listing_filters_and_counts(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let rust = course(&pool, &owner, cat.id, "Rust for Beginners").await;
    course(&pool, &owner, cat.id, "Advanced Rust").await;
    course(&pool, &owner, cat.id, "Go in Practice").await;
    CourseService::set_removed(&pool, &admin, rust.id, true)
        .await
        .unwrap();

    let filter = AdminCourseFilter {
        keyword: Some("rust".to_string()),
        ..Default::default()
    };
    let listing = CourseService::list_admin(&pool, &admin, &filter, Some(1), None)
        .await
        .unwrap();
    assert_eq!(listing.total_count, 2);
    assert_eq!(listing.rows.len(), 1);

    let filter = AdminCourseFilter {
        keyword: Some("rust".to_string()),
        include_removed: Some(false),
        ..Default::default()
    };
    let listing = CourseService::list_admin(&pool, &admin, &filter, None, None)
        .await
        .unwrap();
    assert_eq!(listing.total_count, 1);
    assert_eq!(listing.rows[0].title, "Advanced Rust");

    let err = CourseService::list_admin(&pool, &owner, &AdminCourseFilter::default(), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_instructor_listing_pages(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let other = instructor(&pool, "other@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    for title in ["A", "B", "C"] {
        course(&pool, &owner, cat.id, title).await;
    }
    course(&pool, &other, cat.id, "Not mine").await;

    let page = CourseService::list_by_instructor(&pool, &owner, 2, Some(2))
        .await
        .unwrap();
    assert_eq!(page.pagination.total_count, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.rows.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_removed_detail_visibility(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let enrolled = student(&pool, "enrolled@example.com").await;
    let stranger = student(&pool, "stranger@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let c = course(&pool, &owner, cat.id, "Rust").await;
    EnrollmentService::enroll(&pool, &enrolled, c.id)
        .await
        .unwrap();

    CourseService::record_view(&pool, c.id).await.unwrap();
    let detail = CourseService::detail(&pool, None, c.id).await.unwrap();
    assert_eq!(detail.view_count, 1);
    assert_eq!(detail.students_count, 1);
    assert_eq!(detail.category_name, "Programming");

    CourseService::set_removed(&pool, &admin, c.id, true)
        .await
        .unwrap();

    for viewer in [None, Some(&stranger)] {
        let err = CourseService::detail(&pool, viewer, c.id).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
    for viewer in [&admin, &owner, &enrolled] {
        assert!(CourseService::detail(&pool, Some(viewer), c.id).await.is_ok());
    }

    let err = CourseService::record_view(&pool, c.id).await.unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
