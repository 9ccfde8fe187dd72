//! Integration tests for catalog search and discovery feeds.

mod common;

use academy_catalog::{CourseService, EnrollmentService, ReviewService, SearchService};
use academy_core::roles::ActorContext;
use academy_core::search::CourseSort;
use academy_core::types::DbId;
use academy_db::models::course::{Course, CreateCourse};
use academy_db::models::review::CreateReview;
use common::{admin, category, course, instructor, new_course, student};
use sqlx::PgPool;

async fn priced(
    pool: &PgPool,
    owner: &ActorContext,
    cat_id: DbId,
    title: &str,
    price: i64,
    promo_price: Option<i64>,
) -> Course {
    let input = CreateCourse {
        promo_price,
        ..new_course(cat_id, title, price)
    };
    CourseService::create(pool, owner, &input).await.unwrap()
}

/// Enroll a fresh learner and leave one review.
async fn rate(pool: &PgPool, email: &str, course_id: DbId, rating: i16) {
    let learner = student(pool, email).await;
    EnrollmentService::enroll(pool, &learner, course_id)
        .await
        .unwrap();
    let review = CreateReview {
        course_id,
        rating,
        comment: None,
    };
    ReviewService::add_review(pool, &learner, &review)
        .await
        .unwrap();
}

fn ids<T>(rows: &[T], id_of: impl Fn(&T) -> DbId) -> Vec<DbId> {
    rows.iter().map(id_of).collect()
}

// ---------------------------------------------------------------------------
// Keyword search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_by_price_excludes_removed_and_unrelated(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;

    let basics = priced(&pool, &owner, cat.id, "Python Basics", 1000, Some(500)).await;
    let advanced = priced(&pool, &owner, cat.id, "Advanced Python", 800, None).await;
    let data = priced(&pool, &owner, cat.id, "Python for Data", 2000, Some(300)).await;
    let hidden = priced(&pool, &owner, cat.id, "Python Archive", 100, None).await;
    priced(&pool, &owner, cat.id, "Java Basics", 50, None).await;
    CourseService::set_removed(&pool, &admin, hidden.id, true)
        .await
        .unwrap();

    let result = SearchService::search(&pool, "python", CourseSort::Price, None, None)
        .await
        .unwrap();
    assert_eq!(result.total_count, 3);
    assert_eq!(
        ids(&result.rows, |c| c.id),
        vec![data.id, basics.id, advanced.id]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_any_term(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    course(&pool, &owner, cat.id, "Python Basics").await;
    course(&pool, &owner, cat.id, "Rust Basics").await;
    course(&pool, &owner, cat.id, "Cooking").await;

    let result = SearchService::search(&pool, "python & rust", CourseSort::Newest, None, None)
        .await
        .unwrap();
    assert_eq!(result.total_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_by_rating_and_newest(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    let low = course(&pool, &owner, cat.id, "Python Basics").await;
    let high = course(&pool, &owner, cat.id, "Python Web").await;
    let mid = course(&pool, &owner, cat.id, "Python Data").await;
    rate(&pool, "a@example.com", low.id, 2).await;
    rate(&pool, "b@example.com", high.id, 5).await;
    rate(&pool, "c@example.com", mid.id, 4).await;

    let by_rating = SearchService::search(&pool, "python", CourseSort::Rating, None, None)
        .await
        .unwrap();
    assert_eq!(
        ids(&by_rating.rows, |c| c.id),
        vec![high.id, mid.id, low.id]
    );
    assert_eq!(by_rating.rows[0].rating_avg, 5.0);
    assert_eq!(by_rating.rows[0].rating_count, 1);

    let by_newest = SearchService::search(&pool, "python", CourseSort::Newest, None, None)
        .await
        .unwrap();
    assert_eq!(
        ids(&by_newest.rows, |c| c.id),
        vec![mid.id, high.id, low.id]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_ties_break_on_rank_then_id(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;

    // Same effective price everywhere; only the matched field differs.
    let input = CreateCourse {
        short_desc: Some("Scripting with python".to_string()),
        ..new_course(cat.id, "Automation", 0)
    };
    let in_description = CourseService::create(&pool, &owner, &input).await.unwrap();
    let first_title = course(&pool, &owner, cat.id, "Python Basics").await;
    let second_title = course(&pool, &owner, cat.id, "Python Basics").await;

    let result = SearchService::search(&pool, "python", CourseSort::Price, None, None)
        .await
        .unwrap();
    assert_eq!(
        ids(&result.rows, |c| c.id),
        vec![first_title.id, second_title.id, in_description.id]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_keyword_matches_nothing(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    course(&pool, &owner, cat.id, "Python Basics").await;

    let result = SearchService::search(&pool, "  !! ", CourseSort::Rating, None, None)
        .await
        .unwrap();
    assert_eq!(result.total_count, 0);
    assert!(result.rows.is_empty());

    let page = SearchService::search_page(&pool, "", CourseSort::Rating, 3, None)
        .await
        .unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.total_pages, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_page_clamps_out_of_range_page(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let cat = category(&pool, &admin, "Programming", None).await;
    for (title, price) in [("Python A", 100), ("Python B", 200), ("Python C", 300)] {
        priced(&pool, &owner, cat.id, title, price, None).await;
    }

    let page = SearchService::search_page(&pool, "python", CourseSort::Price, 99, Some(2))
        .await
        .unwrap();
    assert_eq!(page.pagination.page, 2);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.pagination.total_count, 3);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].title, "Python C");
}

// ---------------------------------------------------------------------------
// Category listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_root_category_lists_children_courses(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let programming = category(&pool, &admin, "Programming", None).await;
    let web = category(&pool, &admin, "Web Development", Some(programming.id)).await;
    let mobile = category(&pool, &admin, "Mobile", Some(programming.id)).await;
    let design = category(&pool, &admin, "Design", None).await;
    let cheap = priced(&pool, &owner, web.id, "HTML", 100, None).await;
    let dear = priced(&pool, &owner, mobile.id, "Swift", 900, None).await;
    priced(&pool, &owner, design.id, "Figma", 10, None).await;

    let page = SearchService::list_by_category(&pool, programming.id, CourseSort::Price, 1, None)
        .await
        .unwrap();
    assert_eq!(page.pagination.total_count, 2);
    assert_eq!(ids(&page.rows, |c| c.id), vec![cheap.id, dear.id]);

    let page = SearchService::list_by_category(&pool, web.id, CourseSort::Price, 1, None)
        .await
        .unwrap();
    assert_eq!(ids(&page.rows, |c| c.id), vec![cheap.id]);
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_feeds(pool: PgPool) {
    let admin = admin(&pool).await;
    let owner = instructor(&pool, "ins@example.com").await;
    let learner = student(&pool, "learner@example.com").await;
    let web = category(&pool, &admin, "Web Development", None).await;
    let design = category(&pool, &admin, "Design", None).await;
    let html = course(&pool, &owner, web.id, "HTML").await;
    let css = course(&pool, &owner, web.id, "CSS").await;
    let figma = course(&pool, &owner, design.id, "Figma").await;

    EnrollmentService::enroll(&pool, &learner, css.id).await.unwrap();
    for _ in 0..3 {
        CourseService::record_view(&pool, figma.id).await.unwrap();
    }

    let newest = SearchService::newest(&pool, Some(1)).await.unwrap();
    assert_eq!(ids(&newest, |c| c.id), vec![figma.id]);

    let viewed = SearchService::most_viewed(&pool, Some(1)).await.unwrap();
    assert_eq!(viewed[0].id, figma.id);
    assert_eq!(viewed[0].view_count, 3);

    let best = SearchService::bestsellers(&pool, Some(1)).await.unwrap();
    assert_eq!(best[0].id, css.id);
    assert_eq!(best[0].students_count, 1);

    let related = SearchService::related(&pool, html.id, None).await.unwrap();
    assert_eq!(ids(&related, |c| c.id), vec![css.id]);
}
