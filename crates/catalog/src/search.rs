//! CatalogSearch: full-text search, category listings and discovery feeds.
//!
//! Paged operations count first, clamp the requested page against that
//! count, and fetch with the offset derived from the clamped page.

use academy_core::pagination::{paginate, Pagination};
use academy_core::search::{
    build_any_tsquery, clamp_limit, clamp_offset, CourseSort, DEFAULT_FEED_LIMIT,
    DEFAULT_PAGE_SIZE, MAX_FEED_LIMIT, MAX_PAGE_SIZE,
};
use academy_core::types::DbId;
use academy_db::models::search::{CourseCard, ListParams};
use academy_db::repositories::SearchRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::CatalogResult;

/// One page of a listing with its navigation state.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// A first page with no rows.
    pub fn empty(limit: Option<i64>) -> Self {
        Self {
            rows: Vec::new(),
            pagination: paginate(1, 0, clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)),
        }
    }
}

/// Search rows at an explicit offset with the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub rows: Vec<CourseCard>,
    pub total_count: i64,
}

pub struct SearchService;

impl SearchService {
    /// Courses matching any term of `keyword`, ranked by `sort`, then text
    /// rank, then id. A keyword without usable terms matches nothing.
    pub async fn search(
        pool: &PgPool,
        keyword: &str,
        sort: CourseSort,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> CatalogResult<SearchResult> {
        let Some(tsquery) = build_any_tsquery(keyword) else {
            return Ok(SearchResult {
                rows: Vec::new(),
                total_count: 0,
            });
        };
        let params = ListParams {
            sort,
            limit: clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            offset: clamp_offset(offset),
        };
        let total_count = SearchRepo::count_matches(pool, &tsquery).await?;
        let rows = SearchRepo::search(pool, &tsquery, &params).await?;
        Ok(SearchResult { rows, total_count })
    }

    /// Page-number variant of [`SearchService::search`].
    pub async fn search_page(
        pool: &PgPool,
        keyword: &str,
        sort: CourseSort,
        page: i64,
        limit: Option<i64>,
    ) -> CatalogResult<Page<CourseCard>> {
        let Some(tsquery) = build_any_tsquery(keyword) else {
            return Ok(Page::empty(limit));
        };
        let total_count = SearchRepo::count_matches(pool, &tsquery).await?;
        let pagination = paginate(
            page,
            total_count,
            clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        );
        let params = ListParams {
            sort,
            limit: pagination.limit,
            offset: pagination.offset,
        };
        let rows = SearchRepo::search(pool, &tsquery, &params).await?;
        tracing::debug!(
            keyword,
            sort = sort.as_str(),
            page = pagination.page,
            total_count,
            "Catalog search",
        );
        Ok(Page { rows, pagination })
    }

    /// Visible courses of a category; a root category lists the courses of
    /// all its children.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
        sort: CourseSort,
        page: i64,
        limit: Option<i64>,
    ) -> CatalogResult<Page<CourseCard>> {
        let total_count = SearchRepo::count_by_category(pool, category_id).await?;
        let pagination = paginate(
            page,
            total_count,
            clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        );
        let params = ListParams {
            sort,
            limit: pagination.limit,
            offset: pagination.offset,
        };
        let rows = SearchRepo::list_by_category(pool, category_id, &params).await?;
        Ok(Page { rows, pagination })
    }

    pub async fn newest(pool: &PgPool, limit: Option<i64>) -> CatalogResult<Vec<CourseCard>> {
        Ok(SearchRepo::newest(pool, feed_limit(limit)).await?)
    }

    pub async fn most_viewed(pool: &PgPool, limit: Option<i64>) -> CatalogResult<Vec<CourseCard>> {
        Ok(SearchRepo::most_viewed(pool, feed_limit(limit)).await?)
    }

    pub async fn bestsellers(pool: &PgPool, limit: Option<i64>) -> CatalogResult<Vec<CourseCard>> {
        Ok(SearchRepo::bestsellers(pool, feed_limit(limit)).await?)
    }

    /// Other courses in the same category as `course_id`.
    pub async fn related(
        pool: &PgPool,
        course_id: DbId,
        limit: Option<i64>,
    ) -> CatalogResult<Vec<CourseCard>> {
        Ok(SearchRepo::related(pool, course_id, feed_limit(limit)).await?)
    }
}

fn feed_limit(limit: Option<i64>) -> i64 {
    clamp_limit(limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT)
}
