//! Catalog search constants and helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the repository layer and the operator CLI.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Full-text configuration
// ---------------------------------------------------------------------------

/// Text search configuration; must match the generated `courses.fts` column
/// (title weighted `A`, short description `B`, long description `C`).
pub const TS_CONFIG: &str = "english";

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of courses per page.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Maximum number of courses per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default length of discovery feeds (newest, bestsellers, ...).
pub const DEFAULT_FEED_LIMIT: i64 = 8;

/// Maximum length of discovery feeds.
pub const MAX_FEED_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Deterministic ranking criteria for learner-facing listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSort {
    /// Average review rating, highest first.
    #[default]
    Rating,
    /// Effective price (`coalesce(promo_price, price)`), cheapest first.
    Price,
    /// Creation time, newest first.
    Newest,
    /// Enrollment count, highest first.
    Bestseller,
}

impl CourseSort {
    /// Parse a user-supplied sort key. Unknown or missing values fall back to
    /// [`CourseSort::Rating`].
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("price") => Self::Price,
            Some("newest") => Self::Newest,
            Some("bestseller") => Self::Bestseller,
            _ => Self::Rating,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Price => "price",
            Self::Newest => "newest",
            Self::Bestseller => "bestseller",
        }
    }
}

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Split user input into terms safe for tsquery construction.
///
/// Every character that is not alphanumeric (or `_`) acts as a separator, so
/// tsquery operators such as `&`, `|`, `!`, `:` or parentheses can never
/// reach the query parser.
fn search_terms(query: &str) -> Vec<&str> {
    query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Build a "contains any term" PostgreSQL `tsquery` string.
///
/// Terms are joined with `|` (OR); ranking decides how well a row matches.
/// Returns `None` when the input yields no usable terms.
///
/// # Examples
///
/// ```
/// use academy_core::search::build_any_tsquery;
/// assert_eq!(build_any_tsquery("python django"), Some("python | django".to_string()));
/// assert_eq!(build_any_tsquery("node.js"), Some("node | js".to_string()));
/// assert_eq!(build_any_tsquery("  "), None);
/// ```
pub fn build_any_tsquery(query: &str) -> Option<String> {
    let terms = search_terms(query);
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" | "))
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- CourseSort ----------------------------------------------------------

    #[test]
    fn known_sorts_parse() {
        assert_eq!(CourseSort::parse_lenient(Some("price")), CourseSort::Price);
        assert_eq!(CourseSort::parse_lenient(Some("newest")), CourseSort::Newest);
        assert_eq!(
            CourseSort::parse_lenient(Some("bestseller")),
            CourseSort::Bestseller
        );
        assert_eq!(CourseSort::parse_lenient(Some("rating")), CourseSort::Rating);
    }

    #[test]
    fn sort_parse_ignores_case_and_padding() {
        assert_eq!(CourseSort::parse_lenient(Some(" PRICE ")), CourseSort::Price);
    }

    #[test]
    fn unknown_sort_falls_back_to_rating() {
        assert_eq!(CourseSort::parse_lenient(Some("popular")), CourseSort::Rating);
        assert_eq!(CourseSort::parse_lenient(None), CourseSort::Rating);
    }

    #[test]
    fn sort_as_str_round_trips() {
        for sort in [
            CourseSort::Rating,
            CourseSort::Price,
            CourseSort::Newest,
            CourseSort::Bestseller,
        ] {
            assert_eq!(CourseSort::parse_lenient(Some(sort.as_str())), sort);
        }
    }

    // -- build_any_tsquery ---------------------------------------------------

    #[test]
    fn tsquery_single_term() {
        assert_eq!(build_any_tsquery("python"), Some("python".to_string()));
    }

    #[test]
    fn tsquery_terms_joined_with_or() {
        assert_eq!(
            build_any_tsquery("python data science"),
            Some("python | data | science".to_string())
        );
    }

    #[test]
    fn tsquery_operators_are_separators() {
        assert_eq!(
            build_any_tsquery("rust & (go | !c):*"),
            Some("rust | go | c".to_string())
        );
    }

    #[test]
    fn tsquery_keeps_unicode_letters() {
        assert_eq!(build_any_tsquery("lập trình"), Some("lập | trình".to_string()));
    }

    #[test]
    fn tsquery_preserves_underscores() {
        assert_eq!(build_any_tsquery("snake_case"), Some("snake_case".to_string()));
    }

    #[test]
    fn tsquery_empty_returns_none() {
        assert_eq!(build_any_tsquery(""), None);
        assert_eq!(build_any_tsquery(" !!! "), None);
    }

    // -- clamp_limit / clamp_offset -----------------------------------------

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 12, 100), 12);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(500), 12, 100), 100);
        assert_eq!(clamp_limit(Some(0), 12, 100), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
