//! Course validation and lifecycle.
//!
//! Lifecycle: `Draft -> Completed` via mark-completed, and either state
//! toggles to `Removed` (soft delete) and back.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Money;

/// Maximum length of a course title, in characters.
pub const MAX_COURSE_TITLE_LEN: usize = 200;

/// Validate and trim a course title.
pub fn validate_course_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("title", "course title must not be empty"));
    }
    if trimmed.chars().count() > MAX_COURSE_TITLE_LEN {
        return Err(CoreError::validation(
            "title",
            format!("course title must be at most {MAX_COURSE_TITLE_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a price / promotional price pair.
///
/// `price >= 0`; a promo price, when present, lies in `0..=price`.
pub fn validate_pricing(price: Money, promo_price: Option<Money>) -> Result<(), CoreError> {
    if price < 0 {
        return Err(CoreError::validation(
            "price",
            format!("price must be >= 0, got {price}"),
        ));
    }
    if let Some(promo) = promo_price {
        if promo < 0 {
            return Err(CoreError::validation(
                "promo_price",
                format!("promo_price must be >= 0, got {promo}"),
            ));
        }
        if promo > price {
            return Err(CoreError::validation(
                "promo_price",
                format!("promo_price ({promo}) must not exceed price ({price})"),
            ));
        }
    }
    Ok(())
}

/// Where a course sits in its lifecycle, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    Draft,
    Completed,
    Removed,
}

impl CourseState {
    pub fn from_flags(is_completed: bool, is_removed: bool) -> Self {
        match (is_completed, is_removed) {
            (_, true) => Self::Removed,
            (true, false) => Self::Completed,
            (false, false) => Self::Draft,
        }
    }
}

/// Refuse mark-completed on a removed course.
///
/// The publish requirement itself is checked separately on every call via
/// [`crate::content::check_publishable`].
pub fn check_can_mark_completed(state: CourseState) -> Result<(), CoreError> {
    if state == CourseState::Removed {
        return Err(CoreError::validation(
            "is_completed",
            "a removed course must be restored before it can be completed",
        ));
    }
    Ok(())
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build an `ILIKE` substring pattern from a keyword, or `None` when blank.
pub fn keyword_pattern(keyword: Option<&str>) -> Option<String> {
    keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| format!("%{}%", escape_like(k)))
}
