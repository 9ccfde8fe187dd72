//! Learner progress and review rules.

use crate::error::CoreError;

/// Lowest allowed review rating.
pub const MIN_RATING: i16 = 1;

/// Highest allowed review rating.
pub const MAX_RATING: i16 = 5;

/// Maximum length of a review comment, in characters.
pub const MAX_COMMENT_LEN: usize = 2000;

/// Percentage of completed lessons, rounded half away from zero.
///
/// A course with no lessons is 0% complete. The result is clamped to
/// `0..=100` so stale progress rows can never push it past 100.
///
/// # Examples
///
/// ```
/// use academy_core::progress::progress_percent;
///
/// assert_eq!(progress_percent(1, 3), 33);
/// assert_eq!(progress_percent(2, 3), 67);
/// assert_eq!(progress_percent(0, 0), 0);
/// ```
pub fn progress_percent(done: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    let done = done.clamp(0, total);
    // Integer form of round(100 * done / total) for non-negative operands.
    ((200 * done + total) / (2 * total)) as i32
}

/// Watched seconds are a non-negative offset into the lesson.
///
/// Monotonicity and the relation to `is_done` are deliberately not checked.
pub fn validate_watched_sec(watched_sec: i32) -> Result<(), CoreError> {
    if watched_sec < 0 {
        return Err(CoreError::validation(
            "watched_sec",
            format!("watched_sec must be >= 0, got {watched_sec}"),
        ));
    }
    Ok(())
}

/// Validate a review rating.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::validation(
            "rating",
            format!("rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"),
        ));
    }
    Ok(())
}

/// Trim a review comment; blank comments become `None`.
pub fn normalize_comment(comment: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(text) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(CoreError::validation(
            "comment",
            format!("comment must be at most {MAX_COMMENT_LEN} characters"),
        ));
    }
    Ok(Some(text.to_string()))
}

/// Round an average rating to one decimal place for display.
pub fn round_rating(avg: f64) -> f64 {
    (avg * 10.0).round() / 10.0
}
