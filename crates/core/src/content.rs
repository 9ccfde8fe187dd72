//! Section / lesson validation and publish readiness.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum length of a section or lesson title, in characters.
pub const MAX_CONTENT_TITLE_LEN: usize = 200;

/// Prefix of locally uploaded videos.
pub const LOCAL_UPLOAD_PREFIX: &str = "/uploads/";

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)[\w-]+")
        .expect("valid youtube regex")
});

/// Validate and trim a section or lesson title.
pub fn validate_content_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("title", "title must not be empty"));
    }
    if trimmed.chars().count() > MAX_CONTENT_TITLE_LEN {
        return Err(CoreError::validation(
            "title",
            format!("title must be at most {MAX_CONTENT_TITLE_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Order numbers are 1-based slots; zero and negatives are rejected.
pub fn validate_order_no(order_no: i32) -> Result<(), CoreError> {
    if order_no <= 0 {
        return Err(CoreError::validation(
            "order_no",
            format!("order_no must be a positive integer, got {order_no}"),
        ));
    }
    Ok(())
}

/// A lesson duration, when known, is a non-negative number of seconds.
pub fn validate_duration_sec(duration_sec: Option<i32>) -> Result<(), CoreError> {
    match duration_sec {
        Some(d) if d < 0 => Err(CoreError::validation(
            "duration_sec",
            format!("duration_sec must be >= 0, got {d}"),
        )),
        _ => Ok(()),
    }
}

/// Validate and trim a lesson video URL.
///
/// Accepted: a local upload path (`/uploads/...`) or a YouTube watch / short link.
pub fn validate_video_url(url: &str) -> Result<String, CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation("video_url", "video URL is required"));
    }
    let is_local = trimmed.starts_with(LOCAL_UPLOAD_PREFIX) && trimmed.len() > LOCAL_UPLOAD_PREFIX.len();
    if !is_local && !YOUTUBE_URL.is_match(trimmed) {
        return Err(CoreError::validation(
            "video_url",
            "video URL must be an /uploads/ path or a YouTube link",
        ));
    }
    Ok(trimmed.to_string())
}

/// Check the publish requirement: at least one section, and at least one
/// lesson somewhere in that section set.
pub fn check_publishable(has_section: bool, has_lesson: bool) -> Result<(), CoreError> {
    if !has_section {
        return Err(CoreError::validation(
            "is_completed",
            "course needs at least one section before it can be completed",
        ));
    }
    if !has_lesson {
        return Err(CoreError::validation(
            "is_completed",
            "course sections need at least one lesson before it can be completed",
        ));
    }
    Ok(())
}
