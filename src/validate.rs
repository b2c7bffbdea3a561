//! Pure validation for user-supplied fields
//!
//! Trimming happens before the emptiness and length checks. Limits are
//! injected rather than hard-coded, so the service can be reconfigured
//! without touching this module. Lengths are counted in characters.

use crate::config::Limits;
use crate::error::ApiError;

/// Username recorded when a client does not provide one.
pub const ANONYMOUS: &str = "Anonymous";

/// Validate a thread title: trimmed, non-empty, within the title limit.
pub fn validate_title(raw: &str, limits: &Limits) -> Result<String, ApiError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::validation("title", "required"));
    }
    if title.chars().count() > limits.thread_title {
        return Err(ApiError::validation(
            "title",
            format!("too long (max {})", limits.thread_title),
        ));
    }
    Ok(title.to_string())
}

/// Normalize a username: trimmed, defaulting to [`ANONYMOUS`] when absent
/// or blank, within the username limit.
pub fn validate_username(raw: Option<&str>, limits: &Limits) -> Result<String, ApiError> {
    let username = raw.map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Ok(ANONYMOUS.to_string());
    }
    if username.chars().count() > limits.username {
        return Err(ApiError::validation(
            "username",
            format!("too long (max {})", limits.username),
        ));
    }
    Ok(username.to_string())
}

/// Validate post content: trimmed, non-empty, within the content limit.
pub fn validate_content(raw: &str, limits: &Limits) -> Result<String, ApiError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ApiError::validation("content", "required"));
    }
    if content.chars().count() > limits.post_content {
        return Err(ApiError::validation(
            "content",
            format!("too long (max {})", limits.post_content),
        ));
    }
    Ok(content.to_string())
}
