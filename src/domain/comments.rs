//! Comment records and comment-specific rules.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Longest accepted comment body, in characters.
pub const MAX_COMMENT_BODY_CHARS: usize = 2000;

/// A comment as persisted by the primary store.
///
/// `is_deleted` is the soft-delete tombstone: deleted comments stay in the
/// store so reply counters and moderation history survive, but every read
/// path filters them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    /// Present on replies; top-level comments carry `None`.
    pub parent_comment_id: Option<String>,
    pub body: String,
    pub likes_count: i64,
    pub replies_count: i64,
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validate a comment body for create/update.
pub fn validate_comment_body(body: &str) -> Result<(), DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::validation("comment body must not be blank"));
    }
    if body.chars().count() > MAX_COMMENT_BODY_CHARS {
        return Err(DomainError::validation(format!(
            "comment body exceeds {MAX_COMMENT_BODY_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_body() {
        assert!(validate_comment_body("   ").is_err());
        assert!(validate_comment_body("").is_err());
    }

    #[test]
    fn rejects_oversized_body() {
        let body = "x".repeat(MAX_COMMENT_BODY_CHARS + 1);
        assert!(validate_comment_body(&body).is_err());
    }

    #[test]
    fn accepts_reasonable_body() {
        assert!(validate_comment_body("great trip, saved for later").is_ok());
    }
}
