//! Post records and post-specific rules.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

/// Longest accepted post body, in characters.
pub const MAX_POST_BODY_CHARS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Original,
    Reply,
    Repost,
}

impl PostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Original => "original",
            PostKind::Reply => "reply",
            PostKind::Repost => "repost",
        }
    }

    /// Inverse of [`as_str`](Self::as_str), for text-typed store columns.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "original" => Some(PostKind::Original),
            "reply" => Some(PostKind::Reply),
            "repost" => Some(PostKind::Repost),
            _ => None,
        }
    }

    /// Replies and reposts must name a parent post; originals must not.
    pub fn requires_parent(self) -> bool {
        !matches!(self, PostKind::Original)
    }
}

/// A post as persisted by the primary store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub kind: PostKind,
    /// Parent post for replies and reposts.
    pub parent_post_id: Option<String>,
    pub likes_count: i64,
    pub replies_count: i64,
    pub reposts_count: i64,
    pub is_deleted: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validate a post body for create/update.
pub fn validate_post_body(body: &str) -> Result<(), DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::validation("post body must not be blank"));
    }
    if body.chars().count() > MAX_POST_BODY_CHARS {
        return Err(DomainError::validation(format!(
            "post body exceeds {MAX_POST_BODY_CHARS} characters"
        )));
    }
    Ok(())
}

/// Check the kind/parent pairing for a new post.
pub fn validate_post_parentage(
    kind: PostKind,
    parent_post_id: Option<&str>,
) -> Result<(), DomainError> {
    match (kind.requires_parent(), parent_post_id) {
        (true, None) => Err(DomainError::validation(format!(
            "a {} post must reference a parent post",
            kind.as_str()
        ))),
        (false, Some(_)) => Err(DomainError::validation(
            "an original post must not reference a parent post",
        )),
        _ => Ok(()),
    }
}
