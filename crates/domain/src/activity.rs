//! Activity events — the comments and likes produced by the load generator.
//!
//! Events are ephemeral: created, submitted, and forgotten. They carry the
//! denormalized user fields captured at startup so that every projection
//! written from one event agrees on them.

use crate::id::{CommentId, PostId, UserId};
use crate::time::Timestamp;
use crate::user::UserRef;

/// A new comment on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub profile_picture_url: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
}

impl Comment {
    /// Build a comment by `author` on `post_id` with a fresh identifier.
    #[must_use]
    pub fn new(
        post_id: PostId,
        author: &UserRef,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            comment_id: CommentId::new(),
            post_id,
            user_id: author.user_id,
            username: author.username.clone(),
            profile_picture_url: author.profile_picture_url.clone(),
            content: content.into(),
            created_at,
        }
    }
}

/// A like of a post.
///
/// Duplicate likes of the same `(post_id, user_id)` pair are not filtered;
/// the primary key of `post_likes` turns them into upserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub post_id: PostId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub created_at: Timestamp,
}

impl Like {
    /// Build a like of `post_id` by `author`.
    #[must_use]
    pub fn new(post_id: PostId, author: &UserRef, created_at: Timestamp) -> Self {
        Self {
            post_id,
            user_id: author.user_id,
            username: author.username.clone(),
            created_at,
        }
    }
}
