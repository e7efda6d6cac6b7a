//! Fixtures — complete `users` and `posts` rows written by the seeder.

use crate::id::{PostId, UserId};
use crate::time::Timestamp;
use crate::user::UserRef;

/// A full `users` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub profile_picture_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_active: bool,
}

impl UserProfile {
    /// The reference the load generator would load for this user.
    #[must_use]
    pub fn to_ref(&self) -> UserRef {
        UserRef::new(
            self.user_id,
            self.username.clone(),
            self.profile_picture_url.clone(),
        )
    }
}

/// A full `posts` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub media_urls: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_deleted: bool,
}

/// The author and body of a post, as shown in analysis reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub user_id: UserId,
    pub content: Option<String>,
}
