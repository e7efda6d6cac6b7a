//! User reference — the slice of a `users` row the load generator needs.

use crate::id::UserId;

/// A user loaded once at startup.
///
/// `username` and `profile_picture_url` are copied verbatim into every
/// comment or like written on behalf of this user. Both columns are
/// nullable in the schema, so both are optional here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub user_id: UserId,
    pub username: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl UserRef {
    /// Build a reference with both denormalized fields present.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        profile_picture_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            username: Some(username.into()),
            profile_picture_url: Some(profile_picture_url.into()),
        }
    }
}
