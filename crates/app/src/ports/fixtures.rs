//! Fixture port — one-shot reads of the reference tables at startup.

use std::future::Future;

use feedload_domain::error::FeedLoadError;
use feedload_domain::id::PostId;
use feedload_domain::user::UserRef;

/// Reads users and posts that the load generator picks from.
pub trait FixtureSource: Send + Sync {
    /// `SELECT user_id, username, profile_picture_url FROM users LIMIT ?`.
    fn load_users(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<UserRef>, FeedLoadError>> + Send;

    /// `SELECT post_id FROM posts LIMIT ?`.
    fn load_posts(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PostId>, FeedLoadError>> + Send;
}

impl<T: FixtureSource> FixtureSource for std::sync::Arc<T> {
    fn load_users(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<UserRef>, FeedLoadError>> + Send {
        (**self).load_users(limit)
    }

    fn load_posts(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PostId>, FeedLoadError>> + Send {
        (**self).load_posts(limit)
    }
}
