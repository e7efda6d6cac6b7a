//! Seed port — awaited inserts used by the fixture seeder.

use std::future::Future;

use feedload_domain::error::FeedLoadError;
use feedload_domain::fixture::{PostRecord, UserProfile};
use feedload_domain::projection::Write;

/// Persists synthetic fixtures, one awaited statement at a time.
pub trait SeedSink: Send + Sync {
    /// Insert one row into `users`.
    fn insert_user(
        &self,
        user: &UserProfile,
    ) -> impl Future<Output = Result<(), FeedLoadError>> + Send;

    /// Insert one row into `posts`.
    fn insert_post(
        &self,
        post: &PostRecord,
    ) -> impl Future<Output = Result<(), FeedLoadError>> + Send;

    /// Execute a write and wait for the cluster to acknowledge it.
    fn apply(&self, write: Write) -> impl Future<Output = Result<(), FeedLoadError>> + Send;
}

impl<T: SeedSink> SeedSink for std::sync::Arc<T> {
    fn insert_user(
        &self,
        user: &UserProfile,
    ) -> impl Future<Output = Result<(), FeedLoadError>> + Send {
        (**self).insert_user(user)
    }

    fn insert_post(
        &self,
        post: &PostRecord,
    ) -> impl Future<Output = Result<(), FeedLoadError>> + Send {
        (**self).insert_post(post)
    }

    fn apply(&self, write: Write) -> impl Future<Output = Result<(), FeedLoadError>> + Send {
        (**self).apply(write)
    }
}
