//! Analytics port — read-side queries used by the analyzer.

use std::future::Future;

use feedload_domain::error::FeedLoadError;
use feedload_domain::fixture::PostSummary;
use feedload_domain::id::{PostId, UserId};
use feedload_domain::projection::PostMetrics;
use feedload_domain::time::Timestamp;

/// Ad-hoc reads over the social-media tables.
pub trait AnalyticsSource: Send + Sync {
    /// `SELECT COUNT(*) FROM users`.
    fn count_users(&self) -> impl Future<Output = Result<u64, FeedLoadError>> + Send;

    /// `SELECT COUNT(*) FROM posts`.
    fn count_posts(&self) -> impl Future<Output = Result<u64, FeedLoadError>> + Send;

    /// Up to `limit` rows of `post_metrics`.
    fn post_metrics(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PostMetrics>, FeedLoadError>> + Send;

    /// Author and content of a post, if it exists.
    fn post_summary(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Option<PostSummary>, FeedLoadError>> + Send;

    /// Username of a user, if the user exists and has one.
    fn username(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<String>, FeedLoadError>> + Send;

    /// Up to `limit` `(user_id, created_at)` pairs from `comments_by_user`.
    fn comment_activity(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<(UserId, Timestamp)>, FeedLoadError>> + Send;
}

impl<T: AnalyticsSource> AnalyticsSource for std::sync::Arc<T> {
    fn count_users(&self) -> impl Future<Output = Result<u64, FeedLoadError>> + Send {
        (**self).count_users()
    }

    fn count_posts(&self) -> impl Future<Output = Result<u64, FeedLoadError>> + Send {
        (**self).count_posts()
    }

    fn post_metrics(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<PostMetrics>, FeedLoadError>> + Send {
        (**self).post_metrics(limit)
    }

    fn post_summary(
        &self,
        post_id: PostId,
    ) -> impl Future<Output = Result<Option<PostSummary>, FeedLoadError>> + Send {
        (**self).post_summary(post_id)
    }

    fn username(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<String>, FeedLoadError>> + Send {
        (**self).username(user_id)
    }

    fn comment_activity(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<(UserId, Timestamp)>, FeedLoadError>> + Send {
        (**self).comment_activity(limit)
    }
}
