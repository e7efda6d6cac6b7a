//! # feedload-adapter-memory
//!
//! In-memory model of the seven social-media tables.
//!
//! | Table | Key | Notes |
//! |-------|-----|-------|
//! | `users` | `user_id` | |
//! | `posts` | `post_id` | |
//! | `comments_by_post` | `(post_id, created_at, comment_id)` | |
//! | `comments_by_user` | `(user_id, comment_id)` | |
//! | `post_likes` | `(post_id, user_id)` | repeated likes upsert |
//! | `post_likes_by_user` | `(user_id, post_id)` | repeated likes upsert |
//! | `post_metrics` | `post_id` | counters |
//!
//! Writes are applied synchronously; a LOGGED batch is applied under a
//! single lock so readers never observe half of it. Comment batches can be
//! made to fail on a fixed cadence to exercise per-event error handling.
//!
//! ## Dependency rule
//!
//! Depends on `feedload-app` (port traits) and `feedload-domain` only.

mod tables;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use feedload_app::ports::{AnalyticsSource, FixtureSource, SeedSink, WriteSession};
use feedload_domain::error::FeedLoadError;
use feedload_domain::fixture::{PostRecord, PostSummary, UserProfile};
use feedload_domain::id::{PostId, UserId};
use feedload_domain::projection::{Mutation, PostMetrics, Write};
use feedload_domain::time::Timestamp;
use feedload_domain::user::UserRef;

pub use tables::Tables;

/// Errors raised by the in-memory cluster.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The cluster was closed.
    #[error("session closed")]
    Closed,

    /// A failure injected by [`InMemoryCluster::fail_every_nth_comment`].
    #[error("injected failure on comment submission #{0}")]
    Injected(u64),
}

impl From<MemoryError> for FeedLoadError {
    fn from(err: MemoryError) -> Self {
        Self::SubmitFailed(Box::new(err))
    }
}

/// Shared in-memory cluster implementing every port.
#[derive(Default)]
pub struct InMemoryCluster {
    tables: Mutex<Tables>,
    comment_attempts: AtomicU64,
    fail_every: Option<u64>,
    closed: AtomicBool,
}

impl InMemoryCluster {
    /// An empty cluster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every `n`th comment batch submitted through
    /// [`WriteSession::execute_async`].
    #[must_use]
    pub fn fail_every_nth_comment(mut self, n: u64) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }

    /// Insert a user with only the fields the load generator reads.
    pub fn add_user(&self, user: &UserRef) {
        self.lock().users.insert(user.user_id, user.clone());
    }

    /// Insert a bare post owned by `author`.
    pub fn add_post(&self, post_id: PostId, author: UserId, content: &str) {
        self.lock().posts.insert(
            post_id,
            PostSummary {
                user_id: author,
                content: Some(content.to_string()),
            },
        );
    }

    /// Run `f` against a consistent view of every table.
    pub fn inspect<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.lock())
    }

    /// Comment batches submitted through `execute_async`, failed or not.
    #[must_use]
    pub fn comment_attempts(&self) -> u64 {
        self.comment_attempts.load(Ordering::Relaxed)
    }

    /// Whether [`WriteSession::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn submit(&self, write: &Write) -> Result<(), MemoryError> {
        if self.is_closed() {
            return Err(MemoryError::Closed);
        }
        if is_comment_batch(write) {
            let attempt = self.comment_attempts.fetch_add(1, Ordering::Relaxed) + 1;
            if self.fail_every.is_some_and(|n| attempt % n == 0) {
                return Err(MemoryError::Injected(attempt));
            }
        }
        self.lock().apply(write);
        Ok(())
    }
}

fn is_comment_batch(write: &Write) -> bool {
    matches!(
        write,
        Write::LoggedBatch(mutations)
            if mutations.iter().any(|m| matches!(m, Mutation::CommentByPost(_)))
    )
}

impl WriteSession for InMemoryCluster {
    fn execute_async(&self, write: Write) -> Result<(), FeedLoadError> {
        self.submit(&write).map_err(|err| {
            tracing::debug!(kind = write.kind(), error = %err, "rejected write");
            err.into()
        })
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!("in-memory session closed");
        }
    }
}

impl FixtureSource for InMemoryCluster {
    async fn load_users(&self, limit: usize) -> Result<Vec<UserRef>, FeedLoadError> {
        Ok(self.lock().users.values().take(limit).cloned().collect())
    }

    async fn load_posts(&self, limit: usize) -> Result<Vec<PostId>, FeedLoadError> {
        Ok(self.lock().posts.keys().take(limit).copied().collect())
    }
}

impl SeedSink for InMemoryCluster {
    async fn insert_user(&self, user: &UserProfile) -> Result<(), FeedLoadError> {
        self.add_user(&user.to_ref());
        Ok(())
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<(), FeedLoadError> {
        self.add_post(post.post_id, post.user_id, &post.content);
        Ok(())
    }

    async fn apply(&self, write: Write) -> Result<(), FeedLoadError> {
        if self.is_closed() {
            return Err(MemoryError::Closed.into());
        }
        self.lock().apply(&write);
        Ok(())
    }
}

impl AnalyticsSource for InMemoryCluster {
    async fn count_users(&self) -> Result<u64, FeedLoadError> {
        Ok(self.lock().users.len() as u64)
    }

    async fn count_posts(&self) -> Result<u64, FeedLoadError> {
        Ok(self.lock().posts.len() as u64)
    }

    async fn post_metrics(&self, limit: usize) -> Result<Vec<PostMetrics>, FeedLoadError> {
        Ok(self
            .lock()
            .post_metrics
            .values()
            .take(limit)
            .copied()
            .collect())
    }

    async fn post_summary(&self, post_id: PostId) -> Result<Option<PostSummary>, FeedLoadError> {
        Ok(self.lock().posts.get(&post_id).cloned())
    }

    async fn username(&self, user_id: UserId) -> Result<Option<String>, FeedLoadError> {
        Ok(self
            .lock()
            .users
            .get(&user_id)
            .and_then(|u| u.username.clone()))
    }

    async fn comment_activity(
        &self,
        limit: usize,
    ) -> Result<Vec<(UserId, Timestamp)>, FeedLoadError> {
        Ok(self
            .lock()
            .comments_by_user
            .values()
            .take(limit)
            .map(|row| (row.user_id, row.created_at))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedload_app::pipeline::{comment_writes, like_writes};
    use feedload_domain::activity::{Comment, Like};
    use feedload_domain::time::now;

    fn cluster_with_one_of_each() -> (InMemoryCluster, UserRef, PostId) {
        let cluster = InMemoryCluster::new();
        let user = UserRef::new(UserId::new(), "alice", "https://example.com/a.jpg");
        let post = PostId::new();
        cluster.add_user(&user);
        cluster.add_post(post, user.user_id, "Hello");
        (cluster, user, post)
    }

    #[test]
    fn should_write_comment_to_both_projections_and_counter() {
        let (cluster, user, post) = cluster_with_one_of_each();
        let comment = Comment::new(post, &user, "Nice", now());

        for write in comment_writes(&comment) {
            cluster.execute_async(write).unwrap();
        }

        cluster.inspect(|t| {
            assert_eq!(t.comments_by_post.len(), 1);
            assert_eq!(t.comments_by_user.len(), 1);
            let by_post = t.comments_by_post.values().next().unwrap();
            let by_user = t.comments_by_user.values().next().unwrap();
            assert_eq!(by_post.comment_id, by_user.comment_id);
            assert_eq!(by_post.username.as_deref(), Some("alice"));
            assert_eq!(t.post_metrics[&post].comment_count, 1);
        });
    }

    #[test]
    fn should_upsert_repeated_likes() {
        let (cluster, user, post) = cluster_with_one_of_each();

        for _ in 0..3 {
            for write in like_writes(&Like::new(post, &user, now())) {
                cluster.execute_async(write).unwrap();
            }
        }

        cluster.inspect(|t| {
            assert_eq!(t.post_likes.len(), 1);
            assert_eq!(t.post_likes_by_user.len(), 1);
            assert_eq!(t.post_metrics[&post].like_count, 3);
        });
    }

    #[test]
    fn should_fail_every_nth_comment_batch() {
        let (cluster, user, post) = cluster_with_one_of_each();
        let cluster = cluster.fail_every_nth_comment(3);

        let results: Vec<bool> = (0..6)
            .map(|_| {
                let [batch, _] = comment_writes(&Comment::new(post, &user, "x", now()));
                cluster.execute_async(batch).is_ok()
            })
            .collect();

        assert_eq!(results, vec![true, true, false, true, true, false]);
        assert_eq!(cluster.comment_attempts(), 6);
        cluster.inspect(|t| assert_eq!(t.comments_by_post.len(), 4));
    }

    #[tokio::test]
    async fn should_reject_writes_after_close() {
        let (cluster, user, post) = cluster_with_one_of_each();
        cluster.close().await;
        cluster.close().await;

        let [batch, _] = like_writes(&Like::new(post, &user, now()));
        let err = cluster.execute_async(batch).unwrap_err();

        assert!(matches!(err, FeedLoadError::SubmitFailed(_)));
        assert!(cluster.is_closed());
    }

    #[tokio::test]
    async fn should_serve_fixtures_up_to_limit() {
        let cluster = InMemoryCluster::new();
        for i in 0..5 {
            let user = UserRef::new(UserId::new(), format!("user{i}"), "pic");
            cluster.add_user(&user);
            cluster.add_post(PostId::new(), user.user_id, "post");
        }

        assert_eq!(cluster.load_users(3).await.unwrap().len(), 3);
        assert_eq!(cluster.load_posts(10).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_report_unknown_user_as_missing() {
        let (cluster, user, post) = cluster_with_one_of_each();

        assert_eq!(
            cluster.username(user.user_id).await.unwrap().as_deref(),
            Some("alice")
        );
        assert_eq!(cluster.username(UserId::new()).await.unwrap(), None);
        assert_eq!(
            cluster.post_summary(post).await.unwrap().unwrap().user_id,
            user.user_id
        );
    }
}
