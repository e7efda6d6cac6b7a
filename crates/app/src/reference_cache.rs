//! Reference cache — users and posts the load generator picks from.
//!
//! Loaded once at startup with two bounded reads and never refreshed.
//! Rows added or removed in the cluster during a run are not seen.

use std::collections::HashMap;

use rand::Rng;

use feedload_domain::error::{FeedLoadError, NoFixtureDataError};
use feedload_domain::id::{PostId, UserId};
use feedload_domain::user::UserRef;

use crate::ports::FixtureSource;

/// Default number of rows read from each reference table.
pub const DEFAULT_REFERENCE_LIMIT: usize = 1000;

/// Immutable in-memory view of the reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceCache {
    user_ids: Vec<UserId>,
    post_ids: Vec<PostId>,
    users: HashMap<UserId, UserRef>,
}

impl ReferenceCache {
    /// Read up to `limit` users and `limit` posts from `source`.
    ///
    /// # Errors
    ///
    /// Propagates query errors from the source, and returns
    /// [`FeedLoadError::NoFixtureData`] when either table is empty.
    pub async fn load<F: FixtureSource>(source: &F, limit: usize) -> Result<Self, FeedLoadError> {
        let users = source.load_users(limit).await?;
        let posts = source.load_posts(limit).await?;
        let cache = Self::from_parts(users, posts)?;

        tracing::info!(
            users = cache.user_count(),
            posts = cache.post_count(),
            "reference cache loaded"
        );

        Ok(cache)
    }

    /// Build a cache from already-loaded rows.
    ///
    /// # Errors
    ///
    /// Returns [`FeedLoadError::NoFixtureData`] when `users` or `posts` is
    /// empty.
    pub fn from_parts(users: Vec<UserRef>, posts: Vec<PostId>) -> Result<Self, FeedLoadError> {
        if users.is_empty() || posts.is_empty() {
            return Err(NoFixtureDataError {
                users: users.len(),
                posts: posts.len(),
            }
            .into());
        }

        let user_ids = users.iter().map(|user| user.user_id).collect();
        let users = users.into_iter().map(|user| (user.user_id, user)).collect();

        Ok(Self {
            user_ids,
            post_ids: posts,
            users,
        })
    }

    /// Number of user ids in the ordered sequence.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    /// Number of post ids in the ordered sequence.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.post_ids.len()
    }

    /// Denormalized fields of a cached user.
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<&UserRef> {
        self.users.get(&user_id)
    }

    /// Pick a post uniformly at random.
    pub fn random_post<R: Rng + ?Sized>(&self, rng: &mut R) -> PostId {
        self.post_ids[rng.random_range(0..self.post_ids.len())]
    }

    /// Pick a user uniformly at random.
    pub fn random_user<R: Rng + ?Sized>(&self, rng: &mut R) -> &UserRef {
        let user_id = self.user_ids[rng.random_range(0..self.user_ids.len())];
        // Every id in `user_ids` was inserted into `users` by `from_parts`.
        &self.users[&user_id]
    }
}
