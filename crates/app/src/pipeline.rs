//! Write pipeline — turns activity events into projection writes.
//!
//! Every event becomes exactly one LOGGED batch over its two projection
//! tables plus one `post_metrics` counter increment, both handed to the
//! [`WriteSession`] without waiting for the cluster. The in-process counter
//! of an event kind is bumped only when both submissions were accepted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use feedload_domain::activity::{Comment, Like};
use feedload_domain::error::FeedLoadError;
use feedload_domain::projection::{
    CommentByPostRow, CommentByUserRow, Counter, Mutation, PostLikeByUserRow, PostLikeRow, Write,
};

use crate::ports::WriteSession;

/// Cumulative number of events accepted for submission.
#[derive(Debug, Default)]
pub struct ActivityCounters {
    comments: AtomicU64,
    likes: AtomicU64,
}

/// A point-in-time copy of [`ActivityCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub comments: u64,
    pub likes: u64,
}

impl ActivityCounters {
    /// Read both counters.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            comments: self.comments.load(Ordering::Relaxed),
            likes: self.likes.load(Ordering::Relaxed),
        }
    }
}

/// The LOGGED batch and the counter increment for a comment.
#[must_use]
pub fn comment_writes(comment: &Comment) -> [Write; 2] {
    let by_post = CommentByPostRow {
        post_id: comment.post_id,
        comment_id: comment.comment_id,
        user_id: comment.user_id,
        username: comment.username.clone(),
        user_profile_pic: comment.profile_picture_url.clone(),
        content: comment.content.clone(),
        created_at: comment.created_at,
        updated_at: comment.created_at,
        is_deleted: false,
    };
    let by_user = CommentByUserRow {
        user_id: comment.user_id,
        comment_id: comment.comment_id,
        post_id: comment.post_id,
        content: comment.content.clone(),
        created_at: comment.created_at,
        is_deleted: false,
    };

    [
        Write::LoggedBatch(vec![
            Mutation::CommentByPost(by_post),
            Mutation::CommentByUser(by_user),
        ]),
        Write::Increment {
            post_id: comment.post_id,
            counter: Counter::CommentCount,
        },
    ]
}

/// The LOGGED batch and the counter increment for a like.
#[must_use]
pub fn like_writes(like: &Like) -> [Write; 2] {
    let like_row = PostLikeRow {
        post_id: like.post_id,
        user_id: like.user_id,
        username: like.username.clone(),
        created_at: like.created_at,
    };
    let by_user = PostLikeByUserRow {
        user_id: like.user_id,
        post_id: like.post_id,
        created_at: like.created_at,
    };

    [
        Write::LoggedBatch(vec![
            Mutation::PostLike(like_row),
            Mutation::PostLikeByUser(by_user),
        ]),
        Write::Increment {
            post_id: like.post_id,
            counter: Counter::LikeCount,
        },
    ]
}

/// Submits events through a session and counts the accepted ones.
pub struct WritePipeline<S> {
    session: S,
    counters: Arc<ActivityCounters>,
}

impl<S: WriteSession> WritePipeline<S> {
    /// Create a pipeline with zeroed counters.
    pub fn new(session: S) -> Self {
        Self {
            session,
            counters: Arc::new(ActivityCounters::default()),
        }
    }

    /// Shared handle to the counters, for reporting.
    #[must_use]
    pub fn counters(&self) -> Arc<ActivityCounters> {
        Arc::clone(&self.counters)
    }

    /// The session writes are submitted through.
    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Submit a comment.
    ///
    /// # Errors
    ///
    /// Returns the session's submission error; the comment counter is left
    /// untouched in that case.
    pub fn write_comment(&self, comment: &Comment) -> Result<(), FeedLoadError> {
        self.submit(comment_writes(comment))?;
        self.counters.comments.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Submit a like.
    ///
    /// # Errors
    ///
    /// Returns the session's submission error; the like counter is left
    /// untouched in that case.
    pub fn write_like(&self, like: &Like) -> Result<(), FeedLoadError> {
        self.submit(like_writes(like))?;
        self.counters.likes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn submit(&self, writes: [Write; 2]) -> Result<(), FeedLoadError> {
        for write in writes {
            self.session.execute_async(write)?;
        }
        Ok(())
    }
}
