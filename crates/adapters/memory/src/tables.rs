//! Table storage and write application.

use std::collections::BTreeMap;

use feedload_domain::fixture::PostSummary;
use feedload_domain::id::{CommentId, PostId, UserId};
use feedload_domain::projection::{
    CommentByPostRow, CommentByUserRow, Counter, Mutation, PostLikeByUserRow, PostLikeRow,
    PostMetrics, Write,
};
use feedload_domain::time::Timestamp;
use feedload_domain::user::UserRef;

/// Every table, keyed by its primary key.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: BTreeMap<UserId, UserRef>,
    pub posts: BTreeMap<PostId, PostSummary>,
    pub comments_by_post: BTreeMap<(PostId, Timestamp, CommentId), CommentByPostRow>,
    pub comments_by_user: BTreeMap<(UserId, CommentId), CommentByUserRow>,
    pub post_likes: BTreeMap<(PostId, UserId), PostLikeRow>,
    pub post_likes_by_user: BTreeMap<(UserId, PostId), PostLikeByUserRow>,
    pub post_metrics: BTreeMap<PostId, PostMetrics>,
}

impl Tables {
    /// Sum of `comment_count` over every post.
    #[must_use]
    pub fn total_comment_count(&self) -> i64 {
        self.post_metrics.values().map(|m| m.comment_count).sum()
    }

    /// Sum of `like_count` over every post.
    #[must_use]
    pub fn total_like_count(&self) -> i64 {
        self.post_metrics.values().map(|m| m.like_count).sum()
    }

    pub(crate) fn apply(&mut self, write: &Write) {
        match write {
            Write::LoggedBatch(mutations) => {
                for mutation in mutations {
                    self.upsert(mutation.clone());
                }
            }
            Write::Increment { post_id, counter } => {
                let metrics = self.post_metrics.entry(*post_id).or_insert(PostMetrics {
                    post_id: *post_id,
                    comment_count: 0,
                    like_count: 0,
                });
                match counter {
                    Counter::CommentCount => metrics.comment_count += 1,
                    Counter::LikeCount => metrics.like_count += 1,
                }
            }
        }
    }

    fn upsert(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::CommentByPost(row) => {
                self.comments_by_post
                    .insert((row.post_id, row.created_at, row.comment_id), row);
            }
            Mutation::CommentByUser(row) => {
                self.comments_by_user
                    .insert((row.user_id, row.comment_id), row);
            }
            Mutation::PostLike(row) => {
                self.post_likes.insert((row.post_id, row.user_id), row);
            }
            Mutation::PostLikeByUser(row) => {
                self.post_likes_by_user.insert((row.user_id, row.post_id), row);
            }
        }
    }
}
