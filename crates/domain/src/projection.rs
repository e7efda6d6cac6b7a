//! Projections — the table rows an activity event is written to, and the
//! writes that carry them to the cluster.
//!
//! A comment lands in `comments_by_post` and `comments_by_user`; a like lands
//! in `post_likes` and `post_likes_by_user`. Both pairs are written together
//! in one LOGGED batch. The matching `post_metrics` counter is bumped by a
//! separate [`Write::Increment`] because counter columns cannot share a
//! LOGGED batch with regular columns.

use crate::id::{CommentId, PostId, UserId};
use crate::time::Timestamp;

/// Row of `comments_by_post`, partitioned by post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentByPostRow {
    pub post_id: PostId,
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub user_profile_pic: Option<String>,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub is_deleted: bool,
}

/// Row of `comments_by_user`, partitioned by author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentByUserRow {
    pub user_id: UserId,
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub content: String,
    pub created_at: Timestamp,
    pub is_deleted: bool,
}

/// Row of `post_likes`, primary key `(post_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLikeRow {
    pub post_id: PostId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub created_at: Timestamp,
}

/// Row of `post_likes_by_user`, primary key `(user_id, post_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLikeByUserRow {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: Timestamp,
}

/// A single row insert (an upsert in CQL terms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CommentByPost(CommentByPostRow),
    CommentByUser(CommentByUserRow),
    PostLike(PostLikeRow),
    PostLikeByUser(PostLikeByUserRow),
}

impl Mutation {
    /// Name of the table this mutation targets.
    #[must_use]
    pub fn table(&self) -> &'static str {
        match self {
            Self::CommentByPost(_) => "comments_by_post",
            Self::CommentByUser(_) => "comments_by_user",
            Self::PostLike(_) => "post_likes",
            Self::PostLikeByUser(_) => "post_likes_by_user",
        }
    }
}

/// Counter columns of `post_metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    CommentCount,
    LikeCount,
}

impl Counter {
    /// Column name in `post_metrics`.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::CommentCount => "comment_count",
            Self::LikeCount => "like_count",
        }
    }
}

/// One unit of work handed to a write session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Mutations that become visible all together or not at all.
    LoggedBatch(Vec<Mutation>),
    /// `UPDATE post_metrics SET <counter> = <counter> + 1 WHERE post_id = ?`.
    Increment { post_id: PostId, counter: Counter },
}

impl Write {
    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoggedBatch(_) => "logged_batch",
            Self::Increment { .. } => "counter_increment",
        }
    }
}

/// Post-level counters as stored in `post_metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostMetrics {
    pub post_id: PostId,
    pub comment_count: i64,
    pub like_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_name_target_tables() {
        let ts = now();
        let like = Mutation::PostLike(PostLikeRow {
            post_id: PostId::new(),
            user_id: UserId::new(),
            username: None,
            created_at: ts,
        });
        let by_user = Mutation::PostLikeByUser(PostLikeByUserRow {
            user_id: UserId::new(),
            post_id: PostId::new(),
            created_at: ts,
        });
        assert_eq!(like.table(), "post_likes");
        assert_eq!(by_user.table(), "post_likes_by_user");
    }

    #[test]
    fn should_name_counter_columns() {
        assert_eq!(Counter::CommentCount.column(), "comment_count");
        assert_eq!(Counter::LikeCount.column(), "like_count");
    }

    #[test]
    fn should_label_write_kinds() {
        let inc = Write::Increment {
            post_id: PostId::new(),
            counter: Counter::LikeCount,
        };
        assert_eq!(inc.kind(), "counter_increment");
        assert_eq!(Write::LoggedBatch(Vec::new()).kind(), "logged_batch");
    }
}
