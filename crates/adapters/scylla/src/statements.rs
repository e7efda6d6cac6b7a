//! CQL text, prepared statement handles and value mapping.

use scylla::client::session::Session;
use scylla::statement::prepared::PreparedStatement;
use scylla::value::{CqlTimestamp, CqlValue};
use uuid::Uuid;

use feedload_domain::fixture::{PostRecord, UserProfile};
use feedload_domain::projection::{Counter, Mutation};
use feedload_domain::time::{Timestamp, to_millis};

use crate::error::ScyllaError;

const INSERT_COMMENT_BY_POST: &str = r"
    INSERT INTO comments_by_post
        (post_id, comment_id, user_id, username, user_profile_pic, content, created_at, updated_at, is_deleted)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const INSERT_COMMENT_BY_USER: &str = r"
    INSERT INTO comments_by_user (user_id, comment_id, post_id, content, created_at, is_deleted)
    VALUES (?, ?, ?, ?, ?, ?)
";
const INSERT_POST_LIKE: &str =
    "INSERT INTO post_likes (post_id, user_id, username, created_at) VALUES (?, ?, ?, ?)";
const INSERT_POST_LIKE_BY_USER: &str =
    "INSERT INTO post_likes_by_user (user_id, post_id, created_at) VALUES (?, ?, ?)";
const INCREMENT_COMMENT_COUNT: &str =
    "UPDATE post_metrics SET comment_count = comment_count + 1 WHERE post_id = ?";
const INCREMENT_LIKE_COUNT: &str =
    "UPDATE post_metrics SET like_count = like_count + 1 WHERE post_id = ?";

const SELECT_USERS: &str = "SELECT user_id, username, profile_picture_url FROM users LIMIT ?";
const SELECT_POSTS: &str = "SELECT post_id FROM posts LIMIT ?";

const INSERT_USER: &str = r"
    INSERT INTO users
        (user_id, username, email, full_name, bio, profile_picture_url, created_at, updated_at, is_active)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const INSERT_POST: &str = r"
    INSERT INTO posts (post_id, user_id, content, media_urls, created_at, updated_at, is_deleted)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

pub(crate) const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";
pub(crate) const COUNT_POSTS: &str = "SELECT COUNT(*) FROM posts";
const SELECT_METRICS: &str = "SELECT post_id, comment_count, like_count FROM post_metrics LIMIT ?";
const SELECT_POST_SUMMARY: &str = "SELECT user_id, content FROM posts WHERE post_id = ?";
const SELECT_USERNAME: &str = "SELECT username FROM users WHERE user_id = ?";
const SELECT_COMMENT_ACTIVITY: &str = "SELECT user_id, created_at FROM comments_by_user LIMIT ?";

/// Statements the load generator needs, prepared when the session opens.
///
/// They only touch the columns every deployment has, so a cluster with just
/// the write tables plus `users`/`posts` ids and names is enough.
pub(crate) struct Statements {
    pub comment_by_post: PreparedStatement,
    pub comment_by_user: PreparedStatement,
    pub post_like: PreparedStatement,
    pub post_like_by_user: PreparedStatement,
    pub increment_comments: PreparedStatement,
    pub increment_likes: PreparedStatement,
    pub select_users: PreparedStatement,
    pub select_posts: PreparedStatement,
}

/// Inserts of the seeder, prepared on first use.
pub(crate) struct SeedStatements {
    pub insert_user: PreparedStatement,
    pub insert_post: PreparedStatement,
}

/// Reads of the analyzer, prepared on first use.
pub(crate) struct AnalyticsStatements {
    pub select_metrics: PreparedStatement,
    pub select_post_summary: PreparedStatement,
    pub select_username: PreparedStatement,
    pub select_comment_activity: PreparedStatement,
}

impl SeedStatements {
    pub(crate) async fn prepare(session: &Session) -> Result<Self, ScyllaError> {
        Ok(Self {
            insert_user: session.prepare(INSERT_USER).await?,
            insert_post: session.prepare(INSERT_POST).await?,
        })
    }
}

impl AnalyticsStatements {
    pub(crate) async fn prepare(session: &Session) -> Result<Self, ScyllaError> {
        Ok(Self {
            select_metrics: session.prepare(SELECT_METRICS).await?,
            select_post_summary: session.prepare(SELECT_POST_SUMMARY).await?,
            select_username: session.prepare(SELECT_USERNAME).await?,
            select_comment_activity: session.prepare(SELECT_COMMENT_ACTIVITY).await?,
        })
    }
}

impl Statements {
    pub(crate) async fn prepare(session: &Session) -> Result<Self, ScyllaError> {
        Ok(Self {
            comment_by_post: session.prepare(INSERT_COMMENT_BY_POST).await?,
            comment_by_user: session.prepare(INSERT_COMMENT_BY_USER).await?,
            post_like: session.prepare(INSERT_POST_LIKE).await?,
            post_like_by_user: session.prepare(INSERT_POST_LIKE_BY_USER).await?,
            increment_comments: session.prepare(INCREMENT_COMMENT_COUNT).await?,
            increment_likes: session.prepare(INCREMENT_LIKE_COUNT).await?,
            select_users: session.prepare(SELECT_USERS).await?,
            select_posts: session.prepare(SELECT_POSTS).await?,
        })
    }

    pub(crate) fn for_mutation(&self, mutation: &Mutation) -> &PreparedStatement {
        match mutation {
            Mutation::CommentByPost(_) => &self.comment_by_post,
            Mutation::CommentByUser(_) => &self.comment_by_user,
            Mutation::PostLike(_) => &self.post_like,
            Mutation::PostLikeByUser(_) => &self.post_like_by_user,
        }
    }

    pub(crate) fn for_counter(&self, counter: Counter) -> &PreparedStatement {
        match counter {
            Counter::CommentCount => &self.increment_comments,
            Counter::LikeCount => &self.increment_likes,
        }
    }
}

/// One bound row, in the column order of its statement.
pub(crate) type Row = Vec<Option<CqlValue>>;

fn uuid(value: Uuid) -> Option<CqlValue> {
    Some(CqlValue::Uuid(value))
}

fn text(value: &str) -> Option<CqlValue> {
    Some(CqlValue::Text(value.to_string()))
}

fn maybe_text(value: Option<&str>) -> Option<CqlValue> {
    value.map(|v| CqlValue::Text(v.to_string()))
}

fn timestamp(value: Timestamp) -> Option<CqlValue> {
    Some(CqlValue::Timestamp(CqlTimestamp(to_millis(value))))
}

fn boolean(value: bool) -> Option<CqlValue> {
    Some(CqlValue::Boolean(value))
}

/// `LIMIT` values are CQL `int`.
pub(crate) fn limit(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub(crate) fn mutation_values(mutation: &Mutation) -> Row {
    match mutation {
        Mutation::CommentByPost(row) => vec![
            uuid(row.post_id.as_uuid()),
            uuid(row.comment_id.as_uuid()),
            uuid(row.user_id.as_uuid()),
            maybe_text(row.username.as_deref()),
            maybe_text(row.user_profile_pic.as_deref()),
            text(&row.content),
            timestamp(row.created_at),
            timestamp(row.updated_at),
            boolean(row.is_deleted),
        ],
        Mutation::CommentByUser(row) => vec![
            uuid(row.user_id.as_uuid()),
            uuid(row.comment_id.as_uuid()),
            uuid(row.post_id.as_uuid()),
            text(&row.content),
            timestamp(row.created_at),
            boolean(row.is_deleted),
        ],
        Mutation::PostLike(row) => vec![
            uuid(row.post_id.as_uuid()),
            uuid(row.user_id.as_uuid()),
            maybe_text(row.username.as_deref()),
            timestamp(row.created_at),
        ],
        Mutation::PostLikeByUser(row) => vec![
            uuid(row.user_id.as_uuid()),
            uuid(row.post_id.as_uuid()),
            timestamp(row.created_at),
        ],
    }
}

pub(crate) fn user_values(user: &UserProfile) -> Row {
    vec![
        uuid(user.user_id.as_uuid()),
        text(&user.username),
        text(&user.email),
        text(&user.full_name),
        text(&user.bio),
        text(&user.profile_picture_url),
        timestamp(user.created_at),
        timestamp(user.updated_at),
        boolean(user.is_active),
    ]
}

pub(crate) fn post_values(post: &PostRecord) -> Row {
    let media = post
        .media_urls
        .iter()
        .map(|url| CqlValue::Text(url.clone()))
        .collect();
    vec![
        uuid(post.post_id.as_uuid()),
        uuid(post.user_id.as_uuid()),
        text(&post.content),
        Some(CqlValue::List(media)),
        timestamp(post.created_at),
        timestamp(post.updated_at),
        boolean(post.is_deleted),
    ]
}
