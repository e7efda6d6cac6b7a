//! Fixture seeder — generates a synthetic social graph and writes it.
//!
//! Comments and likes go through the same projections as the load
//! generator ([`comment_writes`], [`like_writes`]) so that seeded data and
//! generated data are indistinguishable, `post_metrics` included. Unlike the
//! load generator, every write is awaited.

use std::collections::HashSet;

use chrono::Duration as TimeDelta;
use rand::Rng;
use rand::seq::IndexedRandom;

use feedload_domain::activity::{Comment, Like};
use feedload_domain::error::{FeedLoadError, ValidationError};
use feedload_domain::fixture::{PostRecord, UserProfile};
use feedload_domain::id::{PostId, UserId};
use feedload_domain::time::Timestamp;

use crate::pipeline::{comment_writes, like_writes};
use crate::ports::SeedSink;

/// How much data to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    /// Like attempts; repeated `(user, post)` pairs are dropped.
    pub likes: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 100,
            posts: 200,
            comments: 1000,
            likes: 2000,
        }
    }
}

impl SeedConfig {
    /// Posts need authors and activity needs posts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroLimit`] when `users` or `posts` is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.users == 0 {
            return Err(ValidationError::ZeroLimit { field: "users" });
        }
        if self.posts == 0 {
            return Err(ValidationError::ZeroLimit { field: "posts" });
        }
        Ok(())
    }
}

const FIRST_NAMES: [&str; 16] = [
    "Ada", "Ben", "Chloe", "Dev", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jonas", "Kira",
    "Leo", "Maya", "Nils", "Omar", "Priya",
];

const LAST_NAMES: [&str; 12] = [
    "Abara", "Berg", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Haddad", "Ito",
    "Jensen", "Kowalski", "Lindqvist",
];

const WORDS: [&str; 32] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "commodo", "consequat", "velit",
];

/// Everything the seeder will write, generated up front.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub users: Vec<UserProfile>,
    pub posts: Vec<PostRecord>,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
}

impl SeedPlan {
    /// Generate a plan relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `config` is invalid.
    pub fn generate<R: Rng + ?Sized>(
        config: &SeedConfig,
        rng: &mut R,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        config.validate()?;

        let users: Vec<UserProfile> = (0..config.users).map(|_| user(rng, now)).collect();
        let user_ids: Vec<UserId> = users.iter().map(|u| u.user_id).collect();

        let posts: Vec<PostRecord> = (0..config.posts)
            .map(|_| {
                let author = pick(&user_ids, rng);
                post(rng, now, author)
            })
            .collect();
        let post_ids: Vec<PostId> = posts.iter().map(|p| p.post_id).collect();

        let comments = (0..config.comments)
            .map(|_| {
                let author = users[rng.random_range(0..users.len())].to_ref();
                let words = rng.random_range(3..15);
                let content = sentence(rng, words);
                let created_at = now - seconds(rng, 60..604_800);
                Comment::new(pick(&post_ids, rng), &author, content, created_at)
            })
            .collect();

        let mut already_liked = HashSet::new();
        let mut likes = Vec::new();
        for _ in 0..config.likes {
            let post_id = pick(&post_ids, rng);
            let author = &users[rng.random_range(0..users.len())];
            if !already_liked.insert((author.user_id, post_id)) {
                continue;
            }
            let created_at = now - seconds(rng, 30..432_000);
            likes.push(Like::new(post_id, &author.to_ref(), created_at));
        }

        Ok(Self {
            users,
            posts,
            comments,
            likes,
        })
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    // Callers pass non-empty slices; `SeedConfig::validate` guarantees it.
    items[rng.random_range(0..items.len())]
}

fn seconds<R: Rng + ?Sized>(rng: &mut R, range: std::ops::Range<i64>) -> TimeDelta {
    TimeDelta::seconds(rng.random_range(range))
}

fn word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("lorem")
}

fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let mut text = String::new();
    for i in 0..words.max(1) {
        let w = word(rng);
        if i == 0 {
            let mut chars = w.chars();
            if let Some(first) = chars.next() {
                text.extend(first.to_uppercase());
                text.push_str(chars.as_str());
            }
        } else {
            text.push(' ');
            text.push_str(w);
        }
    }
    text.push('.');
    text
}

fn paragraph<R: Rng + ?Sized>(rng: &mut R, sentences: usize) -> String {
    (0..sentences.max(1))
        .map(|_| {
            let words = rng.random_range(4..12);
            sentence(rng, words)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn user<R: Rng + ?Sized>(rng: &mut R, now: Timestamp) -> UserProfile {
    let user_id = UserId::new();
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Abara");
    let username = format!(
        "{}.{}{}",
        first.to_lowercase(),
        last.to_lowercase(),
        rng.random_range(1..1000)
    );
    let created_at = now - seconds(rng, 86_400..2_592_000);
    let updated_at = created_at + seconds(rng, 0..86_400);

    UserProfile {
        user_id,
        email: format!("{username}@example.com"),
        full_name: format!("{first} {last}"),
        bio: paragraph(rng, 1),
        profile_picture_url: format!("https://example.com/avatars/{user_id}.jpg"),
        username,
        created_at,
        updated_at,
        is_active: true,
    }
}

fn post<R: Rng + ?Sized>(rng: &mut R, now: Timestamp, author: UserId) -> PostRecord {
    let sentences = rng.random_range(1..=3);
    let content = paragraph(rng, sentences);

    let mut media_urls = Vec::new();
    if rng.random_bool(0.3) {
        for _ in 0..rng.random_range(1..=3) {
            media_urls.push(format!("https://example.com/media/{}.jpg", PostId::new()));
        }
    }

    let created_at = now - seconds(rng, 3_600..1_209_600);
    let updated_at = if rng.random_bool(0.1) {
        created_at + seconds(rng, 60..86_400)
    } else {
        created_at
    };

    PostRecord {
        post_id: PostId::new(),
        user_id: author,
        content,
        media_urls,
        created_at,
        updated_at,
        is_deleted: false,
    }
}

/// Rows written by a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub likes: usize,
}

/// Writes a [`SeedPlan`] through a [`SeedSink`].
pub struct Seeder<K> {
    sink: K,
}

impl<K: SeedSink> Seeder<K> {
    /// Create a seeder writing to `sink`.
    pub fn new(sink: K) -> Self {
        Self { sink }
    }

    /// Write users, then posts, then comments, then likes.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write and returns its error.
    pub async fn run(&self, plan: &SeedPlan) -> Result<SeedReport, FeedLoadError> {
        let mut report = SeedReport::default();

        for user in &plan.users {
            self.sink.insert_user(user).await?;
            report.users += 1;
            log_progress("users", report.users, 10);
        }
        tracing::info!(count = report.users, "seeded users");

        for post in &plan.posts {
            self.sink.insert_post(post).await?;
            report.posts += 1;
            log_progress("posts", report.posts, 20);
        }
        tracing::info!(count = report.posts, "seeded posts");

        for comment in &plan.comments {
            for write in comment_writes(comment) {
                self.sink.apply(write).await?;
            }
            report.comments += 1;
            log_progress("comments", report.comments, 100);
        }
        tracing::info!(count = report.comments, "seeded comments");

        for like in &plan.likes {
            for write in like_writes(like) {
                self.sink.apply(write).await?;
            }
            report.likes += 1;
            log_progress("likes", report.likes, 200);
        }
        tracing::info!(count = report.likes, "seeded likes");

        Ok(report)
    }
}

fn log_progress(kind: &'static str, done: usize, every: usize) {
    if done % every == 0 {
        tracing::info!(kind, done, "seeding in progress");
    }
}
