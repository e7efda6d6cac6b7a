//! Event factories — one comment or one like per call.
//!
//! Every call picks a post and a user uniformly at random from the
//! [`ReferenceCache`] and stamps the event with the wall-clock time of the
//! call. Each scheduled stream owns its own factory, so the random source is
//! never shared between tasks.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use feedload_domain::activity::{Comment, Like};
use feedload_domain::time::now;

use crate::reference_cache::ReferenceCache;

/// The fixed pool comment bodies are drawn from.
pub const COMMENT_TEMPLATES: [&str; 10] = [
    "Great post!",
    "I agree with this",
    "Interesting perspective",
    "Thanks for sharing",
    "I'm not sure I agree",
    "This changed my perspective",
    "Looking forward to more content like this",
    "Have you considered the alternative view?",
    "This reminds me of something I read recently",
    "I had a similar experience",
];

/// Produces activity events from cached references.
pub struct EventFactory<R = StdRng> {
    cache: Arc<ReferenceCache>,
    rng: R,
}

impl EventFactory {
    /// Create a factory seeded from the operating system.
    #[must_use]
    pub fn new(cache: Arc<ReferenceCache>) -> Self {
        Self::with_rng(cache, StdRng::from_os_rng())
    }
}

impl<R: Rng> EventFactory<R> {
    /// Create a factory driven by the given random source.
    pub fn with_rng(cache: Arc<ReferenceCache>, rng: R) -> Self {
        Self { cache, rng }
    }

    /// Build a new comment with a fresh id and a random body.
    pub fn make_comment(&mut self) -> Comment {
        let post_id = self.cache.random_post(&mut self.rng);
        let author = self.cache.random_user(&mut self.rng);
        let content = COMMENT_TEMPLATES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(COMMENT_TEMPLATES[0]);

        Comment::new(post_id, author, content, now())
    }

    /// Build a new like. No check is made for an earlier like of the same
    /// post by the same user.
    pub fn make_like(&mut self) -> Like {
        let post_id = self.cache.random_post(&mut self.rng);
        let author = self.cache.random_user(&mut self.rng);

        Like::new(post_id, author, now())
    }
}
