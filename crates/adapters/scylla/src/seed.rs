//! [`SeedSink`] — awaited inserts for the seeder.

use feedload_app::ports::SeedSink;
use feedload_domain::error::FeedLoadError;
use feedload_domain::fixture::{PostRecord, UserProfile};
use feedload_domain::projection::Write;

use crate::error::ScyllaError;
use crate::session::CqlSession;
use crate::statements::{post_values, user_values};

impl SeedSink for CqlSession {
    async fn insert_user(&self, user: &UserProfile) -> Result<(), FeedLoadError> {
        let statements = self.inner.seed_statements().await?;
        self.execute(&statements.insert_user, user_values(user)).await?;
        Ok(())
    }

    async fn insert_post(&self, post: &PostRecord) -> Result<(), FeedLoadError> {
        let statements = self.inner.seed_statements().await?;
        self.execute(&statements.insert_post, post_values(post)).await?;
        Ok(())
    }

    async fn apply(&self, write: Write) -> Result<(), FeedLoadError> {
        if self.is_closed() {
            return Err(ScyllaError::Closed.into());
        }
        self.inner.run(&write).await?;
        Ok(())
    }
}
