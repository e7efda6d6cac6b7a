//! [`FixtureSource`] over the `users` and `posts` tables.

use uuid::Uuid;

use feedload_app::ports::FixtureSource;
use feedload_domain::error::FeedLoadError;
use feedload_domain::id::{PostId, UserId};
use feedload_domain::user::UserRef;

use crate::session::{CqlSession, collect_rows};
use crate::statements::limit as cql_limit;

type UserRow = (Uuid, Option<String>, Option<String>);

impl FixtureSource for CqlSession {
    async fn load_users(&self, limit: usize) -> Result<Vec<UserRef>, FeedLoadError> {
        let statements = &self.inner.statements;
        let result = self.execute(&statements.select_users, (cql_limit(limit),)).await?;
        let rows: Vec<UserRow> = collect_rows(result)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, username, profile_picture_url)| UserRef {
                user_id: UserId::from_uuid(user_id),
                username,
                profile_picture_url,
            })
            .collect())
    }

    async fn load_posts(&self, limit: usize) -> Result<Vec<PostId>, FeedLoadError> {
        let statements = &self.inner.statements;
        let result = self.execute(&statements.select_posts, (cql_limit(limit),)).await?;
        let rows: Vec<(Uuid,)> = collect_rows(result)?;

        Ok(rows.into_iter().map(|(id,)| PostId::from_uuid(id)).collect())
    }
}
