//! [`AnalyticsSource`] — the analyzer's reads.

use scylla::value::{CqlTimestamp, Counter};
use uuid::Uuid;

use feedload_app::ports::AnalyticsSource;
use feedload_domain::error::FeedLoadError;
use feedload_domain::fixture::PostSummary;
use feedload_domain::id::{PostId, UserId};
use feedload_domain::projection::PostMetrics;
use feedload_domain::time::{Timestamp, from_millis};

use crate::error::ScyllaError;
use crate::session::{CqlSession, collect_rows};
use crate::statements::{COUNT_POSTS, COUNT_USERS, limit as cql_limit};

type MetricsRow = (Uuid, Option<Counter>, Option<Counter>);

impl CqlSession {
    async fn count(&self, cql: &str) -> Result<u64, FeedLoadError> {
        let result = self
            .inner
            .session
            .query_unpaged(cql, ())
            .await
            .map_err(ScyllaError::from)?;
        let rows: Vec<(i64,)> = collect_rows(result)?;
        Ok(rows
            .first()
            .map_or(0, |(count,)| u64::try_from(*count).unwrap_or(0)))
    }
}

impl AnalyticsSource for CqlSession {
    async fn count_users(&self) -> Result<u64, FeedLoadError> {
        self.count(COUNT_USERS).await
    }

    async fn count_posts(&self) -> Result<u64, FeedLoadError> {
        self.count(COUNT_POSTS).await
    }

    async fn post_metrics(&self, limit: usize) -> Result<Vec<PostMetrics>, FeedLoadError> {
        let statements = self.inner.analytics_statements().await?;
        let result = self
            .execute(&statements.select_metrics, (cql_limit(limit),))
            .await?;
        let rows: Vec<MetricsRow> = collect_rows(result)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, comments, likes)| PostMetrics {
                post_id: PostId::from_uuid(post_id),
                comment_count: comments.map_or(0, |c| c.0),
                like_count: likes.map_or(0, |c| c.0),
            })
            .collect())
    }

    async fn post_summary(&self, post_id: PostId) -> Result<Option<PostSummary>, FeedLoadError> {
        let statements = self.inner.analytics_statements().await?;
        let result = self
            .execute(&statements.select_post_summary, (post_id.as_uuid(),))
            .await?;
        let rows: Vec<(Option<Uuid>, Option<String>)> = collect_rows(result)?;

        // A post without an author cannot be attributed; treat it as missing.
        Ok(rows
            .into_iter()
            .next()
            .and_then(|(user_id, content)| {
                user_id.map(|id| PostSummary {
                    user_id: UserId::from_uuid(id),
                    content,
                })
            }))
    }

    async fn username(&self, user_id: UserId) -> Result<Option<String>, FeedLoadError> {
        let statements = self.inner.analytics_statements().await?;
        let result = self
            .execute(&statements.select_username, (user_id.as_uuid(),))
            .await?;
        let rows: Vec<(Option<String>,)> = collect_rows(result)?;
        Ok(rows.into_iter().next().and_then(|(name,)| name))
    }

    async fn comment_activity(
        &self,
        limit: usize,
    ) -> Result<Vec<(UserId, Timestamp)>, FeedLoadError> {
        let statements = self.inner.analytics_statements().await?;
        let result = self
            .execute(&statements.select_comment_activity, (cql_limit(limit),))
            .await?;
        let rows: Vec<(Uuid, CqlTimestamp)> = collect_rows(result)?;

        rows.into_iter()
            .map(|(user_id, created_at)| {
                let ts = from_millis(created_at.0)
                    .ok_or(ScyllaError::InvalidTimestamp(created_at.0))?;
                Ok::<_, FeedLoadError>((UserId::from_uuid(user_id), ts))
            })
            .collect()
    }
}
