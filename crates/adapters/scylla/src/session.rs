//! Session lifecycle and bounded fire-and-forget submission.

use std::sync::Arc;

use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::deserialize::row::DeserializeRow;
use scylla::policies::load_balancing::DefaultPolicy;
use scylla::response::query_result::QueryResult;
use scylla::serialize::row::SerializeRow;
use scylla::statement::batch::{Batch, BatchType};
use scylla::statement::prepared::PreparedStatement;
use tokio::sync::OnceCell;

use feedload_app::ports::WriteSession;
use feedload_domain::error::FeedLoadError;
use feedload_domain::projection::Write;

use crate::config::ScyllaConfig;
use crate::error::ScyllaError;
use crate::in_flight::InFlight;
use crate::statements::{AnalyticsStatements, SeedStatements, Statements, mutation_values};

/// Build a session to the configured contact point, optionally bound to a
/// keyspace, routing to the local datacenter first.
///
/// # Errors
///
/// Returns [`ScyllaError::Connect`] on network, authentication or unknown
/// keyspace errors.
pub async fn connect(config: &ScyllaConfig, keyspace: Option<&str>) -> Result<Session, ScyllaError> {
    let policy = DefaultPolicy::builder()
        .prefer_datacenter(config.local_datacenter.clone())
        .token_aware(true)
        .build();
    let profile = ExecutionProfile::builder()
        .load_balancing_policy(policy)
        .build();

    let mut builder = SessionBuilder::new()
        .known_node(&config.contact_point)
        .default_execution_profile_handle(profile.into_handle());
    if let Some(keyspace) = keyspace {
        builder = builder.use_keyspace(keyspace, false);
    }

    let session = builder.build().await?;
    tracing::info!(
        contact_point = %config.contact_point,
        datacenter = %config.local_datacenter,
        keyspace = keyspace.unwrap_or("-"),
        "connected to cluster"
    );
    Ok(session)
}

pub(crate) struct Inner {
    pub(crate) session: Session,
    pub(crate) statements: Statements,
    seed: OnceCell<SeedStatements>,
    analytics: OnceCell<AnalyticsStatements>,
    in_flight: InFlight,
}

impl Inner {
    pub(crate) async fn seed_statements(&self) -> Result<&SeedStatements, ScyllaError> {
        self.seed
            .get_or_try_init(|| SeedStatements::prepare(&self.session))
            .await
    }

    pub(crate) async fn analytics_statements(&self) -> Result<&AnalyticsStatements, ScyllaError> {
        self.analytics
            .get_or_try_init(|| AnalyticsStatements::prepare(&self.session))
            .await
    }

    pub(crate) async fn run(&self, write: &Write) -> Result<(), ScyllaError> {
        match write {
            Write::LoggedBatch(mutations) => {
                let mut batch = Batch::new(BatchType::Logged);
                let mut values = Vec::with_capacity(mutations.len());
                for mutation in mutations {
                    batch.append_statement(self.statements.for_mutation(mutation).clone());
                    values.push(mutation_values(mutation));
                }
                self.session.batch(&batch, values).await?;
            }
            Write::Increment { post_id, counter } => {
                self.session
                    .execute_unpaged(self.statements.for_counter(*counter), (post_id.as_uuid(),))
                    .await?;
            }
        }
        Ok(())
    }
}

/// A keyspace-bound session with the load statements prepared.
///
/// Cloning is cheap; clones share the session, the prepared statements and
/// the in-flight bound.
#[derive(Clone)]
pub struct CqlSession {
    pub(crate) inner: Arc<Inner>,
}

impl CqlSession {
    /// Connect to `config.keyspace` and prepare the load statements.
    ///
    /// Seeder and analyzer statements are prepared the first time they are
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedLoadError::ConnectFailed`] when the session cannot be
    /// established and [`FeedLoadError::PrepareFailed`] when a statement is
    /// rejected.
    pub async fn open(config: &ScyllaConfig) -> Result<Self, FeedLoadError> {
        let session = connect(config, Some(&config.keyspace)).await?;
        let statements = Statements::prepare(&session).await?;
        tracing::debug!("prepared statements");

        Ok(Self {
            inner: Arc::new(Inner {
                session,
                statements,
                seed: OnceCell::new(),
                analytics: OnceCell::new(),
                in_flight: InFlight::new(config.max_in_flight),
            }),
        })
    }

    /// Run a prepared statement and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns [`FeedLoadError::QueryFailed`] when the cluster rejects or
    /// fails the statement.
    pub async fn execute(
        &self,
        statement: &PreparedStatement,
        values: impl SerializeRow,
    ) -> Result<QueryResult, FeedLoadError> {
        Ok(self
            .inner
            .session
            .execute_unpaged(statement, values)
            .await
            .map_err(ScyllaError::from)?)
    }

    /// Whether [`close`](WriteSession::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.in_flight.is_closed()
    }
}

impl WriteSession for CqlSession {
    fn execute_async(&self, write: Write) -> Result<(), FeedLoadError> {
        let permit = self.inner.in_flight.try_admit()?;

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(err) = inner.run(&write).await {
                tracing::error!(kind = write.kind(), error = %err, "write failed");
            }
        });
        Ok(())
    }

    async fn close(&self) {
        if let Some(pending) = self.inner.in_flight.close() {
            tracing::info!(pending, "session closed, in-flight writes left to finish");
        }
    }
}

/// Decode every row of `result` as `T`.
pub(crate) fn collect_rows<T>(result: QueryResult) -> Result<Vec<T>, ScyllaError>
where
    T: for<'frame, 'metadata> DeserializeRow<'frame, 'metadata>,
{
    let rows = result.into_rows_result().map_err(ScyllaError::decode)?;
    rows.rows::<T>()
        .map_err(ScyllaError::decode)?
        .collect::<Result<Vec<T>, _>>()
        .map_err(ScyllaError::decode)
}
