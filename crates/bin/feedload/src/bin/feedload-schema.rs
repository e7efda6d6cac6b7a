//! # feedload-schema — create the keyspace and tables
//!
//! Usage: `feedload-schema [SCRIPT.cql]`
//!
//! Runs every `;`-separated statement of the script on a session that is not
//! bound to a keyspace. Without a path, the bundled schema is used with its
//! tables created in the configured keyspace; a given script runs as written.

use anyhow::Context;

use feedload::config::Config;
use feedload::logging;
use feedload_adapter_scylla::schema;
use feedload_adapter_scylla::session::connect;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    logging::init(&config.logging.filter);

    let script = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading schema script {path}"))?,
        None => schema::bundled_schema(&config.cluster.keyspace),
    };

    let session = connect(&config.cluster, None)
        .await
        .context("connecting to the cluster")?;
    let executed = schema::apply(&session, &script)
        .await
        .context("applying schema")?;

    tracing::info!(statements = executed, "schema applied");
    Ok(())
}
