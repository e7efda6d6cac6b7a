//! # feedload-analyze — report on written data
//!
//! Prints record counts, rankings and hourly comment activity to stdout.

use anyhow::Context;

use feedload::config::Config;
use feedload::logging;
use feedload_adapter_scylla::CqlSession;
use feedload_app::analyzer::Analyzer;
use feedload_app::ports::WriteSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    logging::init(&config.logging.filter);

    let session = CqlSession::open(&config.cluster)
        .await
        .context("opening session")?;
    let outcome = Analyzer::new(session.clone(), config.analysis.scan_limit)
        .analyze()
        .await;
    session.close().await;

    let report = outcome.context("analyzing")?;
    println!("{report}");
    Ok(())
}
