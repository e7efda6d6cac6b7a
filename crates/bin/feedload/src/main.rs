//! # feedload — steady-rate write load generator
//!
//! Usage: `feedload [DURATION_SECS]`
//!
//! Opens a session, loads the reference users and posts, then submits
//! comments and likes at the configured rates until the duration elapses or
//! the process is interrupted. Exits non-zero only when startup fails.

use std::process::ExitCode;
use std::time::Duration;

use feedload::cli::parse_duration_arg;
use feedload::config::Config;
use feedload::logging::{self, error_chain};
use feedload::signal::shutdown_signal;
use feedload_adapter_scylla::CqlSession;
use feedload_app::generator::{LoadGenerator, RunSummary};
use feedload_domain::error::FeedLoadError;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("feedload: {}", error_chain(&err));
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging.filter);

    let duration = parse_duration_arg(std::env::args().nth(1).as_deref());

    match run(&config, duration).await {
        Ok(summary) => {
            tracing::info!(
                reason = ?summary.reason,
                shutdown = ?summary.shutdown,
                elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
                "load generation finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(
                fatal = err.is_startup_fatal(),
                "startup failed: {}",
                error_chain(&err)
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, duration: Duration) -> Result<RunSummary, FeedLoadError> {
    let session = CqlSession::open(&config.cluster).await?;
    let generator = LoadGenerator::initialize(config.load_config(), &session, session.clone()).await?;

    let cache = generator.cache();
    tracing::info!(
        users = cache.user_count(),
        posts = cache.post_count(),
        "loaded reference data"
    );

    Ok(generator.start(duration).wait(shutdown_signal()).await)
}
