//! # feedload-seed — write synthetic fixtures
//!
//! Generates users, posts, comments and likes with the volumes of the
//! `[seed]` configuration section and writes them to the configured keyspace.

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;

use feedload::config::Config;
use feedload::logging;
use feedload_adapter_scylla::CqlSession;
use feedload_app::ports::WriteSession;
use feedload_app::seeder::{SeedPlan, Seeder};
use feedload_domain::time::now;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    logging::init(&config.logging.filter);

    let mut rng = StdRng::from_os_rng();
    let plan = SeedPlan::generate(&config.seed_config(), &mut rng, now())
        .context("generating seed data")?;

    let session = CqlSession::open(&config.cluster)
        .await
        .context("opening session")?;
    let outcome = Seeder::new(session.clone()).run(&plan).await;
    session.close().await;

    let report = outcome.context("seeding")?;
    tracing::info!(
        users = report.users,
        posts = report.posts,
        comments = report.comments,
        likes = report.likes,
        "seeding completed"
    );
    Ok(())
}
