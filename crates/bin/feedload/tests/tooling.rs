//! Seeder and analyzer against the in-memory cluster.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use feedload_adapter_memory::InMemoryCluster;
use feedload_app::analyzer::{Analyzer, DEFAULT_SCAN_LIMIT};
use feedload_app::generator::{LoadConfig, LoadGenerator};
use feedload_app::seeder::{SeedConfig, SeedPlan, Seeder};
use feedload_domain::time::now;

fn small_plan() -> SeedPlan {
    let config = SeedConfig {
        users: 8,
        posts: 12,
        comments: 40,
        likes: 60,
    };
    SeedPlan::generate(&config, &mut StdRng::seed_from_u64(42), now()).unwrap()
}

#[tokio::test]
async fn should_seed_tables_and_metrics() {
    let cluster = Arc::new(InMemoryCluster::new());
    let plan = small_plan();

    let report = Seeder::new(Arc::clone(&cluster)).run(&plan).await.unwrap();

    assert_eq!(report.users, 8);
    assert_eq!(report.posts, 12);
    assert_eq!(report.comments, 40);
    cluster.inspect(|t| {
        assert_eq!(t.users.len(), 8);
        assert_eq!(t.posts.len(), 12);
        assert_eq!(t.comments_by_post.len(), 40);
        assert_eq!(t.comments_by_user.len(), 40);
        assert_eq!(t.post_likes.len(), report.likes);
        assert_eq!(t.total_comment_count(), 40);
        assert_eq!(t.total_like_count(), i64::try_from(report.likes).unwrap());
    });
}

#[tokio::test(start_paused = true)]
async fn should_generate_load_on_seeded_data() {
    let cluster = Arc::new(InMemoryCluster::new());
    Seeder::new(Arc::clone(&cluster))
        .run(&small_plan())
        .await
        .unwrap();

    let generator =
        LoadGenerator::initialize(LoadConfig::default(), &cluster, Arc::clone(&cluster))
            .await
            .unwrap();
    assert_eq!(generator.cache().user_count(), 8);
    assert_eq!(generator.cache().post_count(), 12);

    let summary = generator
        .start(Duration::from_secs(1))
        .wait(std::future::pending())
        .await;

    cluster.inspect(|t| {
        let seeded_and_generated = 40 + i64::try_from(summary.totals.comments).unwrap();
        assert_eq!(t.total_comment_count(), seeded_and_generated);
    });
}

#[tokio::test]
async fn should_analyze_seeded_data() {
    let cluster = Arc::new(InMemoryCluster::new());
    let plan = small_plan();
    let seeded = Seeder::new(Arc::clone(&cluster)).run(&plan).await.unwrap();

    let report = Analyzer::new(Arc::clone(&cluster), DEFAULT_SCAN_LIMIT)
        .analyze()
        .await
        .unwrap();

    assert_eq!(report.counts.users, 8);
    assert_eq!(report.counts.posts, 12);
    assert_eq!(report.counts.comments, 40);
    assert_eq!(report.counts.likes, i64::try_from(seeded.likes).unwrap());
    assert!(report.most_liked.len() <= 5);
    assert!(!report.most_active.is_empty());
    assert!(report.most_active.iter().all(|u| u.username != "Unknown"));
    assert_eq!(report.hourly.iter().sum::<u64>(), 40);

    let rendered = report.to_string();
    assert!(rendered.contains("=== MOST ACTIVE COMMENTERS ==="));
    assert!(rendered.contains("Users: 8"));
}
