//! End-to-end load runs against the in-memory cluster.
//!
//! Each test wires the real generator, scheduler, factories and pipeline to
//! [`InMemoryCluster`] and drives it on tokio's paused clock, so a run of
//! several seconds completes instantly and tick counts are exact.

use std::sync::Arc;
use std::time::Duration;

use feedload::cli::parse_duration_arg;
use feedload_adapter_memory::InMemoryCluster;
use feedload_app::generator::{LoadConfig, LoadGenerator, Phase, StopReason};
use feedload_app::scheduler::ShutdownOutcome;
use feedload_domain::error::FeedLoadError;
use feedload_domain::id::{PostId, UserId};
use feedload_domain::user::UserRef;

/// A cluster holding `users` users and `posts` posts.
fn seeded(users: usize, posts: usize) -> Arc<InMemoryCluster> {
    let cluster = InMemoryCluster::new();
    populate(&cluster, users, posts);
    Arc::new(cluster)
}

fn populate(cluster: &InMemoryCluster, users: usize, posts: usize) {
    let mut authors = Vec::new();
    for i in 0..users {
        let user = UserRef::new(
            UserId::new(),
            format!("user{i}"),
            format!("https://example.com/avatars/{i}.jpg"),
        );
        cluster.add_user(&user);
        authors.push(user.user_id);
    }
    for i in 0..posts {
        let author = authors.get(i % authors.len().max(1)).copied().unwrap_or_default();
        cluster.add_post(PostId::new(), author, "post body");
    }
}

fn rates(comments: u32, likes: u32) -> LoadConfig {
    LoadConfig {
        comments_per_second: comments,
        likes_per_second: likes,
        ..LoadConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Steady state
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_hit_configured_rates_and_keep_counters_consistent() {
    let cluster = seeded(10, 5);
    let generator = LoadGenerator::initialize(rates(10, 20), &cluster, Arc::clone(&cluster))
        .await
        .unwrap();

    let summary = generator
        .start(Duration::from_secs(2))
        .wait(std::future::pending())
        .await;

    assert_eq!(summary.reason, StopReason::Elapsed);
    assert!((18..=22).contains(&summary.totals.comments), "{summary:?}");
    assert!((38..=42).contains(&summary.totals.likes), "{summary:?}");
    cluster.inspect(|t| {
        let comment_count = t.total_comment_count();
        let counted = i64::try_from(summary.totals.comments).unwrap();
        assert!((comment_count - counted).abs() <= 2);
        assert_eq!(t.comments_by_post.len(), t.comments_by_user.len());
    });
    assert!(cluster.is_closed());
}

#[tokio::test(start_paused = true)]
async fn should_keep_projections_in_step_for_every_comment() {
    let cluster = seeded(3, 3);
    let generator = LoadGenerator::initialize(rates(50, 1), &cluster, Arc::clone(&cluster))
        .await
        .unwrap();

    generator
        .start(Duration::from_secs(1))
        .wait(std::future::pending())
        .await;

    cluster.inspect(|t| {
        for row in t.comments_by_post.values() {
            let mirror = &t.comments_by_user[&(row.user_id, row.comment_id)];
            assert_eq!(mirror.post_id, row.post_id);
            assert_eq!(mirror.content, row.content);
            assert_eq!(mirror.created_at, row.created_at);
            let author = &t.users[&row.user_id];
            assert_eq!(row.username, author.username);
            assert_eq!(row.user_profile_pic, author.profile_picture_url);
        }
    });
}

#[tokio::test(start_paused = true)]
async fn should_collapse_repeated_likes_on_single_post() {
    let cluster = seeded(1, 1);
    let generator = LoadGenerator::initialize(rates(5, 5), &cluster, Arc::clone(&cluster))
        .await
        .unwrap();
    let post_id = generator.cache().random_post(&mut rand::rng());

    let summary = generator
        .start(Duration::from_secs(1))
        .wait(std::future::pending())
        .await;

    assert!((4..=6).contains(&summary.totals.comments), "{summary:?}");
    assert!((4..=6).contains(&summary.totals.likes), "{summary:?}");
    cluster.inspect(|t| {
        assert!((4..=6).contains(&t.comments_by_post.len()));
        assert!(t.comments_by_post.values().all(|c| c.post_id == post_id));
        assert_eq!(t.post_likes.len(), 1);
        assert_eq!(t.post_likes_by_user.len(), 1);
        let like_count = u64::try_from(t.post_metrics[&post_id].like_count).unwrap();
        assert_eq!(like_count, summary.totals.likes);
    });
}

// ---------------------------------------------------------------------------
// Startup failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_refuse_to_start_without_users() {
    let cluster = seeded(0, 0);
    cluster.add_post(PostId::new(), UserId::new(), "orphan");

    let result =
        LoadGenerator::initialize(LoadConfig::default(), &cluster, Arc::clone(&cluster)).await;

    let Err(err) = result else {
        panic!("startup should fail");
    };
    assert!(matches!(err, FeedLoadError::NoFixtureData(_)));
    assert!(err.is_startup_fatal());
    assert!(cluster.is_closed());
    cluster.inspect(|t| {
        assert!(t.comments_by_post.is_empty());
        assert!(t.post_likes.is_empty());
        assert!(t.post_metrics.is_empty());
    });
}

// ---------------------------------------------------------------------------
// Duration and interruption
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_run_for_default_duration_when_argument_is_invalid() {
    let duration = parse_duration_arg(Some("abc"));
    assert_eq!(duration, Duration::from_secs(300));

    let cluster = seeded(2, 2);
    let generator = LoadGenerator::initialize(rates(1, 1), &cluster, Arc::clone(&cluster))
        .await
        .unwrap();

    let summary = generator.start(duration).wait(std::future::pending()).await;

    assert_eq!(summary.reason, StopReason::Elapsed);
    assert!(summary.elapsed >= Duration::from_secs(300));
    assert!(summary.elapsed < Duration::from_secs(301));
    assert!((299..=301).contains(&summary.totals.comments));
}

#[tokio::test(start_paused = true)]
async fn should_shut_down_promptly_when_interrupted() {
    let cluster = seeded(5, 5);
    let generator =
        LoadGenerator::initialize(LoadConfig::default(), &cluster, Arc::clone(&cluster))
            .await
            .unwrap();
    let running = generator.start(Duration::from_secs(60));
    let phase = running.phase();

    let summary = running
        .wait(tokio::time::sleep(Duration::from_secs(1)))
        .await;

    assert_eq!(summary.reason, StopReason::Interrupted);
    assert_eq!(summary.shutdown, ShutdownOutcome::Drained);
    assert!(summary.elapsed < Duration::from_secs(6));
    assert_eq!(*phase.borrow(), Phase::Closed);
    assert!(cluster.is_closed());

    // Nothing is written once the run has been reported.
    let after = cluster.inspect(|t| t.comments_by_post.len());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(cluster.inspect(|t| t.comments_by_post.len()), after);
}

// ---------------------------------------------------------------------------
// Failure injection
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_skip_failed_comments_and_keep_firing() {
    let cluster = InMemoryCluster::new().fail_every_nth_comment(10);
    populate(&cluster, 4, 4);
    let cluster = Arc::new(cluster);
    let generator = LoadGenerator::initialize(rates(20, 20), &cluster, Arc::clone(&cluster))
        .await
        .unwrap();

    let summary = generator
        .start(Duration::from_secs(5))
        .wait(std::future::pending())
        .await;

    let fired = cluster.comment_attempts();
    assert!(fired >= 95, "comment stream stopped after {fired} ticks");
    assert_eq!(summary.totals.comments, fired - fired / 10);
    let expected = fired as f64 * 0.9;
    assert!((summary.totals.comments as f64 - expected).abs() <= 1.0);
    assert!((98..=102).contains(&summary.totals.likes), "{summary:?}");
}
