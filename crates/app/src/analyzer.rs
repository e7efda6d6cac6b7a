//! Analyzer — summarises what the seeder and the load generator wrote.
//!
//! Reads go through [`AnalyticsSource`]. Aggregation is done in memory over
//! bounded scans and is kept in pure functions so it can be tested without a
//! cluster.

use std::collections::HashMap;
use std::fmt;

use chrono::Timelike;

use feedload_domain::error::FeedLoadError;
use feedload_domain::id::{PostId, UserId};
use feedload_domain::projection::PostMetrics;
use feedload_domain::time::Timestamp;

use crate::ports::AnalyticsSource;

/// Entries shown in each ranking.
pub const TOP_N: usize = 5;

/// Maximum width of an hourly activity bar.
pub const BAR_CAP: usize = 50;

/// Post content is cut after this many characters.
pub const CONTENT_PREVIEW: usize = 50;

/// Default number of rows read by each scan.
pub const DEFAULT_SCAN_LIMIT: usize = 1000;

const UNKNOWN_USER: &str = "Unknown";

/// Row counts. `comments` and `likes` are sums over `post_metrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub users: u64,
    pub posts: u64,
    pub comments: i64,
    pub likes: i64,
}

/// A ranked post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEntry {
    pub author: String,
    pub count: i64,
    pub preview: String,
}

/// A ranked user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub username: String,
    pub count: u64,
}

/// The full analysis, rendered with [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub counts: RecordCounts,
    pub most_liked: Vec<PostEntry>,
    pub most_active: Vec<UserEntry>,
    pub most_commented: Vec<PostEntry>,
    /// Comments per hour of day, UTC.
    pub hourly: [u64; 24],
}

/// Sum the comment and like counters.
#[must_use]
pub fn sum_metrics(metrics: &[PostMetrics]) -> (i64, i64) {
    metrics.iter().fold((0, 0), |(comments, likes), m| {
        (comments + m.comment_count, likes + m.like_count)
    })
}

/// The `n` posts with the highest value of `key`, highest first.
///
/// Ties are broken by post id so the order is stable.
#[must_use]
pub fn top_posts(
    metrics: &[PostMetrics],
    key: impl Fn(&PostMetrics) -> i64,
    n: usize,
) -> Vec<(PostId, i64)> {
    let mut ranked: Vec<(PostId, i64)> = metrics.iter().map(|m| (m.post_id, key(m))).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// The `n` users with the most comments in `activity`, most active first.
#[must_use]
pub fn top_commenters(activity: &[(UserId, Timestamp)], n: usize) -> Vec<(UserId, u64)> {
    let mut per_user: HashMap<UserId, u64> = HashMap::new();
    for (user_id, _) in activity {
        *per_user.entry(*user_id).or_default() += 1;
    }
    let mut ranked: Vec<(UserId, u64)> = per_user.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Comment counts bucketed by UTC hour of day.
#[must_use]
pub fn hourly_histogram(activity: &[(UserId, Timestamp)]) -> [u64; 24] {
    let mut hours = [0u64; 24];
    for (_, created_at) in activity {
        hours[created_at.hour() as usize] += 1;
    }
    hours
}

/// First `max` characters of `text`, followed by `...` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `0` → `12AM`, `13` → `1PM`.
fn hour_label(hour: usize) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}{suffix}")
}

/// Runs the queries behind an [`AnalysisReport`].
pub struct Analyzer<A> {
    source: A,
    scan_limit: usize,
}

impl<A: AnalyticsSource> Analyzer<A> {
    /// Create an analyzer reading at most `scan_limit` rows per scan.
    pub fn new(source: A, scan_limit: usize) -> Self {
        Self { source, scan_limit }
    }

    /// Run every query and build the report.
    ///
    /// # Errors
    ///
    /// Returns the first failed read.
    pub async fn analyze(&self) -> Result<AnalysisReport, FeedLoadError> {
        let users = self.source.count_users().await?;
        let posts = self.source.count_posts().await?;
        let metrics = self.source.post_metrics(self.scan_limit).await?;
        let (comments, likes) = sum_metrics(&metrics);
        tracing::debug!(rows = metrics.len(), "scanned post metrics");

        let most_liked = self
            .describe_posts(top_posts(&metrics, |m| m.like_count, TOP_N))
            .await?;
        let most_commented = self
            .describe_posts(top_posts(&metrics, |m| m.comment_count, TOP_N))
            .await?;

        let activity = self.source.comment_activity(self.scan_limit).await?;
        tracing::debug!(rows = activity.len(), "scanned comment activity");
        let mut most_active = Vec::with_capacity(TOP_N);
        for (user_id, count) in top_commenters(&activity, TOP_N) {
            most_active.push(UserEntry {
                username: self.username_or_unknown(user_id).await?,
                count,
            });
        }

        Ok(AnalysisReport {
            counts: RecordCounts {
                users,
                posts,
                comments,
                likes,
            },
            most_liked,
            most_active,
            most_commented,
            hourly: hourly_histogram(&activity),
        })
    }

    // Posts that no longer exist are left out of the ranking.
    async fn describe_posts(
        &self,
        ranked: Vec<(PostId, i64)>,
    ) -> Result<Vec<PostEntry>, FeedLoadError> {
        let mut entries = Vec::with_capacity(ranked.len());
        for (post_id, count) in ranked {
            let Some(summary) = self.source.post_summary(post_id).await? else {
                continue;
            };
            entries.push(PostEntry {
                author: self.username_or_unknown(summary.user_id).await?,
                count,
                preview: summary
                    .content
                    .as_deref()
                    .map_or_else(String::new, |c| truncate(c, CONTENT_PREVIEW)),
            });
        }
        Ok(entries)
    }

    async fn username_or_unknown(&self, user_id: UserId) -> Result<String, FeedLoadError> {
        Ok(self
            .source
            .username(user_id)
            .await?
            .unwrap_or_else(|| UNKNOWN_USER.to_string()))
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*** SOCIAL MEDIA DATA ANALYSIS ***")?;
        writeln!(f)?;

        writeln!(f, "=== RECORD COUNTS ===")?;
        writeln!(f, "Users: {}", self.counts.users)?;
        writeln!(f, "Posts: {}", self.counts.posts)?;
        writeln!(f, "Comments: {}", self.counts.comments)?;
        writeln!(f, "Likes: {}", self.counts.likes)?;
        writeln!(f)?;

        writeln!(f, "=== MOST LIKED POSTS ===")?;
        for entry in &self.most_liked {
            writeln!(f, "Post by {} has {} likes", entry.author, entry.count)?;
            writeln!(f, "Content: {}", entry.preview)?;
            writeln!(f)?;
        }

        writeln!(f, "=== MOST ACTIVE COMMENTERS ===")?;
        for entry in &self.most_active {
            writeln!(f, "User {} made {} comments", entry.username, entry.count)?;
        }
        writeln!(f)?;

        writeln!(f, "=== MOST COMMENTED POSTS ===")?;
        for entry in &self.most_commented {
            writeln!(f, "Post by {} has {} comments", entry.author, entry.count)?;
            writeln!(f, "Content: {}", entry.preview)?;
            writeln!(f)?;
        }

        writeln!(f, "=== COMMENT ACTIVITY BY HOUR ===")?;
        for (hour, count) in self.hourly.iter().enumerate() {
            let width = usize::try_from(*count).unwrap_or(usize::MAX).min(BAR_CAP);
            writeln!(
                f,
                "{}: {} ({count} comments)",
                hour_label(hour),
                "#".repeat(width)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use feedload_domain::fixture::PostSummary;

    fn at_hour(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 15, 0).unwrap()
    }

    fn metrics(comment_count: i64, like_count: i64) -> PostMetrics {
        PostMetrics {
            post_id: PostId::new(),
            comment_count,
            like_count,
        }
    }

    #[test]
    fn should_sum_counters() {
        let rows = [metrics(1, 2), metrics(3, 4), metrics(0, 10)];
        assert_eq!(sum_metrics(&rows), (4, 16));
        assert_eq!(sum_metrics(&[]), (0, 0));
    }

    #[test]
    fn should_rank_posts_by_key() {
        let rows: Vec<_> = (0..8).map(|i| metrics(i, 10 - i)).collect();

        let liked = top_posts(&rows, |m| m.like_count, TOP_N);
        assert_eq!(liked.len(), 5);
        assert_eq!(liked[0], (rows[0].post_id, 10));
        assert!(liked.windows(2).all(|w| w[0].1 >= w[1].1));

        let commented = top_posts(&rows, |m| m.comment_count, 2);
        assert_eq!(commented, vec![(rows[7].post_id, 7), (rows[6].post_id, 6)]);
    }

    #[test]
    fn should_rank_commenters_by_activity() {
        let alice = UserId::new();
        let bob = UserId::new();
        let activity = vec![
            (alice, at_hour(1)),
            (bob, at_hour(2)),
            (alice, at_hour(3)),
            (alice, at_hour(3)),
        ];

        assert_eq!(top_commenters(&activity, 5), vec![(alice, 3), (bob, 1)]);
        assert_eq!(top_commenters(&activity, 1), vec![(alice, 3)]);
    }

    #[test]
    fn should_bucket_activity_by_utc_hour() {
        let user = UserId::new();
        let activity = vec![(user, at_hour(0)), (user, at_hour(23)), (user, at_hour(23))];

        let hours = hourly_histogram(&activity);

        assert_eq!(hours[0], 1);
        assert_eq!(hours[23], 2);
        assert_eq!(hours.iter().sum::<u64>(), 3);
    }

    #[test]
    fn should_truncate_long_content() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééééé", 2), "éé...");
        let exact = "x".repeat(50);
        assert_eq!(truncate(&exact, 50), exact);
    }

    #[test]
    fn should_label_hours_on_twelve_hour_clock() {
        assert_eq!(hour_label(0), "12AM");
        assert_eq!(hour_label(1), "1AM");
        assert_eq!(hour_label(12), "12PM");
        assert_eq!(hour_label(23), "11PM");
    }

    struct StaticSource {
        author: UserId,
        ghost: UserId,
        metrics: Vec<PostMetrics>,
    }

    impl AnalyticsSource for StaticSource {
        fn count_users(&self) -> impl Future<Output = Result<u64, FeedLoadError>> + Send {
            async { Ok(1) }
        }

        fn count_posts(&self) -> impl Future<Output = Result<u64, FeedLoadError>> + Send {
            let posts = self.metrics.len() as u64;
            async move { Ok(posts) }
        }

        fn post_metrics(
            &self,
            limit: usize,
        ) -> impl Future<Output = Result<Vec<PostMetrics>, FeedLoadError>> + Send {
            let rows = self.metrics.iter().take(limit).copied().collect();
            async { Ok(rows) }
        }

        fn post_summary(
            &self,
            _post_id: PostId,
        ) -> impl Future<Output = Result<Option<PostSummary>, FeedLoadError>> + Send {
            let summary = PostSummary {
                user_id: self.author,
                content: Some("y".repeat(80)),
            };
            async { Ok(Some(summary)) }
        }

        fn username(
            &self,
            user_id: UserId,
        ) -> impl Future<Output = Result<Option<String>, FeedLoadError>> + Send {
            let name = (user_id == self.author).then(|| "alice".to_string());
            async { Ok(name) }
        }

        fn comment_activity(
            &self,
            _limit: usize,
        ) -> impl Future<Output = Result<Vec<(UserId, Timestamp)>, FeedLoadError>> + Send {
            let rows = vec![
                (self.author, at_hour(9)),
                (self.ghost, at_hour(9)),
                (self.ghost, at_hour(10)),
            ];
            async { Ok(rows) }
        }
    }

    #[tokio::test]
    async fn should_build_report_from_source() {
        let source = StaticSource {
            author: UserId::new(),
            ghost: UserId::new(),
            metrics: vec![metrics(2, 7), metrics(5, 1)],
        };
        let analyzer = Analyzer::new(source, DEFAULT_SCAN_LIMIT);

        let report = analyzer.analyze().await.unwrap();

        assert_eq!(
            report.counts,
            RecordCounts {
                users: 1,
                posts: 2,
                comments: 7,
                likes: 8,
            }
        );
        assert_eq!(report.most_liked[0].count, 7);
        assert_eq!(report.most_liked[0].author, "alice");
        assert_eq!(report.most_liked[0].preview, format!("{}...", "y".repeat(50)));
        assert_eq!(report.most_commented[0].count, 5);
        assert_eq!(
            report.most_active,
            vec![
                UserEntry {
                    username: "Unknown".to_string(),
                    count: 2,
                },
                UserEntry {
                    username: "alice".to_string(),
                    count: 1,
                },
            ]
        );
        assert_eq!(report.hourly[9], 2);
        assert_eq!(report.hourly[10], 1);
    }

    #[test]
    fn should_render_capped_bars() {
        let mut hourly = [0; 24];
        hourly[14] = 120;
        let report = AnalysisReport {
            counts: RecordCounts::default(),
            most_liked: Vec::new(),
            most_active: Vec::new(),
            most_commented: Vec::new(),
            hourly,
        };

        let rendered = report.to_string();

        assert!(rendered.contains(&format!("2PM: {} (120 comments)", "#".repeat(50))));
        assert!(rendered.contains("12AM:  (0 comments)"));
        assert!(rendered.contains("=== RECORD COUNTS ==="));
    }
}
