//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `feedload.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use feedload_adapter_scylla::ScyllaConfig;
use feedload_adapter_scylla::schema::is_valid_keyspace;
use feedload_app::analyzer::DEFAULT_SCAN_LIMIT;
use feedload_app::generator::LoadConfig;
use feedload_app::seeder::SeedConfig;
use feedload_domain::error::ValidationError;

/// Default location of the configuration file.
pub const CONFIG_FILE: &str = "feedload.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cluster connection settings.
    pub cluster: ScyllaConfig,
    /// Write load settings.
    pub load: LoadSettings,
    /// Seeder volumes.
    pub seed: SeedSettings,
    /// Analyzer settings.
    pub analysis: AnalysisSettings,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Rates and timings of the load generator.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    /// Comments submitted per second.
    pub comments_per_second: u32,
    /// Likes submitted per second.
    pub likes_per_second: u32,
    /// Maximum users and posts loaded at startup.
    pub reference_limit: usize,
    /// Seconds between progress lines.
    pub report_interval_secs: u64,
    /// Seconds granted to running ticks at shutdown.
    pub drain_timeout_secs: u64,
}

/// Volumes written by `feedload-seed`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub likes: usize,
}

/// Settings of `feedload-analyze`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Rows read by each scan.
    pub scan_limit: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `feedload.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("FEEDLOAD_CONTACT_POINT") {
            self.cluster.contact_point = val;
        }
        if let Some(val) = var("FEEDLOAD_DATACENTER") {
            self.cluster.local_datacenter = val;
        }
        if let Some(val) = var("FEEDLOAD_KEYSPACE") {
            self.cluster.keyspace = val;
        }
        if let Some(rate) = var("FEEDLOAD_COMMENT_RATE").and_then(|v| v.parse().ok()) {
            self.load.comments_per_second = rate;
        }
        if let Some(rate) = var("FEEDLOAD_LIKE_RATE").and_then(|v| v.parse().ok()) {
            self.load.likes_per_second = rate;
        }
        if let Some(val) = var("FEEDLOAD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster.contact_point.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "contact_point",
            }
            .into());
        }
        if !is_valid_keyspace(&self.cluster.keyspace) {
            return Err(ValidationError::InvalidName { field: "keyspace" }.into());
        }
        if self.cluster.max_in_flight == 0 {
            return Err(ValidationError::ZeroLimit {
                field: "max_in_flight",
            }
            .into());
        }
        self.load_config().validate()?;
        Ok(())
    }

    /// Settings for the load generator.
    #[must_use]
    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            comments_per_second: self.load.comments_per_second,
            likes_per_second: self.load.likes_per_second,
            reference_limit: self.load.reference_limit,
            report_interval: Duration::from_secs(self.load.report_interval_secs),
            drain_timeout: Duration::from_secs(self.load.drain_timeout_secs),
            ..LoadConfig::default()
        }
    }

    /// Volumes for the seeder.
    #[must_use]
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            users: self.seed.users,
            posts: self.seed.posts,
            comments: self.seed.comments,
            likes: self.seed.likes,
        }
    }
}

impl Default for LoadSettings {
    fn default() -> Self {
        let defaults = LoadConfig::default();
        Self {
            comments_per_second: defaults.comments_per_second,
            likes_per_second: defaults.likes_per_second,
            reference_limit: defaults.reference_limit,
            report_interval_secs: defaults.report_interval.as_secs(),
            drain_timeout_secs: defaults.drain_timeout.as_secs(),
        }
    }
}

impl Default for SeedSettings {
    fn default() -> Self {
        let defaults = SeedConfig::default();
        Self {
            users: defaults.users,
            posts: defaults.posts,
            comments: defaults.comments,
            likes: defaults.likes,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "feedload=info,feedload_app=info,feedload_adapter_scylla=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Validation(#[from] ValidationError),
}
