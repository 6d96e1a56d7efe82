//! Tracker configuration with validation.
//!
//! Constructed once at process start and passed by reference into each
//! component; there is no ambient global state.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Core tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Age past which an address row is purged, in seconds (default: 15 minutes).
    pub record_ttl_secs: u64,
    /// Row bounds for the stores.
    pub limits: LimitsConfig,
    /// Daily usage reporting.
    pub stats: StatsConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            record_ttl_secs: 15 * 60,
            limits: LimitsConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Record TTL as a chrono duration.
    pub fn record_ttl(&self) -> Duration {
        Duration::seconds(self.record_ttl_secs as i64)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl("record_ttl_secs cannot be 0".into()));
        }

        if self.limits.max_records_per_space == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_records_per_space cannot be 0".into(),
            ));
        }

        if self.limits.max_stats_events == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_stats_events cannot be 0".into(),
            ));
        }

        if self.stats.enabled && self.stats.collector_url.is_empty() {
            return Err(ConfigError::MissingCollectorUrl);
        }

        Ok(())
    }
}

/// Row bounds for the address tables and stats log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum rows per address space (primary and alternate each).
    pub max_records_per_space: usize,
    /// Maximum rows in the stats event log.
    pub max_stats_events: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_records_per_space: 100_000,
            max_stats_events: 500_000,
        }
    }
}

/// Daily usage reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Send daily aggregates to the central collector.
    pub enabled: bool,
    /// Collector endpoint receiving form-encoded daily reports.
    pub collector_url: String,
    /// Tracker name included in each report.
    pub hostname: String,
    /// Per-report request timeout, in seconds.
    pub report_timeout_secs: u64,
    /// Connect timeout for the collector client, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            collector_url: "https://stats.peertrack.org/daily".to_string(),
            hostname: "localhost".to_string(),
            report_timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// TTL is unusable.
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),
    /// A row bound is unusable.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Stats reporting enabled without a collector URL.
    #[error("stats reporting enabled but collector_url is empty")]
    MissingCollectorUrl,
}
