//! Domain layer: entities, errors, and configuration.

pub mod config;
pub mod entities;
pub mod errors;

pub use config::{ConfigError, LimitsConfig, StatsConfig, TrackerConfig};
pub use entities::{DailyUsage, Identifier, Space, StoredAddress, DEFAULT_INSTANCE};
pub use errors::{ReportError, StoreError, ValidationError};
