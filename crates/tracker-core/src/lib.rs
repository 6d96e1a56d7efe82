//! Tracker core - rendezvous state management for distributed peer instances.
//!
//! Peers publish their reachable `host:port` endpoints under a shared opaque
//! 128-character identifier; correspondents holding the same identifier query
//! the tracker to learn the current endpoint set. Rows are time-bounded and
//! deduplicated, and primary-space publications feed a per-day usage log that
//! is rolled up and reported once per day to a central collector.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      TRACKER CORE                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   publish    ┌────────────────────┐    │
//! │  │ Registration │─────────────►│   Address Store    │    │
//! │  │    Engine    │              │ (primary/alternate)│    │
//! │  └──────┬───────┘              └─────────▲──────────┘    │
//! │         │ primary only                   │ retain(ttl)   │
//! │         ▼                                │               │
//! │  ┌──────────────┐              ┌─────────┴──────────┐    │
//! │  │  Stats Log   │              │      Cleaner       │    │
//! │  │ (day events) │              └────────────────────┘    │
//! │  └──────┬───────┘                                        │
//! │         │ roll-up (oldest..yesterday)                    │
//! │         ▼                                                │
//! │  ┌──────────────┐   ReportSink (port)                    │
//! │  │  Aggregator  │──────────────────────► collector       │
//! │  └──────────────┘                                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The HTTP surface lives in `tracker-gateway`; this crate holds no I/O
//! beyond the [`stats::ReportSink`] port.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cleaner;
pub mod domain;
pub mod ports;
pub mod registration;
pub mod resolver;
pub mod stats;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports for the public API
pub use cleaner::Cleaner;
pub use domain::config::{ConfigError, LimitsConfig, StatsConfig, TrackerConfig};
pub use domain::entities::{DailyUsage, Identifier, Space, StoredAddress, DEFAULT_INSTANCE};
pub use domain::errors::{ReportError, StoreError, ValidationError};
pub use ports::{SystemTimeSource, TimeSource};
pub use registration::{PublishOutcome, PublishRequest, RegistrationEngine};
pub use resolver::Resolver;
pub use stats::{DailyReport, ReportSink, StatsAggregator};
pub use store::{AddressStore, ExpiredCounts, StatsLog, StoreCounts, UpsertOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
