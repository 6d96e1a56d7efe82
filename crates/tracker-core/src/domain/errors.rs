//! Error taxonomy: validation, storage, and remote reporting.
//!
//! None of these cross the HTTP boundary as error responses; the gateway
//! decides logging and degrades to an empty reply where the wire contract
//! demands it.

use super::entities::Space;

/// A request carried data that cannot identify or address anything.
///
/// Validation failures never mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Identifier is not exactly the required length.
    #[error("identifier must be {expected} characters, got {actual}")]
    IdentifierLength { expected: usize, actual: usize },
}

/// A storage-layer refusal. The affected row is abandoned; sibling
/// operations in the same request proceed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Address table for the given space is at its row bound.
    #[error("{space} address table at capacity ({limit} rows)")]
    Capacity { space: Space, limit: usize },

    /// Stats event log is at its row bound.
    #[error("stats log at capacity ({limit} events)")]
    StatsCapacity { limit: usize },
}

/// A failed attempt to deliver a daily report to the central collector.
///
/// The day stays unmarked and is retried on a later roll-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// Transport-level failure (connect, timeout, I/O).
    #[error("collector request failed: {0}")]
    Transport(String),

    /// Collector answered with a non-200 status.
    #[error("collector rejected report: status {status}")]
    Rejected { status: u16 },
}
