//! Concurrent address store with primary/alternate segregation.
//!
//! Rows are keyed by `(identifier, address)` within each space, so the map
//! key itself is the uniqueness constraint: a republication lands on the
//! existing key and takes the refresh branch. The check-and-insert happens
//! inside the entry API while the key's shard is locked, which closes the
//! race where two concurrent publishes of the same new address both insert.

mod stats_log;


pub use stats_log::StatsLog;

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::entities::{Identifier, Space, StoredAddress};
use crate::domain::errors::StoreError;

/// Uniqueness key within one space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    identifier: Identifier,
    address: String,
}

/// Row payload. The instance name is fixed at first publish; republication
/// refreshes the timestamp only.
#[derive(Debug, Clone)]
struct Row {
    instance: String,
    last_seen: DateTime<Utc>,
    /// Monotonic insertion sequence, used to present addresses in
    /// publication order.
    seq: u64,
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New `(identifier, address)` pair; a row was written.
    Inserted,
    /// Pair already known; its timestamp was refreshed.
    Refreshed,
}

/// Row counts and lifetime counters, for the operator self-check page.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreCounts {
    pub primary_rows: usize,
    pub alternate_rows: usize,
    pub total_inserted: u64,
    pub total_refreshed: u64,
    pub total_expired: u64,
}

/// Rows removed from each space by one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiredCounts {
    pub primary: usize,
    pub alternate: usize,
}

impl ExpiredCounts {
    /// Total rows removed across both spaces.
    pub fn total(&self) -> usize {
        self.primary + self.alternate
    }
}

/// The two-space address table.
pub struct AddressStore {
    primary: DashMap<RecordKey, Row>,
    alternate: DashMap<RecordKey, Row>,
    max_rows_per_space: usize,
    seq: AtomicU64,
    total_inserted: AtomicU64,
    total_refreshed: AtomicU64,
    total_expired: AtomicU64,
}

impl AddressStore {
    /// Create a store bounded to `max_rows_per_space` rows per space.
    pub fn new(max_rows_per_space: usize) -> Self {
        Self {
            primary: DashMap::new(),
            alternate: DashMap::new(),
            max_rows_per_space,
            seq: AtomicU64::new(0),
            total_inserted: AtomicU64::new(0),
            total_refreshed: AtomicU64::new(0),
            total_expired: AtomicU64::new(0),
        }
    }

    fn table(&self, space: Space) -> &DashMap<RecordKey, Row> {
        match space {
            Space::Primary => &self.primary,
            Space::Alternate => &self.alternate,
        }
    }

    /// Insert a row or refresh the timestamp of an existing one.
    ///
    /// The capacity check runs before the shard lock is taken, so the bound
    /// is advisory under concurrent inserts: it may overshoot by at most the
    /// number of in-flight publishes.
    pub fn upsert(
        &self,
        space: Space,
        identifier: &Identifier,
        instance: &str,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        let table = self.table(space);
        let key = RecordKey {
            identifier: identifier.clone(),
            address: address.to_string(),
        };

        if table.len() >= self.max_rows_per_space && !table.contains_key(&key) {
            return Err(StoreError::Capacity {
                space,
                limit: self.max_rows_per_space,
            });
        }

        match table.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().last_seen = now;
                self.total_refreshed.fetch_add(1, Ordering::Relaxed);
                Ok(UpsertOutcome::Refreshed)
            }
            Entry::Vacant(entry) => {
                entry.insert(Row {
                    instance: instance.to_string(),
                    last_seen: now,
                    seq: self.seq.fetch_add(1, Ordering::Relaxed),
                });
                self.total_inserted.fetch_add(1, Ordering::Relaxed);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    /// All rows for an identifier in one space, in insertion order.
    ///
    /// Expiry filtering is the resolver's concern; this returns raw rows.
    pub fn lookup(&self, space: Space, identifier: &Identifier) -> Vec<StoredAddress> {
        let mut rows: Vec<(u64, StoredAddress)> = self
            .table(space)
            .iter()
            .filter(|entry| &entry.key().identifier == identifier)
            .map(|entry| {
                let row = entry.value();
                (
                    row.seq,
                    StoredAddress {
                        instance: row.instance.clone(),
                        address: entry.key().address.clone(),
                        last_seen: row.last_seen,
                    },
                )
            })
            .collect();

        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, addr)| addr).collect()
    }

    /// Whether a row exists for `(identifier, address)` in the given space.
    pub fn contains(&self, space: Space, identifier: &Identifier, address: &str) -> bool {
        self.table(space).contains_key(&RecordKey {
            identifier: identifier.clone(),
            address: address.to_string(),
        })
    }

    /// Remove rows older than `ttl` from both spaces.
    pub fn remove_expired(&self, ttl: Duration, now: DateTime<Utc>) -> ExpiredCounts {
        let counts = ExpiredCounts {
            primary: self.remove_expired_in(Space::Primary, ttl, now),
            alternate: self.remove_expired_in(Space::Alternate, ttl, now),
        };
        self.total_expired
            .fetch_add(counts.total() as u64, Ordering::Relaxed);
        counts
    }

    fn remove_expired_in(&self, space: Space, ttl: Duration, now: DateTime<Utc>) -> usize {
        let table = self.table(space);
        let before = table.len();
        table.retain(|_, row| now.signed_duration_since(row.last_seen) <= ttl);
        let removed = before.saturating_sub(table.len());
        if removed > 0 {
            debug!(space = %space, removed, "evicted stale address rows");
        }
        removed
    }

    /// Current row counts and lifetime counters.
    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            primary_rows: self.primary.len(),
            alternate_rows: self.alternate.len(),
            total_inserted: self.total_inserted.load(Ordering::Relaxed),
            total_refreshed: self.total_refreshed.load(Ordering::Relaxed),
            total_expired: self.total_expired.load(Ordering::Relaxed),
        }
    }
}
