//! Expiry pass over both address spaces.
//!
//! Runs synchronously on every write request and from a periodic background
//! task spawned by the gateway; both paths are idempotent and safe against
//! concurrent publishes.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::store::{AddressStore, ExpiredCounts};

/// Evicts rows older than the TTL.
pub struct Cleaner {
    store: Arc<AddressStore>,
    ttl: Duration,
}

impl Cleaner {
    pub fn new(store: Arc<AddressStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Remove stale rows from both spaces.
    pub fn clean(&self, now: DateTime<Utc>) -> ExpiredCounts {
        let removed = self.store.remove_expired(self.ttl, now);
        if removed.total() > 0 {
            debug!(
                primary = removed.primary,
                alternate = removed.alternate,
                "cleaning pass evicted stale rows"
            );
        }
        removed
    }

    /// Configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
