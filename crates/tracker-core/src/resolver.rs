//! Query side: distinct addresses for an identifier, rendered as the
//! plain-text block peers parse.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{Identifier, Space, StoredAddress};
use crate::store::AddressStore;

/// Resolves identifiers to their current address set.
pub struct Resolver {
    store: Arc<AddressStore>,
    ttl: Duration,
}

impl Resolver {
    pub fn new(store: Arc<AddressStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Non-expired rows for the identifier in one space, in insertion order.
    ///
    /// Rows past the TTL are filtered even if the cleaner has not run yet,
    /// so the expiry guarantee holds between cleaning passes. An unknown
    /// identifier is an empty result, not an error.
    pub fn resolve(
        &self,
        identifier: &Identifier,
        space: Space,
        now: DateTime<Utc>,
    ) -> Vec<StoredAddress> {
        self.store
            .lookup(space, identifier)
            .into_iter()
            .filter(|row| now.signed_duration_since(row.last_seen) <= self.ttl)
            .collect()
    }

    /// Render rows as the wire block:
    ///
    /// ```text
    /// inst1:
    /// \t- 1.2.3.4:100
    /// \t- 1.2.3.5:100
    /// inst2:
    /// \t- 1.2.3.6:100
    /// ```
    ///
    /// Instances appear in first-encounter order, addresses in insertion
    /// order within their group. No rows renders as the empty string.
    pub fn render(rows: &[StoredAddress]) -> String {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for row in rows {
            match groups.iter_mut().find(|(name, _)| *name == row.instance) {
                Some((_, addresses)) => addresses.push(&row.address),
                None => groups.push((&row.instance, vec![&row.address])),
            }
        }

        let mut out = String::new();
        for (instance, addresses) in groups {
            out.push_str(instance);
            out.push_str(":\r\n");
            for address in addresses {
                out.push_str("\t- ");
                out.push_str(address);
                out.push_str("\r\n");
            }
        }
        out
    }
}
