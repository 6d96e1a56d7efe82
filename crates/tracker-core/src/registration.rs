//! Registration engine: validates and upserts address publications.
//!
//! A single publish request may carry a self endpoint, a list of additional
//! primary addresses, and a list of alternate addresses. Each address runs
//! through the same upsert independently and best-effort: a storage refusal
//! on one address is logged and never aborts its siblings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::entities::{Identifier, Space, DEFAULT_INSTANCE};
use crate::stats::StatsAggregator;
use crate::store::{AddressStore, UpsertOutcome};

/// One decoded publish request.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Validated lookup key.
    pub identifier: Identifier,
    /// Publisher's instance name; empty or absent becomes
    /// [`DEFAULT_INSTANCE`].
    pub instance: Option<String>,
    /// The publisher's own `host:port`, when it supplied a port.
    pub endpoint: Option<String>,
    /// Additional addresses for the request's target space.
    pub addresses: Vec<String>,
    /// Alternate-space candidates; ignored when the request itself is
    /// alternate-scoped.
    pub alternates: Vec<String>,
    /// Whether the request is scoped to the alternate space.
    pub alternate_scope: bool,
}

impl PublishRequest {
    /// A request carrying only the identifier and scope.
    pub fn empty(identifier: Identifier, alternate_scope: bool) -> Self {
        Self {
            identifier,
            instance: None,
            endpoint: None,
            addresses: Vec::new(),
            alternates: Vec::new(),
            alternate_scope,
        }
    }

    fn instance_name(&self) -> &str {
        match self.instance.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_INSTANCE,
        }
    }
}

/// Counts of what one publish request did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// New rows written.
    pub inserted: usize,
    /// Existing rows whose timestamp was refreshed.
    pub refreshed: usize,
    /// Addresses abandoned on a storage refusal.
    pub rejected: usize,
}

impl PublishOutcome {
    /// Addresses that landed (inserted or refreshed).
    pub fn accepted(&self) -> usize {
        self.inserted + self.refreshed
    }
}

/// The engine behind every write request.
pub struct RegistrationEngine {
    store: Arc<AddressStore>,
    stats: Arc<StatsAggregator>,
}

impl RegistrationEngine {
    pub fn new(store: Arc<AddressStore>, stats: Arc<StatsAggregator>) -> Self {
        Self { store, stats }
    }

    /// Apply a publish request to the store.
    ///
    /// The self endpoint always lands in the primary space; the `addresses`
    /// list follows the request scope; the `alternates` list always targets
    /// the alternate space and is dropped when the request is already
    /// alternate-scoped. Primary-space upserts additionally feed the
    /// per-day stats log.
    pub fn publish(&self, request: &PublishRequest, now: DateTime<Utc>) -> PublishOutcome {
        let instance = request.instance_name();
        let target = Space::from_alternate_flag(request.alternate_scope);
        let mut outcome = PublishOutcome::default();

        if let Some(endpoint) = request.endpoint.as_deref() {
            self.upsert_one(Space::Primary, request, instance, endpoint, now, &mut outcome);
        }
        for address in &request.addresses {
            self.upsert_one(target, request, instance, address, now, &mut outcome);
        }

        if !request.alternate_scope {
            for address in &request.alternates {
                self.upsert_one(
                    Space::Alternate,
                    request,
                    instance,
                    address,
                    now,
                    &mut outcome,
                );
            }
        }

        debug!(
            identifier = %request.identifier,
            instance,
            inserted = outcome.inserted,
            refreshed = outcome.refreshed,
            rejected = outcome.rejected,
            "publish processed"
        );
        outcome
    }

    fn upsert_one(
        &self,
        space: Space,
        request: &PublishRequest,
        instance: &str,
        address: &str,
        now: DateTime<Utc>,
        outcome: &mut PublishOutcome,
    ) {
        let address = address.trim();
        if address.is_empty() {
            return;
        }

        match self
            .store
            .upsert(space, &request.identifier, instance, address, now)
        {
            Ok(UpsertOutcome::Inserted) => outcome.inserted += 1,
            Ok(UpsertOutcome::Refreshed) => outcome.refreshed += 1,
            Err(error) => {
                warn!(space = %space, address, %error, "address upsert abandoned");
                outcome.rejected += 1;
                return;
            }
        }

        if space == Space::Primary {
            self.stats
                .record_event(&request.identifier, instance, address, now);
        }
    }
}
