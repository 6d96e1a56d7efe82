//! Append-only per-day usage event log with sent markers.
//!
//! One event per `(day, identifier, address)` — the key is the dedup
//! constraint, same discipline as the address store. Markers record which
//! days have been reported to the collector and are kept apart from the
//! events so counts never have to exclude them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::entities::{DailyUsage, Identifier};
use crate::domain::errors::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EventKey {
    day: NaiveDate,
    identifier: Identifier,
    address: String,
}

#[derive(Debug, Clone)]
struct EventRow {
    #[allow(dead_code)]
    instance: String,
    recorded_at: DateTime<Utc>,
}

/// The usage event log.
pub struct StatsLog {
    events: DashMap<EventKey, EventRow>,
    sent_markers: DashMap<NaiveDate, DateTime<Utc>>,
    max_events: usize,
    total_recorded: AtomicU64,
}

impl StatsLog {
    /// Create a log bounded to `max_events` rows.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: DashMap::new(),
            sent_markers: DashMap::new(),
            max_events,
            total_recorded: AtomicU64::new(0),
        }
    }

    /// Record that `(identifier, address)` was seen today.
    ///
    /// Returns `true` when a new event row was written, `false` when the
    /// pair was already recorded for this day. Unlike address rows, events
    /// are never refreshed: the first sighting of the day stands.
    pub fn record(
        &self,
        identifier: &Identifier,
        instance: &str,
        address: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let key = EventKey {
            day: now.date_naive(),
            identifier: identifier.clone(),
            address: address.to_string(),
        };

        if self.events.len() >= self.max_events && !self.events.contains_key(&key) {
            return Err(StoreError::StatsCapacity {
                limit: self.max_events,
            });
        }

        match self.events.entry(key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(EventRow {
                    instance: instance.to_string(),
                    recorded_at: now,
                });
                self.total_recorded.fetch_add(1, Ordering::Relaxed);
                Ok(true)
            }
        }
    }

    /// Earliest day with a recorded event; the reporting horizon.
    pub fn oldest_day(&self) -> Option<NaiveDate> {
        self.events.iter().map(|entry| entry.key().day).min()
    }

    /// Distinct address and identifier counts for one day.
    pub fn daily_usage(&self, day: NaiveDate) -> DailyUsage {
        let mut addresses: HashSet<String> = HashSet::new();
        let mut identifiers: HashSet<Identifier> = HashSet::new();

        for entry in self.events.iter() {
            let key = entry.key();
            if key.day == day {
                addresses.insert(key.address.clone());
                identifiers.insert(key.identifier.clone());
            }
        }

        DailyUsage {
            day,
            addresses: addresses.len() as u64,
            identifiers: identifiers.len() as u64,
        }
    }

    /// Whether the day's aggregate has already been reported.
    pub fn is_sent(&self, day: NaiveDate) -> bool {
        self.sent_markers.contains_key(&day)
    }

    /// Mark the day as reported. At most one marker per day; a second call
    /// is a no-op.
    pub fn mark_sent(&self, day: NaiveDate, now: DateTime<Utc>) {
        self.sent_markers.entry(day).or_insert(now);
    }

    /// Number of event rows currently held.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Most recent recording timestamp for `(identifier, address)` on the
    /// given day, if any.
    pub fn recorded_at(
        &self,
        day: NaiveDate,
        identifier: &Identifier,
        address: &str,
    ) -> Option<DateTime<Utc>> {
        self.events
            .get(&EventKey {
                day,
                identifier: identifier.clone(),
                address: address.to_string(),
            })
            .map(|row| row.recorded_at)
    }
}
