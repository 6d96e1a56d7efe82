//! Daily usage aggregation and roll-up.
//!
//! Recording happens as a side effect of primary publishes; the roll-up
//! walks every day from the oldest recorded event up to yesterday and
//! reports the ones without a sent marker. Today is always excluded as
//! incomplete. Already-reported days cost one O(1) marker check, so running
//! the roll-up on every request stays cheap as the tracker ages.

mod report;

pub use report::{DailyReport, ReportSink};

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::domain::entities::{DailyUsage, Identifier};
use crate::store::StatsLog;

/// Records usage events and reports daily aggregates.
pub struct StatsAggregator {
    log: Arc<StatsLog>,
    sink: Arc<dyn ReportSink>,
    hostname: String,
    enabled: bool,
}

impl StatsAggregator {
    pub fn new(
        log: Arc<StatsLog>,
        sink: Arc<dyn ReportSink>,
        hostname: String,
        enabled: bool,
    ) -> Self {
        Self {
            log,
            sink,
            hostname,
            enabled,
        }
    }

    /// Per-day dedup insert for a primary publication.
    ///
    /// Events are recorded even when reporting is disabled, so the
    /// diagnostic table keeps working; a full log is reported and dropped.
    pub fn record_event(
        &self,
        identifier: &Identifier,
        instance: &str,
        address: &str,
        now: DateTime<Utc>,
    ) {
        match self.log.record(identifier, instance, address, now) {
            Ok(true) => {
                debug!(identifier = %identifier, address, "usage event recorded");
            }
            Ok(false) => {}
            Err(error) => {
                warn!(%error, "usage event dropped");
            }
        }
    }

    /// Report every unsent day up to yesterday.
    ///
    /// Days are attempted independently: a delivery failure leaves that
    /// day's marker unset and moves on, so it is retried on a later
    /// roll-up. Returns the number of days acknowledged this pass.
    pub async fn send_pending(&self, now: DateTime<Utc>) -> usize {
        if !self.enabled {
            return 0;
        }

        let today = now.date_naive();
        let Some(oldest) = self.log.oldest_day() else {
            return 0;
        };

        let mut sent = 0;
        let mut day = oldest;
        while day < today {
            if !self.log.is_sent(day) {
                let usage = self.log.daily_usage(day);
                let report = DailyReport {
                    date: day,
                    tracker: self.hostname.clone(),
                    naddresses: usage.addresses,
                    nidentifiers: usage.identifiers,
                };

                match self.sink.send(&report).await {
                    Ok(()) => {
                        self.log.mark_sent(day, now);
                        sent += 1;
                        debug!(
                            day = %day,
                            naddresses = usage.addresses,
                            nidentifiers = usage.identifiers,
                            "daily report acknowledged"
                        );
                    }
                    Err(error) => {
                        warn!(day = %day, %error, "daily report deferred");
                    }
                }
            }

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        sent
    }

    /// Recomputed usage for every day from the horizon up to yesterday,
    /// newest first. For the diagnostic page; markers play no part.
    pub fn usage_table(&self, now: DateTime<Utc>) -> Vec<DailyUsage> {
        let today = now.date_naive();
        let Some(oldest) = self.log.oldest_day() else {
            return Vec::new();
        };

        let mut days = Vec::new();
        let mut day = oldest;
        while day < today {
            days.push(self.log.daily_usage(day));
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        days.reverse();
        days
    }

    /// Usage for a single day, recomputed on the fly.
    pub fn daily_usage(&self, day: NaiveDate) -> DailyUsage {
        self.log.daily_usage(day)
    }

    /// Whether a day's report has been acknowledged.
    pub fn is_sent(&self, day: NaiveDate) -> bool {
        self.log.is_sent(day)
    }
}
