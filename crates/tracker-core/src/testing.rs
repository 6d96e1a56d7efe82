//! Centralized testing utilities.
//!
//! Available to downstream crates with the `test-utils` feature.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};

use crate::domain::errors::ReportError;
use crate::ports::TimeSource;
use crate::stats::{DailyReport, ReportSink};

/// A controllable clock for deterministic expiry and calendar-day tests.
///
/// Clones share the same underlying instant, so a handle kept by the test
/// can move time forward for components holding another handle.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedTimeSource {
    /// Create a clock pinned to the given instant.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Pin the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// A report sink that captures deliveries and can be switched to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<DailyReport>>,
    failing: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deliveries fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All reports acknowledged so far.
    pub fn reports(&self) -> Vec<DailyReport> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn send(&self, report: &DailyReport) -> Result<(), ReportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ReportError::Transport("sink switched to failing".into()));
        }
        self.reports.lock().push(report.clone());
        Ok(())
    }
}
