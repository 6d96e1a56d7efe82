//! Daily report payload and the outbound sink port.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::errors::ReportError;

/// One day's aggregate, as posted to the central collector.
///
/// Field names are the collector's form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    /// Calendar day the counts cover.
    pub date: NaiveDate,
    /// Reporting tracker's hostname.
    pub tracker: String,
    /// Distinct addresses seen that day.
    pub naddresses: u64,
    /// Distinct identifiers seen that day.
    pub nidentifiers: u64,
}

/// Delivery port for daily reports.
///
/// The host provides the transport (the gateway ships an HTTP
/// implementation with bounded timeouts). Implementations must be
/// `Send + Sync`; a single failed delivery only defers that day.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver one report. `Ok(())` means the collector acknowledged it.
    async fn send(&self, report: &DailyReport) -> Result<(), ReportError>;
}
