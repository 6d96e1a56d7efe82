//! HTTP implementation of the daily report sink.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use tracker_core::{DailyReport, ReportError, ReportSink, StatsConfig};

use crate::error::GatewayError;

/// Posts form-encoded daily reports to the central collector.
pub struct HttpReportSink {
    client: Client,
    url: String,
}

impl HttpReportSink {
    /// Build a sink with bounded timeouts.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("collector client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Build a sink from the stats configuration.
    pub fn from_config(stats: &StatsConfig) -> Result<Self, GatewayError> {
        Self::new(
            stats.collector_url.clone(),
            Duration::from_secs(stats.report_timeout_secs),
            Duration::from_secs(stats.connect_timeout_secs),
        )
    }

    /// Collector endpoint this sink posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn send(&self, report: &DailyReport) -> Result<(), ReportError> {
        let response = self
            .client
            .post(&self.url)
            .form(report)
            .send()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ReportError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
