//! TTL guarantees through the HTTP surface.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use tracker_core::testing::RecordingSink;
    use tracker_core::TrackerConfig;
    use tracker_gateway::GatewayConfig;

    use crate::support::{test_identifier, TestTracker};

    async fn spawn_tracker() -> TestTracker {
        TestTracker::spawn(
            TrackerConfig::default(),
            GatewayConfig::default(),
            Arc::new(RecordingSink::new()),
        )
        .await
    }

    async fn publish_address(tracker: &TestTracker, id: &str, address: &str) {
        let client = reqwest::Client::new();
        let response = client
            .post(tracker.tracker_url(&format!("id={id}")))
            .form(&[("addresses", address)])
            .send()
            .await
            .expect("publish request");
        assert_eq!(response.status(), 200);
    }

    async fn resolve(tracker: &TestTracker, id: &str) -> String {
        reqwest::get(tracker.tracker_url(&format!("id={id}")))
            .await
            .expect("resolve request")
            .text()
            .await
            .expect("resolve body")
    }

    #[tokio::test]
    async fn test_row_expires_after_ttl_without_writes() {
        let tracker = spawn_tracker().await;
        let id = test_identifier("expiry");

        publish_address(&tracker, &id, "1.2.3.4:100").await;

        tracker.clock.advance(Duration::minutes(14));
        assert!(
            resolve(&tracker, &id).await.contains("1.2.3.4:100"),
            "a 14-minute-old row must survive"
        );

        tracker.clock.advance(Duration::minutes(2));
        assert_eq!(
            resolve(&tracker, &id).await,
            "",
            "a 16-minute-old row must be gone even with no writes in between"
        );
    }

    #[tokio::test]
    async fn test_write_triggered_cleaner_evicts_stale_rows() {
        let tracker = spawn_tracker().await;
        let stale_id = test_identifier("stale");
        let fresh_id = test_identifier("fresh");

        publish_address(&tracker, &stale_id, "1.2.3.4:100").await;
        tracker.clock.advance(Duration::minutes(16));

        // Any write request runs a cleaning pass
        publish_address(&tracker, &fresh_id, "5.6.7.8:200").await;

        let counts = tracker.gateway.state().store.counts();
        assert_eq!(counts.primary_rows, 1, "stale row evicted from the store");
        assert_eq!(counts.total_expired, 1);
        assert_eq!(resolve(&tracker, &stale_id).await, "");
        assert!(resolve(&tracker, &fresh_id).await.contains("5.6.7.8:200"));
    }

    #[tokio::test]
    async fn test_republication_refreshes_lifetime() {
        let tracker = spawn_tracker().await;
        let id = test_identifier("refresh");

        publish_address(&tracker, &id, "1.2.3.4:100").await;

        tracker.clock.advance(Duration::minutes(10));
        publish_address(&tracker, &id, "1.2.3.4:100").await;

        // 20 minutes after the first publish, 10 after the refresh
        tracker.clock.advance(Duration::minutes(10));
        assert!(
            resolve(&tracker, &id).await.contains("1.2.3.4:100"),
            "refreshed row must live on past the original deadline"
        );
    }

    #[tokio::test]
    async fn test_expiry_applies_to_alternate_space() {
        let tracker = spawn_tracker().await;
        let id = test_identifier("altexpiry");

        let client = reqwest::Client::new();
        client
            .post(tracker.tracker_url(&format!("id={id}")))
            .form(&[("alternate", "9.9.9.9:900")])
            .send()
            .await
            .expect("publish request");

        tracker.clock.advance(Duration::minutes(16));

        let body = reqwest::get(tracker.tracker_url(&format!("id={id}&alternate")))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "");
    }
}
