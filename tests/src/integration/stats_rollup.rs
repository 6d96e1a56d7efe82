//! Daily roll-up against a live mock collector, through the real HTTP sink.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use tracker_core::TrackerConfig;
    use tracker_gateway::{GatewayConfig, HttpReportSink};

    use crate::support::{test_identifier, MockCollector, TestTracker};

    async fn spawn_with_collector() -> (TestTracker, MockCollector) {
        let collector = MockCollector::spawn().await;

        let mut tracker_config = TrackerConfig::default();
        tracker_config.stats.collector_url = collector.url.clone();
        tracker_config.stats.hostname = "tracker.test".to_string();

        let sink = Arc::new(HttpReportSink::from_config(&tracker_config.stats).unwrap());
        let tracker =
            TestTracker::spawn(tracker_config, GatewayConfig::default(), sink).await;
        (tracker, collector)
    }

    async fn publish_addresses(tracker: &TestTracker, id: &str, addresses: &str) {
        let client = reqwest::Client::new();
        let response = client
            .post(tracker.tracker_url(&format!("id={id}")))
            .form(&[("addresses", addresses)])
            .send()
            .await
            .expect("publish request");
        assert_eq!(response.status(), 200);
    }

    async fn touch(tracker: &TestTracker) {
        // Any request runs the roll-up; resolving a known-empty identifier
        // is the cheapest way to trigger it
        let id = test_identifier("touch");
        reqwest::get(tracker.tracker_url(&format!("id={id}")))
            .await
            .expect("touch request");
    }

    #[tokio::test]
    async fn test_day_reported_once_with_distinct_counts() {
        let (tracker, collector) = spawn_with_collector().await;
        let id = test_identifier("counts");

        // Same address twice, a second address once: two distinct addresses
        publish_addresses(&tracker, &id, "1.2.3.4:100").await;
        publish_addresses(&tracker, &id, "1.2.3.4:100").await;
        publish_addresses(&tracker, &id, "1.2.3.5:100").await;
        assert_eq!(collector.hits(), 0, "today is never reported");

        tracker.clock.advance(Duration::days(1));
        touch(&tracker).await;

        assert_eq!(collector.hits(), 1);
        let body = &collector.bodies()[0];
        assert!(body.contains("date=2026-03-10"), "unexpected body: {body}");
        assert!(body.contains("tracker=tracker.test"));
        assert!(body.contains("naddresses=2"));
        assert!(body.contains("nidentifiers=1"));

        // A second roll-up finds the marker and stays quiet
        touch(&tracker).await;
        assert_eq!(collector.hits(), 1);
    }

    #[tokio::test]
    async fn test_rejected_day_retried_until_acknowledged() {
        let (tracker, collector) = spawn_with_collector().await;
        let id = test_identifier("retry");

        publish_addresses(&tracker, &id, "1.2.3.4:100").await;
        tracker.clock.advance(Duration::days(1));

        collector.set_respond_ok(false);
        touch(&tracker).await;
        assert_eq!(collector.hits(), 1);

        // Still unmarked: the next request attempts the day again
        collector.set_respond_ok(true);
        touch(&tracker).await;
        assert_eq!(collector.hits(), 2);

        // Acknowledged now: no further attempts
        touch(&tracker).await;
        assert_eq!(collector.hits(), 2);
    }

    #[tokio::test]
    async fn test_every_unreported_day_catches_up() {
        let (tracker, collector) = spawn_with_collector().await;
        let id = test_identifier("catchup");

        publish_addresses(&tracker, &id, "1.2.3.4:100").await;

        // Three days pass without a single request
        tracker.clock.advance(Duration::days(3));
        touch(&tracker).await;

        assert_eq!(collector.hits(), 3, "event day plus two empty gap days");
        let bodies = collector.bodies();
        assert!(bodies[0].contains("date=2026-03-10"));
        assert!(bodies[0].contains("naddresses=1"));
        assert!(bodies[1].contains("date=2026-03-11"));
        assert!(bodies[1].contains("naddresses=0"));
        assert!(bodies[2].contains("date=2026-03-12"));
    }

    #[tokio::test]
    async fn test_alternate_publications_not_counted() {
        let (tracker, collector) = spawn_with_collector().await;
        let id = test_identifier("altstats");

        let client = reqwest::Client::new();
        client
            .post(tracker.tracker_url(&format!("id={id}")))
            .form(&[
                ("addresses", "1.2.3.4:100"),
                ("alternate", "9.9.9.9:900,8.8.8.8:800"),
            ])
            .send()
            .await
            .expect("publish request");

        tracker.clock.advance(Duration::days(1));
        touch(&tracker).await;

        assert_eq!(collector.hits(), 1);
        let body = &collector.bodies()[0];
        assert!(
            body.contains("naddresses=1"),
            "only the primary address counts: {body}"
        );
    }

    #[tokio::test]
    async fn test_disabled_stats_never_contact_collector() {
        let collector = MockCollector::spawn().await;

        let mut tracker_config = TrackerConfig::default();
        tracker_config.stats.collector_url = collector.url.clone();
        tracker_config.stats.enabled = false;

        let sink = Arc::new(HttpReportSink::from_config(&tracker_config.stats).unwrap());
        let tracker =
            TestTracker::spawn(tracker_config, GatewayConfig::default(), sink).await;
        let id = test_identifier("disabled");

        publish_addresses(&tracker, &id, "1.2.3.4:100").await;
        tracker.clock.advance(Duration::days(1));
        touch(&tracker).await;

        assert_eq!(collector.hits(), 0);
    }
}
