//! Test harness: a tracker served on an ephemeral port with a controllable
//! clock, and a mock stats collector.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use tracker_core::testing::FixedTimeSource;
use tracker_core::{ReportSink, TrackerConfig};
use tracker_gateway::{GatewayConfig, TrackerGateway};

/// Fixed start instant every test clock begins at (a Tuesday noon, UTC).
pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

/// A 128-character identifier derived from a short tag.
pub fn test_identifier(tag: &str) -> String {
    let mut id = tag.to_string();
    while id.len() < 128 {
        id.push('0');
    }
    id.truncate(128);
    id
}

/// A tracker served on an ephemeral local port.
pub struct TestTracker {
    pub base_url: String,
    pub clock: FixedTimeSource,
    pub gateway: TrackerGateway,
    server: JoinHandle<()>,
}

impl TestTracker {
    /// Spawn a tracker with the given configs and report sink.
    pub async fn spawn(
        tracker_config: TrackerConfig,
        gateway_config: GatewayConfig,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        let clock = FixedTimeSource::new(test_epoch());
        let gateway = TrackerGateway::new(
            tracker_config,
            gateway_config,
            Arc::new(clock.clone()),
            sink,
        )
        .expect("gateway construction");

        let router = gateway.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            clock,
            gateway,
            server,
        }
    }

    /// URL of the tracker endpoint with a query string.
    pub fn tracker_url(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/tracker", self.base_url)
        } else {
            format!("{}/tracker?{}", self.base_url, query)
        }
    }
}

impl Drop for TestTracker {
    fn drop(&mut self) {
        self.server.abort();
    }
}

#[derive(Clone)]
struct CollectorState {
    hits: Arc<AtomicUsize>,
    respond_ok: Arc<AtomicBool>,
    bodies: Arc<Mutex<Vec<String>>>,
}

/// A stand-in for the central stats collector.
pub struct MockCollector {
    pub url: String,
    hits: Arc<AtomicUsize>,
    respond_ok: Arc<AtomicBool>,
    bodies: Arc<Mutex<Vec<String>>>,
    server: JoinHandle<()>,
}

impl MockCollector {
    /// Spawn a collector answering 200 until told otherwise.
    pub async fn spawn() -> Self {
        let state = CollectorState {
            hits: Arc::new(AtomicUsize::new(0)),
            respond_ok: Arc::new(AtomicBool::new(true)),
            bodies: Arc::new(Mutex::new(Vec::new())),
        };

        async fn collect(State(state): State<CollectorState>, body: String) -> StatusCode {
            state.hits.fetch_add(1, Ordering::SeqCst);
            state.bodies.lock().push(body);
            if state.respond_ok.load(Ordering::SeqCst) {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }

        let router = Router::new()
            .route("/daily", post(collect))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind collector port");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve collector");
        });

        Self {
            url: format!("http://{addr}/daily"),
            hits: state.hits,
            respond_ok: state.respond_ok,
            bodies: state.bodies,
            server,
        }
    }

    /// Number of report POSTs received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Switch between acknowledging (200) and failing (503).
    pub fn set_respond_ok(&self, ok: bool) {
        self.respond_ok.store(ok, Ordering::SeqCst);
    }

    /// Raw form bodies received so far.
    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().clone()
    }
}

impl Drop for MockCollector {
    fn drop(&mut self) {
        self.server.abort();
    }
}
