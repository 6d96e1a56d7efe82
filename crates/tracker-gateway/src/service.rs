//! Gateway service: component wiring, router construction, serving.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use tracker_core::{
    AddressStore, Cleaner, RegistrationEngine, ReportSink, Resolver, StatsAggregator, StatsLog,
    TimeSource, TrackerConfig,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::handlers::{self, AppState};

/// The assembled tracker service.
pub struct TrackerGateway {
    config: GatewayConfig,
    state: AppState,
}

impl TrackerGateway {
    /// Validate configuration and wire the core components.
    pub fn new(
        tracker_config: TrackerConfig,
        gateway_config: GatewayConfig,
        time: Arc<dyn TimeSource>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, GatewayError> {
        tracker_config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        gateway_config.validate()?;

        let store = Arc::new(AddressStore::new(
            tracker_config.limits.max_records_per_space,
        ));
        let log = Arc::new(StatsLog::new(tracker_config.limits.max_stats_events));
        let stats = Arc::new(StatsAggregator::new(
            Arc::clone(&log),
            sink,
            tracker_config.stats.hostname.clone(),
            tracker_config.stats.enabled,
        ));
        let engine = Arc::new(RegistrationEngine::new(
            Arc::clone(&store),
            Arc::clone(&stats),
        ));
        let resolver = Arc::new(Resolver::new(
            Arc::clone(&store),
            tracker_config.record_ttl(),
        ));
        let cleaner = Arc::new(Cleaner::new(
            Arc::clone(&store),
            tracker_config.record_ttl(),
        ));

        let state = AppState {
            store,
            engine,
            resolver,
            cleaner,
            stats,
            time,
            tracker_config: Arc::new(tracker_config),
            trust_forwarded_headers: gateway_config.trust_forwarded_headers,
        };

        Ok(Self {
            config: gateway_config,
            state,
        })
    }

    /// Build the router. Exposed so tests can serve it on a listener of
    /// their own.
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )));

        Router::new()
            .route(
                "/tracker",
                get(handlers::handle_tracker).post(handlers::handle_tracker),
            )
            .route("/health", get(handlers::health_check))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Shared handler state, for diagnostics and tests.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind and serve until a shutdown signal arrives.
    pub async fn start(self) -> Result<(), GatewayError> {
        let router = self.router();
        let cleaner_task = self.spawn_cleaner_task();

        let listener = TcpListener::bind(self.config.bind_addr())
            .await
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;
        info!(addr = %local_addr, "tracker listening");

        let result = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Serve(e.to_string()));

        cleaner_task.abort();
        info!("tracker stopped");
        result
    }

    fn spawn_cleaner_task(&self) -> tokio::task::JoinHandle<()> {
        let cleaner = Arc::clone(&self.state.cleaner);
        let time = Arc::clone(&self.state.time);
        let period = Duration::from_secs(self.config.clean_interval_secs);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let removed = cleaner.clean(time.now());
                if removed.total() > 0 {
                    debug!(removed = removed.total(), "periodic cleaning pass");
                }
            }
        })
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
