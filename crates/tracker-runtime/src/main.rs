//! Tracker binary: assembles configuration from CLI flags and runs the
//! gateway until a shutdown signal.
//!
//! ## Startup Sequence
//!
//! 1. Parse CLI flags
//! 2. Initialize tracing (filter from `RUST_LOG`, default `info`)
//! 3. Assemble and validate configuration
//! 4. Wire store, aggregator, and gateway
//! 5. Serve until ctrl-c

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tracker_core::{SystemTimeSource, TrackerConfig};
use tracker_gateway::{GatewayConfig, HttpReportSink, TrackerGateway};

/// Rendezvous tracker for distributed peer instances.
#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(about = "Peer rendezvous tracker: publish and resolve peer addresses")]
struct Args {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Bind port
    #[arg(long, default_value_t = 8970)]
    port: u16,

    /// Tracker name reported to the stats collector and shown on the
    /// diagnostic pages
    #[arg(long, default_value = "localhost")]
    hostname: String,

    /// Stats collector URL override
    #[arg(long)]
    collector_url: Option<String>,

    /// Disable daily stats reporting
    #[arg(long)]
    disable_stats: bool,

    /// Address record TTL override, in seconds
    #[arg(long)]
    record_ttl_secs: Option<u64>,

    /// Honor X-Forwarded-For when inferring publisher hosts (only enable
    /// behind a trusted proxy)
    #[arg(long)]
    trust_forwarded_headers: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut tracker_config = TrackerConfig::default();
    tracker_config.stats.hostname = args.hostname;
    tracker_config.stats.enabled = !args.disable_stats;
    if let Some(url) = args.collector_url {
        tracker_config.stats.collector_url = url;
    }
    if let Some(ttl) = args.record_ttl_secs {
        tracker_config.record_ttl_secs = ttl;
    }

    let gateway_config = GatewayConfig {
        host: args.host,
        port: args.port,
        trust_forwarded_headers: args.trust_forwarded_headers,
        ..GatewayConfig::default()
    };

    info!(
        version = tracker_core::VERSION,
        hostname = %tracker_config.stats.hostname,
        stats = tracker_config.stats.enabled,
        ttl_secs = tracker_config.record_ttl_secs,
        "starting tracker"
    );

    let sink = Arc::new(
        HttpReportSink::from_config(&tracker_config.stats)
            .context("building stats collector client")?,
    );

    let gateway = TrackerGateway::new(
        tracker_config,
        gateway_config,
        Arc::new(SystemTimeSource),
        sink,
    )
    .context("assembling tracker gateway")?;

    gateway.start().await.context("running tracker gateway")?;
    Ok(())
}
