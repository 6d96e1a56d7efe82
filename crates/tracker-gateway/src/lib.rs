//! Tracker gateway - the HTTP surface in front of `tracker-core`.
//!
//! A single method-differentiated endpoint carries the whole protocol:
//!
//! ```text
//! POST /tracker?id=<identifier>[&alternate]   publish addresses
//! GET  /tracker?id=<identifier>[&alternate]   resolve addresses (text/plain)
//! GET  /tracker?stats                         daily usage table (HTML)
//! GET  /tracker?config                        operational self-check
//! GET  /health                                liveness probe
//! ```
//!
//! Every tracker request first runs the stats roll-up; write requests also
//! trigger a cleaning pass. The contract is deliberately permissive: a
//! malformed or missing identifier degrades to an empty 200 reply rather
//! than an HTTP error, so probing the tracker reveals nothing.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod client_addr;
pub mod collector;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod service;

pub use collector::HttpReportSink;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use service::TrackerGateway;
