//! Gateway configuration with validation.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Port (0 binds an ephemeral port).
    pub port: u16,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Background cleaning pass interval, in seconds.
    pub clean_interval_secs: u64,
    /// Honor `X-Forwarded-For` when inferring a publisher's host.
    ///
    /// The header is trivially spoofable, so this stays off unless the
    /// tracker actually sits behind a proxy it trusts.
    pub trust_forwarded_headers: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8970,
            request_timeout_secs: 10,
            clean_interval_secs: 60,
            trust_forwarded_headers: false,
        }
    }
}

impl GatewayConfig {
    /// Bind address for the listener.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.request_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "request_timeout_secs cannot be 0".into(),
            ));
        }
        if self.clean_interval_secs == 0 {
            return Err(GatewayError::Config(
                "clean_interval_secs cannot be 0".into(),
            ));
        }
        Ok(())
    }
}
