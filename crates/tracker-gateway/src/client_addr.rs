//! Publisher host inference for publishes without an explicit `host`.

use std::net::SocketAddr;

use axum::http::HeaderMap;
use tracing::debug;

/// Header a fronting proxy uses to carry the original client address.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// The host to register for a publisher that sent a `port` but no `host`.
///
/// When `trust_forwarded` is set and the request carries `X-Forwarded-For`,
/// the first (client-most) entry wins; otherwise the socket peer address is
/// used. The header is client-controlled, so it is ignored by default.
pub fn observed_host(headers: &HeaderMap, peer: SocketAddr, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(forwarded) = headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            debug!(forwarded, "using forwarded client address");
            return forwarded.to_string();
        }
    }
    peer.ip().to_string()
}

/// Join a host and port into the stored `host:port` form, bracketing bare
/// IPv6 literals.
pub fn format_endpoint(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
