//! Gateway-level errors (startup and transport; never request-level).

/// Errors raised while configuring or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server runtime error
    #[error("server error: {0}")]
    Serve(String),
}
