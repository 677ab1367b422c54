//! Error type for backend fetches.

use thiserror::Error;

/// Failure surfaced by a [`MapBackend`](crate::MapBackend) call.
///
/// A missing entity is not an error: backend methods return `Ok(None)` for
/// 404s so callers can distinguish "does not exist" from "could not reach".
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure, including timeouts.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success, non-404 status from the platform.
    #[error("backend returned status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The configured base URL or a joined path failed to parse.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Backend was reachable but declined to serve the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
