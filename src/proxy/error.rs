//! Error types for endpoint delivery.

use thiserror::Error;

/// Error type for a single delivery attempt.
///
/// Request-construction failures ([`InvalidUrl`](Self::InvalidUrl),
/// [`InvalidHeader`](Self::InvalidHeader)) are detected before any network
/// I/O. Transport failures ([`Connection`](Self::Connection),
/// [`Timeout`](Self::Timeout)) happen while the request is in flight.
///
/// A response with a 4xx or 5xx status is not an error at this layer.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The endpoint did not respond within the transport's timeout.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint URL could not be turned into a request target.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A caller-supplied header name or value is not valid HTTP.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The offending header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl HttpError {
    /// Returns true if the failure happened on the wire rather than while
    /// building the request.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}
