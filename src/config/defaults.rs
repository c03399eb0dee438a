//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default request timeout in seconds, shared with the transport default.
pub const TIMEOUT_SECS: u64 = crate::proxy::DEFAULT_TIMEOUT.as_secs();

/// Default configuration file written by `init`.
pub const CONFIG_FILE: &str = "endpoint-proxy.toml";

/// Event types accepted by a route that does not list any.
pub const EVENTS: &[&str] = &[crate::proxy::WILDCARD];

/// Webhook id used when the caller does not supply one.
pub const WEBHOOK_ID: &str = "cli";

