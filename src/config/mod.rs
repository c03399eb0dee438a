//! Configuration layer for endpoint-proxy.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`ForwardArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Scalar values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! Routes are additive: every `[[route]]` table of the file is kept, and a
//! `--url` endpoint is appended after them.
//!
//! # Event lists
//!
//! A route without `events` accepts every event type (it gets the `"*"`
//! member). An explicit empty list is rejected, since it could never match.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, ForwardArgs};
pub use error::ConfigError;
pub use toml::{HttpSection, RouteSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, parse_header_args, write_default_config};
