//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All sections are optional so the file can be combined with CLI
/// arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// HTTP transport configuration
    #[serde(default)]
    pub http: HttpSection,

    /// Endpoint routes, one `[[route]]` table each
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteSection>,
}

/// HTTP transport configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// One endpoint route.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSection {
    /// Endpoint URL
    pub url: String,

    /// Serve the connect channel instead of the direct one
    #[serde(default)]
    pub connect: bool,

    /// Accepted event types; all events when omitted
    pub events: Option<Vec<String>>,

    /// Headers added to every event sent to this endpoint
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# endpoint-proxy configuration file

[http]
# Request timeout in seconds (default: 30, can be overridden by --timeout)
# timeout = 30

# One [[route]] table per local endpoint.
[[route]]
url = "http://localhost:4242/webhook"

# Serve connect events instead of direct ones (default: false)
# connect = false

# Event types to forward; omit to forward every event type
# events = ["invoice.created", "invoice.paid"]

# Headers added to every event sent to this endpoint
# [route.headers]
# X-Forwarded-By = "endpoint-proxy"

# [[route]]
# url = "http://localhost:4242/connect"
# connect = true
# events = ["*"]
"#
    .to_string()
}
