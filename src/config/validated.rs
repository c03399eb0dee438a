//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::proxy::{EndpointRoute, ForwardedEvent};

use super::cli::{Cli, ForwardArgs};
use super::defaults;
use super::error::ConfigError;
use super::toml::{RouteSection, TomlConfig};

/// Fully validated configuration for one `forward` run.
///
/// Every route URL parses and every header is valid HTTP, so delivery
/// failures past this point are transport failures.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Routes in file order, followed by the `--url` route if any
    pub routes: Vec<EndpointRoute>,

    /// Request timeout applied by the transport
    pub timeout: Duration,

    /// Event to forward; its body is read at run time
    pub event: ForwardedEvent,

    /// File holding the event body (`None` reads stdin)
    pub body_file: Option<PathBuf>,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body_source = self
            .body_file
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ routes: {}, timeout: {}s, event_type: {}, webhook_id: {}, connect: {}, \
             body: {} }}",
            self.routes.len(),
            self.timeout.as_secs(),
            self.event.event_type,
            self.event.id,
            self.event.connect,
            body_source,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from `forward` arguments and an
    /// optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values. The `--url`
    /// route is appended to the file's routes, not substituted for them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No route is configured
    /// - A URL is invalid
    /// - A route has an explicitly empty event list
    /// - A header is malformed
    /// - The timeout is zero
    pub fn from_raw(args: &ForwardArgs, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let routes = Self::resolve_routes(args, toml)?;
        let timeout = Self::resolve_timeout(args, toml)?;

        let event = ForwardedEvent {
            id: args.webhook_id.clone(),
            event_type: args.event_type.clone(),
            connect: args.connect,
            body: Vec::new(),
            headers: parse_header_args(&args.headers)?,
        };

        Ok(Self {
            routes,
            timeout,
            event,
            body_file: args.body_file.clone(),
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli, args: &ForwardArgs) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(args, toml.as_ref())
    }

    fn resolve_routes(
        args: &ForwardArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<EndpointRoute>, ConfigError> {
        let mut routes = Vec::new();

        if let Some(toml) = toml {
            for section in &toml.routes {
                routes.push(route_from_section(section)?);
            }
        }

        if let Some(ref url) = args.url {
            validate_url(url)?;
            let route = if args.events.is_empty() {
                EndpointRoute::new(url, args.connect, defaults::EVENTS.iter().copied())
            } else {
                EndpointRoute::new(url, args.connect, args.events.iter().cloned())
            };
            routes.push(route);
        }

        if routes.is_empty() {
            return Err(ConfigError::no_routes());
        }

        Ok(routes)
    }

    fn resolve_timeout(
        args: &ForwardArgs,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = args
            .timeout
            .or_else(|| toml.and_then(|t| t.http.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parses repeated `--header` arguments into validated name/value pairs.
///
/// Order and repeated names are preserved.
///
/// # Errors
///
/// Returns an error if an argument has no separator, or its name or value
/// is not valid HTTP.
pub fn parse_header_args(args: &[String]) -> Result<Vec<(String, String)>, ConfigError> {
    args.iter()
        .map(|arg| {
            let (name, value) = parse_header_string(arg)?;
            validate_header(&name, &value)?;
            Ok((name, value))
        })
        .collect()
}

// Helper functions

fn route_from_section(section: &RouteSection) -> Result<EndpointRoute, ConfigError> {
    validate_url(&section.url)?;

    let url = &section.url;
    let route = match &section.events {
        None => EndpointRoute::new(url, section.connect, defaults::EVENTS.iter().copied()),
        Some(events) if events.is_empty() => {
            return Err(ConfigError::EmptyEvents { url: url.clone() });
        }
        Some(events) => EndpointRoute::new(url, section.connect, events.iter().cloned()),
    };

    section
        .headers
        .iter()
        .try_fold(route, |route, (name, value)| {
            validate_header(name, value)?;
            Ok(route.with_header(name, value))
        })
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    Url::parse(url).map(|_| ()).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // The first separator wins, so values may contain '=' or ':'
    let Some(pos) = s.find(['=', ':']) else {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    };

    let (name, value) = (&s[..pos], &s[pos + 1..]);
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}
