//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::defaults;

/// endpoint-proxy: forward webhook events to local endpoints
///
/// Reads one event body and POSTs it to every configured endpoint
/// whose event list and channel match.
#[derive(Debug, Parser)]
#[command(name = "endpoint-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for endpoint-proxy
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forward one event to every matching endpoint
    Forward(ForwardArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Options of the `forward` subcommand.
#[derive(Debug, Clone, Args)]
pub struct ForwardArgs {
    /// Event type matched against each endpoint's event list
    #[arg(long = "event-type")]
    pub event_type: String,

    /// Identifier used in logs and handed to the response handler
    #[arg(long = "webhook-id", default_value = defaults::WEBHOOK_ID)]
    pub webhook_id: String,

    /// Deliver on the connect channel
    #[arg(long)]
    pub connect: bool,

    /// Event headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Read the event body from this file instead of stdin
    #[arg(long = "body-file")]
    pub body_file: Option<PathBuf>,

    /// Extra endpoint URL, added after the configured routes
    #[arg(long)]
    pub url: Option<String>,

    /// Event types accepted by the --url endpoint (can be specified multiple times)
    #[arg(long = "events", value_name = "TYPE", requires = "url")]
    pub events: Vec<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
