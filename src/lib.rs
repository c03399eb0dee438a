//! endpoint-proxy: forward webhook events to local endpoints
//!
//! A library for delivering webhook events to local HTTP endpoints,
//! filtered by event type and delivery channel.

pub mod config;
pub mod proxy;
