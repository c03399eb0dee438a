//! Forwarding of webhook events to local HTTP endpoints.
//!
//! This module provides types and traits for:
//! - Delivering events to one endpoint ([`EndpointClient`], [`EndpointConfig`])
//! - Fanning an event out to many endpoints ([`Router`], [`EndpointRoute`])
//! - Handling endpoint responses ([`ResponseHandler`])
//! - Abstracting the HTTP transport ([`HttpClient`], [`HttpRequest`], [`HttpResponse`])
//! - Production transport implementation ([`ReqwestClient`])

mod client;
mod discard;
mod endpoint;
mod error;
mod handler;
mod http;
mod router;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod test_server;

pub use client::{DEFAULT_TIMEOUT, ReqwestClient};
pub use endpoint::{EndpointClient, EndpointConfig, WILDCARD};
pub use error::HttpError;
pub use handler::{LoggingHandler, NoopHandler, ResponseHandler};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use router::{Delivery, EndpointRoute, ForwardedEvent, Router};
