//! Application execution logic.
//!
//! This module reads the event body, builds the router from the validated
//! routes and forwards the event to every matching endpoint.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::Dispatch;

use endpoint_proxy::config::ValidatedConfig;
use endpoint_proxy::proxy::{
    EndpointConfig, EndpointRoute, ForwardedEvent, HttpClient, LoggingHandler, ReqwestClient,
    Router,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to read the event body.
    #[error("Failed to read event body from {source_name}: {source}")]
    ReadBody {
        /// File path, or `stdin`
        source_name: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No route accepts the event.
    #[error("No endpoint accepts event type '{event_type}'")]
    NoMatchingRoute {
        /// Event type that was not matched
        event_type: String,
    },

    /// At least one endpoint could not be reached.
    #[error("{failed} of {total} deliveries failed")]
    DeliveryFailed {
        /// Number of failed deliveries
        failed: usize,
        /// Number of attempted deliveries
        total: usize,
    },
}

/// Executes one `forward` run.
///
/// # Errors
///
/// Returns an error if:
/// - The event body cannot be read
/// - No route accepts the event
/// - Any endpoint fails at the transport level
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let ValidatedConfig {
        routes,
        timeout,
        mut event,
        body_file,
    } = config;

    event.body = read_body(body_file.as_deref()).await?;

    let router = create_router(routes, timeout);
    forward(&router, &event).await
}

/// Reads the event body from `path`, or from stdin when `None`.
async fn read_body(path: Option<&Path>) -> Result<Vec<u8>, RunError> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(|e| RunError::ReadBody {
                source_name: path.display().to_string(),
                source: e,
            }),
        None => {
            let mut body = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut body)
                .await
                .map_err(|e| RunError::ReadBody {
                    source_name: "stdin".to_string(),
                    source: e,
                })?;
            Ok(body)
        }
    }
}

/// Creates the router with the application's transport and log output.
fn create_router(routes: Vec<EndpointRoute>, timeout: Duration) -> Router<ReqwestClient> {
    // Clients log into whatever subscriber main installed
    let log = tracing::dispatcher::get_default(Dispatch::clone);

    let config = EndpointConfig::default()
        .with_http_client(ReqwestClient::with_timeout(timeout))
        .with_log(log)
        .with_response_handler(LoggingHandler);

    Router::new(routes, config)
}

/// Forwards `event` through `router` and reports the outcome.
async fn forward<H: HttpClient>(
    router: &Router<H>,
    event: &ForwardedEvent,
) -> Result<(), RunError> {
    if !router.matches(event.connect, &event.event_type) {
        return Err(RunError::NoMatchingRoute {
            event_type: event.event_type.clone(),
        });
    }

    let deliveries = router.forward(event).await;
    let total = deliveries.len();
    let failed = deliveries.iter().filter(|d| !d.is_delivered()).count();

    for delivery in &deliveries {
        match &delivery.result {
            Ok(()) => tracing::debug!("Delivered to {}", delivery.url),
            Err(e) => tracing::error!("Delivery to {} failed: {e}", delivery.url),
        }
    }

    if failed > 0 {
        return Err(RunError::DeliveryFailed { failed, total });
    }

    tracing::info!("Forwarded {} to {total} endpoint(s)", event.event_type);
    Ok(())
}

