//! Response handler capability.

use super::HttpResponse;

/// Receives the response of every successful delivery.
///
/// Called at most once per [`EndpointClient::post`](super::EndpointClient::post),
/// and only when a response was actually received. Status interpretation
/// (4xx/5xx) is the handler's business.
///
/// Any `Fn(&str, &HttpResponse)` closure is a handler:
///
/// ```
/// use endpoint_proxy::proxy::{HttpResponse, ResponseHandler};
///
/// let handler = |webhook_id: &str, resp: &HttpResponse| {
///     println!("{webhook_id}: {}", resp.status);
/// };
/// let _: &dyn ResponseHandler = &handler;
/// ```
pub trait ResponseHandler: Send + Sync {
    /// Processes the response received for `webhook_id`.
    fn process_response(&self, webhook_id: &str, response: &HttpResponse);
}

impl<F> ResponseHandler for F
where
    F: Fn(&str, &HttpResponse) + Send + Sync,
{
    fn process_response(&self, webhook_id: &str, response: &HttpResponse) {
        self(webhook_id, response);
    }
}

/// Handler that ignores every response.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl ResponseHandler for NoopHandler {
    fn process_response(&self, _webhook_id: &str, _response: &HttpResponse) {}
}

/// Handler that reports each response status through `tracing`.
///
/// 2xx responses are logged at info level, everything else at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl ResponseHandler for LoggingHandler {
    fn process_response(&self, webhook_id: &str, response: &HttpResponse) {
        let status = response.status.as_u16();
        if response.is_success() {
            tracing::info!(webhook_id, status, "[{status}] POST [{webhook_id}]");
        } else {
            tracing::warn!(
                webhook_id,
                status,
                body = response.body_text().unwrap_or_default(),
                "[{status}] POST [{webhook_id}]"
            );
        }
    }
}
