//! Client that POSTs forwarded events to one local endpoint.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use http::{HeaderName, HeaderValue};
use tracing::Dispatch;
use tracing::instrument::WithSubscriber;

use super::discard::discard;
use super::{HttpClient, HttpError, HttpRequest, NoopHandler, ReqwestClient, ResponseHandler};

/// Event-set member that makes an endpoint accept every event type.
pub const WILDCARD: &str = "*";

/// Optional collaborators of an [`EndpointClient`].
///
/// Every field left as `None` is filled in once by [`EndpointClient::new`]:
/// - `http_client`: `H::default()` ([`ReqwestClient`] uses a 30 second timeout)
/// - `log`: a shared dispatcher that discards all output
/// - `response_handler`: [`NoopHandler`]
pub struct EndpointConfig<H = ReqwestClient> {
    /// Transport used to execute requests
    pub http_client: Option<H>,

    /// Dispatcher that receives the client's log events
    pub log: Option<Dispatch>,

    /// Callback invoked with every received response
    pub response_handler: Option<Arc<dyn ResponseHandler>>,
}

impl<H> Default for EndpointConfig<H> {
    fn default() -> Self {
        Self {
            http_client: None,
            log: None,
            response_handler: None,
        }
    }
}

impl<H> EndpointConfig<H> {
    /// Sets the transport.
    #[must_use]
    pub fn with_http_client(mut self, client: H) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the log dispatcher.
    #[must_use]
    pub fn with_log(mut self, log: impl Into<Dispatch>) -> Self {
        self.log = Some(log.into());
        self
    }

    /// Sets the response handler.
    #[must_use]
    pub fn with_response_handler(mut self, handler: impl ResponseHandler + 'static) -> Self {
        self.response_handler = Some(Arc::new(handler));
        self
    }

    /// Sets a response handler that is shared with other clients.
    #[must_use]
    pub fn with_shared_response_handler(mut self, handler: Arc<dyn ResponseHandler>) -> Self {
        self.response_handler = Some(handler);
        self
    }
}

impl<H: fmt::Debug> fmt::Debug for EndpointConfig<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("http_client", &self.http_client)
            .field("log", &self.log.is_some())
            .field("response_handler", &self.response_handler.is_some())
            .finish()
    }
}

/// Fully populated configuration; never re-checked per call.
struct ResolvedConfig<H> {
    http_client: H,
    log: Dispatch,
    response_handler: Arc<dyn ResponseHandler>,
}

/// Client used to POST webhook events to a local endpoint.
///
/// The routing identity (URL, connect flag, event set) is fixed at
/// construction. A client is `Sync` whenever its transport is, so one
/// instance can serve concurrent deliveries.
///
/// # Example
///
/// ```no_run
/// use endpoint_proxy::proxy::{EndpointClient, EndpointConfig};
///
/// # async fn example() -> Result<(), endpoint_proxy::proxy::HttpError> {
/// let client: EndpointClient = EndpointClient::new(
///     "http://localhost:4242/webhook",
///     false,
///     ["invoice.created", "invoice.paid"],
///     EndpointConfig::default(),
/// );
///
/// if client.supports_event_type(false, "invoice.paid") {
///     client
///         .post("evt_123", b"{}".to_vec(), [("Content-Type", "application/json")])
///         .await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct EndpointClient<H = ReqwestClient> {
    url: String,
    connect: bool,
    events: HashSet<String>,
    cfg: ResolvedConfig<H>,
}

impl<H: HttpClient + Default> EndpointClient<H> {
    /// Creates a client, resolving every unset field of `config` to its default.
    ///
    /// The URL is not validated here; a malformed URL is reported by
    /// [`post`](Self::post). Duplicate event types collapse.
    #[must_use]
    pub fn new<I, S>(
        url: impl Into<String>,
        connect: bool,
        events: I,
        config: EndpointConfig<H>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cfg = ResolvedConfig {
            http_client: config.http_client.unwrap_or_default(),
            log: config.log.unwrap_or_else(discard),
            response_handler: config
                .response_handler
                .unwrap_or_else(|| Arc::new(NoopHandler)),
        };

        Self {
            url: url.into(),
            connect,
            events: to_event_set(events),
            cfg,
        }
    }
}

impl<H> EndpointClient<H> {
    /// Returns the URL requests are POSTed to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the delivery channel this client serves.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        self.connect
    }

    /// Returns the accepted event types.
    #[must_use]
    pub const fn events(&self) -> &HashSet<String> {
        &self.events
    }

    /// Reports whether an event of `event_type` on the `connect` channel
    /// should be delivered to this endpoint.
    ///
    /// Matching is exact and case-sensitive; the [`WILDCARD`] member
    /// matches everything on the client's own channel.
    #[must_use]
    pub fn supports_event_type(&self, connect: bool, event_type: &str) -> bool {
        if connect != self.connect {
            return false;
        }

        self.events.contains(WILDCARD) || self.events.contains(event_type)
    }

    fn build_request<I, K, V>(&self, body: Vec<u8>, headers: I) -> Result<HttpRequest, HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = url::Url::parse(&self.url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {e}", self.url)))?;

        let mut request = HttpRequest::post(url).with_body(body);
        for (name, value) in headers {
            let (name, value) = (name.as_ref(), value.as_ref());
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| HttpError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            request = request.with_header(header_name, header_value);
        }

        Ok(request)
    }
}

impl<H: HttpClient> EndpointClient<H> {
    /// Sends one event to the endpoint.
    ///
    /// The body is sent unmodified and every header pair is appended as
    /// given; nothing is added. Any received response, whatever its status,
    /// is handed to the response handler and counts as a delivery.
    ///
    /// # Errors
    ///
    /// - [`HttpError::InvalidUrl`] / [`HttpError::InvalidHeader`] if the
    ///   request cannot be built; nothing is sent.
    /// - [`HttpError::Connection`] / [`HttpError::Timeout`] if the transport
    ///   fails; the failure is logged at error level.
    ///
    /// The handler is not invoked in either case.
    pub async fn post<I, K, V>(
        &self,
        webhook_id: &str,
        body: impl Into<Vec<u8>>,
        headers: I,
    ) -> Result<(), HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let request = tracing::dispatcher::with_default(&self.cfg.log, || {
            tracing::debug!(
                webhook_id,
                url = %self.url,
                "Forwarding event to local endpoint"
            );
            self.build_request(body.into(), headers)
        })?;

        self.send(webhook_id, request)
            .with_subscriber(self.cfg.log.clone())
            .await
    }

    async fn send(&self, webhook_id: &str, request: HttpRequest) -> Result<(), HttpError> {
        let response = match self.cfg.http_client.request(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    webhook_id,
                    url = %self.url,
                    error = %e,
                    "Failed to POST event to local endpoint"
                );
                return Err(e);
            }
        };

        // `response` is dropped on every exit from here, unwinding included.
        self.cfg
            .response_handler
            .process_response(webhook_id, &response);

        Ok(())
    }
}

impl<H> fmt::Debug for EndpointClient<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointClient")
            .field("url", &self.url)
            .field("connect", &self.connect)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

fn to_event_set<I, S>(events: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    events.into_iter().map(Into::into).collect()
}
