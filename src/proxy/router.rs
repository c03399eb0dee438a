//! Fan-out of one event to every matching endpoint.

use std::sync::Arc;

use tracing::Dispatch;

use super::discard::discard;
use super::{EndpointClient, EndpointConfig, HttpClient, HttpError, ReqwestClient};

/// Static description of one local endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRoute {
    /// URL events are POSTed to
    pub url: String,
    /// Whether this route serves the connect channel
    pub connect: bool,
    /// Accepted event types (`"*"` for all)
    pub events: Vec<String>,
    /// Headers sent with every event, ahead of the event's own headers
    pub headers: Vec<(String, String)>,
}

impl EndpointRoute {
    /// Creates a route with no static headers.
    #[must_use]
    pub fn new<I, S>(url: impl Into<String>, connect: bool, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url: url.into(),
            connect,
            events: events.into_iter().map(Into::into).collect(),
            headers: Vec::new(),
        }
    }

    /// Adds a static header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// An event to forward.
#[derive(Debug, Clone, Default)]
pub struct ForwardedEvent {
    /// Identifier used for log correlation and handed to the response handler
    pub id: String,
    /// Event type matched against each route's event set
    pub event_type: String,
    /// Delivery channel of the event
    pub connect: bool,
    /// Opaque payload
    pub body: Vec<u8>,
    /// Headers sent with the payload
    pub headers: Vec<(String, String)>,
}

/// Outcome of forwarding an event to one endpoint.
#[derive(Debug)]
pub struct Delivery {
    /// URL of the endpoint
    pub url: String,
    /// Result of [`EndpointClient::post`]
    pub result: Result<(), HttpError>,
}

impl Delivery {
    /// Returns true if the endpoint answered (with any status).
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
struct RoutedEndpoint<H> {
    client: EndpointClient<Arc<H>>,
    headers: Vec<(String, String)>,
}

/// Set of endpoint clients sharing one transport and one response handler.
///
/// Events are delivered sequentially in route order. A failed delivery
/// never stops the remaining ones.
#[derive(Debug)]
pub struct Router<H = ReqwestClient> {
    endpoints: Vec<RoutedEndpoint<H>>,
    log: Dispatch,
}

impl<H: HttpClient + Default> Router<H> {
    /// Builds one [`EndpointClient`] per route.
    ///
    /// `config` is resolved once: the transport is created (or taken) a
    /// single time and shared by every client, as are the handler and log
    /// dispatcher.
    #[must_use]
    pub fn new(
        routes: impl IntoIterator<Item = EndpointRoute>,
        config: EndpointConfig<H>,
    ) -> Self {
        let http_client = Arc::new(config.http_client.unwrap_or_default());
        let log = config.log.unwrap_or_else(discard);

        let endpoints = routes
            .into_iter()
            .map(|route| {
                let endpoint_config = EndpointConfig {
                    http_client: Some(Arc::clone(&http_client)),
                    log: Some(log.clone()),
                    response_handler: config.response_handler.clone(),
                };

                RoutedEndpoint {
                    client: EndpointClient::new(
                        route.url,
                        route.connect,
                        route.events,
                        endpoint_config,
                    ),
                    headers: route.headers,
                }
            })
            .collect();

        Self { endpoints, log }
    }
}

impl<H> Router<H> {
    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns true if there are no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Returns the clients in route order.
    pub fn clients(&self) -> impl Iterator<Item = &EndpointClient<Arc<H>>> {
        self.endpoints.iter().map(|e| &e.client)
    }

    /// Returns true if at least one route accepts the event.
    #[must_use]
    pub fn matches(&self, connect: bool, event_type: &str) -> bool {
        self.clients()
            .any(|client| client.supports_event_type(connect, event_type))
    }
}

impl<H: HttpClient> Router<H> {
    /// Posts `event` to every endpoint that supports its type and channel.
    ///
    /// Returns one [`Delivery`] per endpoint that was attempted; skipped
    /// endpoints do not appear.
    pub async fn forward(&self, event: &ForwardedEvent) -> Vec<Delivery> {
        let mut deliveries = Vec::new();

        for endpoint in &self.endpoints {
            let client = &endpoint.client;
            if !client.supports_event_type(event.connect, &event.event_type) {
                tracing::dispatcher::with_default(&self.log, || {
                    tracing::debug!(
                        webhook_id = %event.id,
                        event_type = %event.event_type,
                        url = client.url(),
                        "Endpoint does not accept event, skipping"
                    );
                });
                continue;
            }

            let headers = endpoint
                .headers
                .iter()
                .chain(&event.headers)
                .map(|(name, value)| (name.as_str(), value.as_str()));

            let result = client.post(&event.id, event.body.clone(), headers).await;
            deliveries.push(Delivery {
                url: client.url().to_string(),
                result,
            });
        }

        deliveries
    }
}
