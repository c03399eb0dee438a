//! Tests for `ReqwestClient`.
//!
//! Requests go to a one-shot server on a local socket, so no external
//! network access is needed.

use std::time::Duration;

use super::test_server::{accept_and_hold, serve_once, serve_truncated, unreachable_addr};
use super::{DEFAULT_TIMEOUT, HttpClient, HttpError, HttpRequest, ReqwestClient};

fn url_for(addr: std::net::SocketAddr) -> url::Url {
    url::Url::parse(&format!("http://{addr}/webhook")).unwrap()
}

/// Transport that ignores any proxy configured in the environment.
fn local_client() -> ReqwestClient {
    let inner = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    ReqwestClient::from_client(inner)
}

mod construction {
    use super::*;

    #[test]
    fn new_uses_default_timeout() {
        let client = ReqwestClient::new();

        assert_eq!(client.timeout(), Some(DEFAULT_TIMEOUT));
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn default_creates_same_as_new() {
        assert_eq!(ReqwestClient::default().timeout(), ReqwestClient::new().timeout());
    }

    #[test]
    fn with_timeout_overrides_timeout() {
        let client = ReqwestClient::with_timeout(Duration::from_secs(5));

        assert_eq!(client.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn with_request_timeout_sets_timeout_on_existing_client() {
        let client = ReqwestClient::from_client(reqwest::Client::new())
            .with_request_timeout(Duration::from_millis(250));

        assert_eq!(client.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn from_client_adds_no_timeout() {
        let client = ReqwestClient::from_client(reqwest::Client::new());

        assert_eq!(client.timeout(), None);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }
}

mod requests {
    use super::*;

    #[tokio::test]
    async fn sends_body_and_every_header_value() {
        let (addr, server) = serve_once(200, "ok").await;
        let client = local_client();

        let request = HttpRequest::post(url_for(addr))
            .with_body(b"{\"id\":\"evt_1\"}".to_vec())
            .with_header(
                http::HeaderName::from_static("x-multi"),
                http::HeaderValue::from_static("one"),
            )
            .with_header(
                http::HeaderName::from_static("x-multi"),
                http::HeaderValue::from_static("two"),
            );

        let response = client.request(request).await.unwrap();
        let captured = server.await.unwrap();

        assert_eq!(response.status, http::StatusCode::OK);
        assert_eq!(response.body_text(), Some("ok"));
        assert!(captured.request_line.starts_with("POST /webhook"));
        assert_eq!(captured.body, b"{\"id\":\"evt_1\"}");

        let values = captured.header_values("x-multi");
        let joined = values.join(",");
        assert!(joined.contains("one"), "got {values:?}");
        assert!(joined.contains("two"), "got {values:?}");
    }

    #[tokio::test]
    async fn server_error_status_is_a_response_not_an_error() {
        let (addr, server) = serve_once(500, "boom").await;
        let client = local_client();

        let response = client
            .request(HttpRequest::post(url_for(addr)))
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(response.status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body_text(), Some("boom"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_connection_error() {
        let addr = unreachable_addr().await;
        let client = local_client();

        let result = client.request(HttpRequest::post(url_for(addr))).await;

        assert!(
            matches!(result, Err(HttpError::Connection(_))),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn silent_server_is_a_timeout() {
        let (addr, server) = accept_and_hold().await;
        let client = ReqwestClient::from_client(
            reqwest::Client::builder().no_proxy().build().unwrap(),
        )
        .with_request_timeout(Duration::from_millis(100));

        let result = client.request(HttpRequest::post(url_for(addr))).await;
        server.abort();

        assert!(matches!(result, Err(HttpError::Timeout)), "got {result:?}");
    }

    #[tokio::test]
    async fn truncated_body_is_a_connection_error() {
        let (addr, server) = serve_truncated().await;
        let client = local_client();

        let result = client.request(HttpRequest::post(url_for(addr))).await;
        server.await.unwrap();

        assert!(
            matches!(result, Err(HttpError::Connection(_))),
            "got {result:?}"
        );
    }
}
