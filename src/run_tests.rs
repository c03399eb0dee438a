//! Tests for the run module.

use super::*;

use std::io::Write;

use endpoint_proxy::proxy::{HttpError, HttpRequest, HttpResponse};

/// Client double that answers every request with a fixed outcome.
#[derive(Debug, Default)]
struct ScriptedClient {
    fail: bool,
}

impl HttpClient for ScriptedClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        if self.fail {
            Err(HttpError::Connection("connection refused".into()))
        } else {
            Ok(HttpResponse::new(
                http::StatusCode::OK,
                http::HeaderMap::new(),
                vec![],
            ))
        }
    }
}

fn router(routes: Vec<EndpointRoute>, fail: bool) -> Router<ScriptedClient> {
    Router::new(
        routes,
        EndpointConfig::default().with_http_client(ScriptedClient { fail }),
    )
}

fn event(event_type: &str) -> ForwardedEvent {
    ForwardedEvent {
        id: "we_1".to_string(),
        event_type: event_type.to_string(),
        body: b"{}".to_vec(),
        ..Default::default()
    }
}

mod run_error {
    use super::*;

    #[test]
    fn no_matching_route_displays_event_type() {
        let error = RunError::NoMatchingRoute {
            event_type: "invoice.paid".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No endpoint accepts event type 'invoice.paid'"
        );
    }

    #[test]
    fn delivery_failed_displays_counts() {
        let error = RunError::DeliveryFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(error.to_string(), "1 of 3 deliveries failed");
    }

    #[test]
    fn read_body_displays_source() {
        let error = RunError::ReadBody {
            source_name: "stdin".to_string(),
            source: std::io::Error::other("closed"),
        };
        assert!(error.to_string().contains("from stdin"));
    }
}

mod body {
    use super::*;

    #[tokio::test]
    async fn reads_body_file_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"id\":\"evt_1\"}\n").unwrap();

        let body = read_body(Some(file.path())).await.unwrap();

        assert_eq!(body, b"{\"id\":\"evt_1\"}\n");
    }

    #[tokio::test]
    async fn missing_body_file_is_an_error() {
        let err = read_body(Some(Path::new("/nonexistent/event.json")))
            .await
            .unwrap_err();

        assert!(
            matches!(err, RunError::ReadBody { ref source_name, .. } if source_name == "/nonexistent/event.json")
        );
    }
}

mod forwarding {
    use super::*;

    #[tokio::test]
    async fn delivers_to_matching_routes() {
        let router = router(
            vec![
                EndpointRoute::new("http://localhost:3000/a", false, ["invoice.paid"]),
                EndpointRoute::new("http://localhost:3000/b", false, ["account.updated"]),
            ],
            false,
        );

        forward(&router, &event("invoice.paid")).await.unwrap();
    }

    #[tokio::test]
    async fn unmatched_event_is_an_error() {
        let router = router(
            vec![EndpointRoute::new(
                "http://localhost:3000/a",
                false,
                ["invoice.paid"],
            )],
            false,
        );

        let err = forward(&router, &event("charge.failed")).await.unwrap_err();

        assert!(
            matches!(err, RunError::NoMatchingRoute { ref event_type } if event_type == "charge.failed")
        );
    }

    #[tokio::test]
    async fn transport_failures_are_counted() {
        let router = router(
            vec![
                EndpointRoute::new("http://localhost:3000/a", false, ["*"]),
                EndpointRoute::new("http://localhost:3000/b", false, ["*"]),
            ],
            true,
        );

        let err = forward(&router, &event("invoice.paid")).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::DeliveryFailed {
                failed: 2,
                total: 2
            }
        ));
    }

    #[test]
    fn create_router_builds_one_client_per_route() {
        let router = create_router(
            vec![
                EndpointRoute::new("http://localhost:3000/a", false, ["*"]),
                EndpointRoute::new("http://localhost:3000/b", true, ["*"]),
            ],
            Duration::from_secs(5),
        );

        assert_eq!(router.len(), 2);
        assert!(router.matches(true, "account.updated"));
    }
}
