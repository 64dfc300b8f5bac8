//! End-to-end discovery against mock Overpass servers.

use std::sync::Arc;
use std::time::Duration;

use bearings::discovery::{
    Coordinator, Delivered, DiscoveryRequest, DiscoverySettings, FallbackReason, NO_CONNECTIVITY_ID,
    NO_DATA_ID,
};
use bearings::overpass::{Endpoint, HttpTransport};
use bearings::{group_by_direction, Coordinate};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);

const TWO_PLACES: &str = r#"{
    "version": 0.6,
    "generator": "Overpass API",
    "elements": [
        {"type": "node", "id": 10, "lat": 48.8600, "lon": 2.3522,
         "tags": {"name": "North Café", "amenity": "cafe"}},
        {"type": "way", "id": 20,
         "geometry": [{"lat": 48.8566, "lon": 2.3600}, {"lat": 48.8570, "lon": 2.3605}],
         "tags": {"name": "East Garden", "leisure": "garden"}}
    ]
}"#;

async fn interpreter(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn endpoint(name: &str, server: &MockServer) -> Endpoint {
    Endpoint::new(name, format!("{}/api/interpreter", server.uri()))
}

fn coordinator(endpoints: Vec<Endpoint>, probe_url: Option<String>) -> Coordinator {
    let settings = DiscoverySettings {
        endpoints,
        probe_url,
        probe_timeout: Duration::from_secs(2),
        attempt_timeout: Duration::from_secs(5),
        backoff: Duration::from_millis(10),
        server_timeout_secs: 25,
    };
    let transport = HttpTransport::new("bearings-tests/0.1").unwrap();
    Coordinator::new(Arc::new(transport), settings)
}

#[tokio::test]
async fn fails_over_to_healthy_endpoint() {
    let broken = interpreter(500, "Internal Server Error").await;
    let busy = interpreter(504, "Gateway Timeout").await;
    let healthy = interpreter(200, TWO_PLACES).await;

    let coordinator = coordinator(
        vec![
            endpoint("broken", &broken),
            endpoint("busy", &busy),
            endpoint("healthy", &healthy),
        ],
        None,
    );

    let discovery = coordinator
        .discover(&DiscoveryRequest::new(PARIS), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        discovery.outcome,
        Delivered::Real {
            endpoint: "healthy".into()
        }
    );
    assert_eq!(discovery.places.len(), 2);
    assert!(discovery.places[0].distance <= discovery.places[1].distance);

    let groups = group_by_direction(&discovery.places, &PARIS);
    let labels: Vec<&str> = groups.iter().map(|g| g.direction()).collect();
    assert_eq!(labels, vec!["N", "E"]);
}

#[tokio::test]
async fn posts_compiled_query_as_form_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(body_string_contains("data=%5Bout%3Ajson%5D"))
        .and(body_string_contains("around%3A1000%2C48.856600%2C2.352200"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_PLACES))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = coordinator(vec![endpoint("main", &server)], None)
        .discover(&DiscoveryRequest::new(PARIS), &CancellationToken::new())
        .await
        .unwrap();

    assert!(discovery.is_real());
}

#[tokio::test]
async fn malformed_and_empty_responses_end_in_no_data() {
    let garbage = interpreter(200, "<html>rate limited</html>").await;
    let empty = interpreter(200, r#"{"elements": []}"#).await;

    let discovery = coordinator(
        vec![endpoint("garbage", &garbage), endpoint("empty", &empty)],
        None,
    )
    .discover(&DiscoveryRequest::new(PARIS), &CancellationToken::new())
    .await
    .unwrap();

    assert_eq!(
        discovery.outcome,
        Delivered::Fallback {
            reason: FallbackReason::NoData
        }
    );
    assert_eq!(discovery.places.len(), 1);
    assert_eq!(discovery.places[0].id, NO_DATA_ID);
}

#[tokio::test]
async fn unreachable_probe_reports_no_connectivity() {
    let healthy = interpreter(200, TWO_PLACES).await;

    // Nothing listens on port 9 (discard) on loopback
    let discovery = coordinator(
        vec![endpoint("healthy", &healthy)],
        Some("http://127.0.0.1:9/status".to_string()),
    )
    .discover(&DiscoveryRequest::new(PARIS), &CancellationToken::new())
    .await
    .unwrap();

    assert_eq!(
        discovery.outcome,
        Delivered::Fallback {
            reason: FallbackReason::NoConnectivity
        }
    );
    assert_eq!(discovery.places[0].id, NO_CONNECTIVITY_ID);
    assert!(healthy.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn reachable_probe_lets_discovery_through() {
    let healthy = interpreter(200, TWO_PLACES).await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Connected as: 1"))
        .mount(&healthy)
        .await;

    let discovery = coordinator(
        vec![endpoint("healthy", &healthy)],
        Some(format!("{}/api/status", healthy.uri())),
    )
    .discover(&DiscoveryRequest::new(PARIS), &CancellationToken::new())
    .await
    .unwrap();

    assert!(discovery.is_real());
}

#[tokio::test]
async fn slow_endpoint_times_out_and_fails_over() {
    let slow = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(TWO_PLACES)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&slow)
        .await;
    let healthy = interpreter(200, TWO_PLACES).await;

    let settings = DiscoverySettings {
        endpoints: vec![endpoint("slow", &slow), endpoint("healthy", &healthy)],
        probe_url: None,
        probe_timeout: Duration::from_secs(1),
        attempt_timeout: Duration::from_millis(300),
        backoff: Duration::from_millis(10),
        server_timeout_secs: 25,
    };
    let coordinator = Coordinator::new(
        Arc::new(HttpTransport::new("bearings-tests/0.1").unwrap()),
        settings,
    );

    let discovery = coordinator
        .discover(&DiscoveryRequest::new(PARIS), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        discovery.outcome,
        Delivered::Real {
            endpoint: "healthy".into()
        }
    );
}
