#![allow(clippy::unwrap_used)]
// Integration tests for `ValetudoClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use tokio_test::assert_ok;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use valetudo_api::models::StatusResponse;
use valetudo_api::{Endpoint, Error, Transport, TransportConfig, ValetudoClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ValetudoClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ValetudoClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_current_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/current_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": 8,
            "battery": 100,
            "fan_power": 102,
            "clean_area": 41_250_000,
            "in_cleaning": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = client.send(Endpoint::CurrentStatus, None).await.unwrap();
    let status: StatusResponse = serde_json::from_value(value).unwrap();

    assert_eq!(status.state, 8);
    assert_eq!(status.battery, 100);
    assert_eq!(status.fan_power, 102);
    assert_eq!(status.extra.get("in_cleaning"), Some(&json!(0)));
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/vacuum/", server.uri())).unwrap();
    let client = ValetudoClient::with_client(reqwest::Client::new(), base_url);

    Mock::given(method("GET"))
        .and(path("/vacuum/api/get_fw_version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "version": "0.10.9" })))
        .expect(1)
        .mount(&server)
        .await;

    let value = client.send(Endpoint::GetFirmwareVersion, None).await.unwrap();
    assert_eq!(value["version"], "0.10.9");
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_put_with_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/fanspeed"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "speed": 103 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let value = assert_ok!(
        client
            .request(Endpoint::FanSpeed, Some(json!({ "speed": 103 })))
            .await
    );
    assert_eq!(value, json!("ok"));
}

#[tokio::test]
async fn test_empty_body_is_a_parse_error() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/find_robot"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client.send(Endpoint::FindRobot, None).await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.is_empty()),
        "got: {err:?}"
    );
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/start_cleaning"))
        .respond_with(ResponseTemplate::new(500).set_body_string("robot busy"))
        .mount(&server)
        .await;

    let result = client.send(Endpoint::StartCleaning, None).await;

    match result {
        Err(Error::Http { status, ref body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("robot busy"), "unexpected body: {body}");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/current_status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.send(Endpoint::CurrentStatus, None).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("not json"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind and drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = ValetudoClient::with_client(reqwest::Client::new(), base_url);

    let err = client.send(Endpoint::CurrentStatus, None).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_connect());
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_request_timeout() {
    let (server, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/current_status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "state": 3, "battery": 90 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig {
        timeout: Duration::from_millis(100),
        ..TransportConfig::default()
    };
    let client = ValetudoClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    let err = client.send(Endpoint::CurrentStatus, None).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
}
