//! API client contract tests against a local mock server.

#![allow(clippy::unwrap_used)] // Test code can unwrap

use lorekeeper_client::api::{ApiClient, NoHeaders};
use lorekeeper_client::request::Params;
use lorekeeper_core::error::{ErrorType, RequestError};
use lorekeeper_core::response::Response;
use lorekeeper_testing::StaticHeaders;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params_from(value: Value) -> Params {
    value.as_object().unwrap().clone()
}

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Arc::new(NoHeaders))
}

#[tokio::test]
async fn decodes_a_success_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rockets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": [{"name": "Imp IV"}],
        })))
        .mount(&server)
        .await;

    let response = client_for(&server).await.get("rockets", Params::new()).await;

    assert_eq!(response, Response::success(json!([{"name": "Imp IV"}])));
}

#[tokio::test]
async fn member_paths_interpolate_wildcards_and_keep_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rockets/7"))
        .and(query_param("include", "engines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": {"name": "Imp IV"},
        })))
        .mount(&server)
        .await;

    let params = params_from(json!({"id": 7, "include": "engines"}));
    let response = client_for(&server).await.get("rockets/:id", params).await;

    assert!(response.is_success());
}

#[tokio::test]
async fn mutations_send_the_remaining_params_as_a_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rockets"))
        .and(body_json(json!({"name": "Imp IV", "fuel": 100})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ok": true,
            "data": {"id": 1, "name": "Imp IV", "fuel": 100},
        })))
        .mount(&server)
        .await;

    let params = params_from(json!({"name": "Imp IV", "fuel": 100}));
    let response = client_for(&server).await.post("rockets", params).await;

    assert!(response.is_success());
}

#[tokio::test]
async fn error_envelopes_become_api_failures_with_partial_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rockets"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "ok": false,
            "error": {
                "type": ErrorType::INVALID_PARAMETERS,
                "message": "Rocket is invalid",
                "data": {"errors": {"name": ["can't be blank"]}},
            },
            "data": {"name": ""},
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .post("rockets", params_from(json!({"name": ""})))
        .await;

    assert!(response.is_failure());
    assert_eq!(
        response.error_type().map(ErrorType::as_str),
        Some(ErrorType::INVALID_PARAMETERS)
    );
    assert_eq!(response.data(), Some(&json!({"name": ""})));

    let validation = response
        .error()
        .and_then(RequestError::as_api)
        .and_then(|api| api.validation_errors())
        .unwrap();
    assert_eq!(validation["name"], vec!["can't be blank"]);
}

#[tokio::test]
async fn injected_headers_ride_along_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rockets"))
        .and(header("Authorization", "Bearer 12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": [],
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri(), Arc::new(StaticHeaders::bearer("12345")));
    let response = client.get("rockets", Params::new()).await;

    assert!(response.is_success());
}

#[tokio::test]
async fn non_envelope_bodies_are_decode_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rockets"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let response = client_for(&server).await.get("rockets", Params::new()).await;

    let error = response.error().unwrap();
    assert!(matches!(error, RequestError::Decode(_)));
    assert!(error.is_errored());
}

#[tokio::test]
async fn network_failures_surface_as_transport_errors() {
    // Nothing listens on this port.
    let client = ApiClient::new("http://127.0.0.1:9", Arc::new(NoHeaders));

    let response = client.get("rockets", Params::new()).await;

    let error = response.error().unwrap();
    assert!(matches!(error, RequestError::Transport(_)));
}

#[tokio::test]
async fn delete_with_no_body_settles_with_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rockets/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .await
        .delete("rockets/:id", params_from(json!({"id": 7})))
        .await;

    assert_eq!(response, Response::success(Value::Null));
}
