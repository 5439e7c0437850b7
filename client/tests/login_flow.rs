//! End-to-end login flow through the request pipeline.
//!
//! Exercises the session middleware against scripted mutations: a
//! failed login must only display the authentication alert, while a
//! successful one must dispatch the session, persist it, and dismiss
//! the alert.

#![allow(clippy::unwrap_used)] // Test code can unwrap

use lorekeeper_client::env::KeyValueStorage;
use lorekeeper_client::request::{Params, RequestConfig, RequestMetadata};
use lorekeeper_client::session::{
    SESSION_ALERT_CONTEXT, SESSION_STORAGE_KEY, Session, SessionMiddlewareBuilder, User,
};
use lorekeeper_core::alerts::AlertKind;
use lorekeeper_core::error::{ApiError, ErrorType, RequestError};
use lorekeeper_core::response::Response;
use lorekeeper_testing::{TestEnv, scripted_operation};
use serde_json::{Value, json};
use uuid::Uuid;

fn credentials(username: &str, password: &str) -> Params {
    let mut params = Params::new();
    params.insert("username".to_string(), json!(username));
    params.insert("password".to_string(), json!(password));
    params
}

fn tron() -> Session {
    Session {
        token: "12345".to_string(),
        user: User {
            id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
            email: "tron@example.com".to_string(),
            username: "Tron".to_string(),
            role: "user".to_string(),
        },
        expires_at: None,
    }
}

fn login_request(harness: &TestEnv, responses: Vec<Response<Value>>) -> lorekeeper_client::Request {
    RequestConfig::new()
        .with_middleware(SessionMiddlewareBuilder::new())
        .with_metadata(RequestMetadata::mutation("session:create"))
        .build(scripted_operation(responses), &harness.env())
}

#[tokio::test]
async fn a_failed_login_displays_the_session_alert_and_touches_nothing_else() {
    let harness = TestEnv::new();
    let login = login_request(
        &harness,
        vec![Response::failure(RequestError::transport(
            "connection refused",
        ))],
    );

    let response = login.call(credentials("Tron", "wrong")).await;

    assert!(response.is_failure());
    assert!(harness.dispatcher().actions().is_empty());
    assert!(harness.storage().is_empty());

    let alert = harness
        .alerts()
        .displayed_with_context(SESSION_ALERT_CONTEXT)
        .unwrap();
    assert_eq!(
        alert.message,
        "User not found with the provided username and password."
    );
    assert_eq!(alert.icon.as_deref(), Some("user-slash"));
    assert_eq!(alert.kind, AlertKind::Failure);
    assert!(harness.alerts().dismissed().is_empty());
}

#[tokio::test]
async fn a_successful_login_establishes_the_session() {
    let harness = TestEnv::new();
    let session = tron();
    let login = login_request(
        &harness,
        vec![Response::success(serde_json::to_value(&session).unwrap())],
    );

    let response = login.call(credentials("Tron", "secret")).await;

    assert!(response.is_success());
    assert_eq!(harness.dispatcher().created_session(), Some(session.clone()));
    assert_eq!(
        harness.storage().get_item(SESSION_STORAGE_KEY),
        Some(serde_json::to_string(&session).unwrap())
    );
    assert!(harness.alerts().dismissed_context(SESSION_ALERT_CONTEXT));
    assert!(harness.alerts().displayed().is_empty());
}

#[tokio::test]
async fn retrying_a_failed_login_clears_the_alert_on_success() {
    let harness = TestEnv::new();
    let session = tron();
    let login = login_request(
        &harness,
        vec![
            Response::failure(RequestError::from(ApiError::new(
                ErrorType::FAILED_LOGIN,
                "invalid credentials",
            ))),
            Response::success(serde_json::to_value(&session).unwrap()),
        ],
    );

    let first = login.call(credentials("Tron", "wrong")).await;
    assert!(first.is_failure());
    assert!(
        harness
            .alerts()
            .displayed_with_context(SESSION_ALERT_CONTEXT)
            .is_some()
    );

    let second = login.call(credentials("Tron", "secret")).await;
    assert!(second.is_success());
    assert!(harness.alerts().dismissed_context(SESSION_ALERT_CONTEXT));
    assert_eq!(harness.dispatcher().created_session(), Some(session));
}

#[tokio::test]
async fn the_response_flows_through_the_session_middleware_unchanged() {
    let harness = TestEnv::new();
    let payload = serde_json::to_value(tron()).unwrap();
    let login = login_request(&harness, vec![Response::success(payload.clone())]);

    let response = login.call(credentials("Tron", "secret")).await;

    assert_eq!(response, Response::success(payload));
}
