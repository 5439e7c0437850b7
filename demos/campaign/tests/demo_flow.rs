//! Drives the demo's scripted backend through the real pipeline.

#![allow(clippy::unwrap_used)] // Test code can unwrap

use campaign::backend;
use lorekeeper_client::request::{Params, RequestConfig};
use lorekeeper_client::resources::{ResourceConfig, ResourceQueryBuilder};
use lorekeeper_client::session::{SESSION_ALERT_CONTEXT, SessionMiddlewareBuilder};
use lorekeeper_testing::TestEnv;
use serde_json::json;
use std::sync::Arc;

fn credentials(password: &str) -> Params {
    let mut params = Params::new();
    params.insert("username".to_string(), json!("Tron"));
    params.insert("password".to_string(), json!(password));
    params
}

#[tokio::test]
async fn the_scripted_login_round_trips_through_the_session_middleware() {
    let harness = TestEnv::new();
    let login = RequestConfig::new()
        .with_middleware(SessionMiddlewareBuilder::new())
        .build(backend::login_operation(), &harness.env());

    let response = login.call(credentials("wrong")).await;
    assert!(response.is_failure());
    assert!(
        harness
            .alerts()
            .displayed_with_context(SESSION_ALERT_CONTEXT)
            .is_some()
    );
    assert!(harness.dispatcher().created_session().is_none());

    let response = login.call(credentials(backend::DEMO_PASSWORD)).await;
    assert!(response.is_success());

    let session = harness.dispatcher().created_session().unwrap();
    assert_eq!(session.user.username, "Tron");
    assert_eq!(session.token, "scripted-token-12345");
    assert!(harness.alerts().dismissed_context(SESSION_ALERT_CONTEXT));
}

#[tokio::test]
async fn the_flaky_hangar_recovers_on_retry_with_default_alerts() {
    let harness = TestEnv::new();
    let rockets = ResourceQueryBuilder::new(ResourceConfig::new("index", "rockets"))
        .build(Arc::new(backend::flaky_rockets_operation()), harness.env());

    let first = rockets.run(Params::new()).await;
    assert!(first.is_failure());
    let alert = harness
        .alerts()
        .displayed_with_context("resources:rockets:request")
        .unwrap();
    assert_eq!(alert.message, "Unable to connect to the server.");

    let second = rockets.run(Params::new()).await;
    assert!(second.is_success());
    assert!(harness.alerts().dismissed_context("resources:rockets:request"));

    let fleet: Vec<campaign::Rocket> =
        serde_json::from_value(second.data().unwrap().clone()).unwrap();
    assert_eq!(fleet.len(), 3);
}
