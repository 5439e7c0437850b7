//! Scripted in-process backend operations.
//!
//! Stands in for the campaign server so the demo runs offline. Each
//! operation settles the same way the HTTP client would: structured
//! API errors for business failures, transport errors for
//! connectivity, data payloads on success.

use crate::types::Rocket;
use lorekeeper_client::request::Params;
use lorekeeper_core::error::{ApiError, ErrorType, RequestError};
use lorekeeper_core::middleware::{Operation, operation};
use lorekeeper_core::response::Response;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// The password the scripted server accepts.
pub const DEMO_PASSWORD: &str = "hunter2";

/// Login mutation: succeeds when the password is [`DEMO_PASSWORD`].
#[must_use]
pub fn login_operation() -> Operation<Params, Value> {
    operation(|params: Params| async move {
        let username = params
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or("adventurer")
            .to_string();
        let password = params.get("password").and_then(Value::as_str);

        if password == Some(DEMO_PASSWORD) {
            Response::success(json!({
                "token": "scripted-token-12345",
                "user": {
                    "id": Uuid::new_v4(),
                    "email": format!("{}@example.com", username.to_lowercase()),
                    "username": username,
                    "role": "user",
                },
            }))
        } else {
            Response::failure(RequestError::from(ApiError::new(
                ErrorType::FAILED_LOGIN,
                "invalid credentials",
            )))
        }
    })
}

/// Logout mutation: always succeeds with an empty payload.
#[must_use]
pub fn logout_operation() -> Operation<Params, Value> {
    operation(|_params: Params| async move { Response::success(Value::Null) })
}

/// Rockets index: unreachable on the first call, then serves the
/// hangar — made flaky on purpose so the demo can show the retrying
/// lifecycle.
#[must_use]
pub fn flaky_rockets_operation() -> Operation<Params, Value> {
    let attempts = Arc::new(AtomicUsize::new(0));

    operation(move |_params: Params| {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Response::failure(RequestError::transport("the hangar is unreachable"))
            } else {
                Response::success(serde_json::to_value(sample_rockets()).unwrap_or(Value::Null))
            }
        }
    })
}

/// The hangar's contents.
#[must_use]
pub fn sample_rockets() -> Vec<Rocket> {
    vec![
        Rocket {
            id: Uuid::new_v4(),
            name: "Imp IV".to_string(),
            fuel: 100,
        },
        Rocket {
            id: Uuid::new_v4(),
            name: "Falchion".to_string(),
            fuel: 40,
        },
        Rocket {
            id: Uuid::new_v4(),
            name: "Hellion Queen".to_string(),
            fuel: 0,
        },
    ]
}
