//! The authenticated session and its request middleware.
//!
//! Logging in is an ordinary mutation through the request pipeline; the
//! session-specific behavior lives in middleware built from the matcher
//! system:
//!
//! - on success, the settled payload is decoded into a [`Session`], a
//!   [`SessionAction::Create`] is dispatched to the external store, the
//!   session is persisted, and any stale authentication alert is
//!   dismissed
//! - on failure, an `authentication:session` alert is displayed
//!
//! The response itself flows through unchanged; callers still observe
//! the full lifecycle on the request.

use crate::env::RequestEnv;
use crate::request::{MiddlewareBuilder, Params};
use chrono::{DateTime, Utc};
use lorekeeper_core::alerts::{AlertKind, AlertProps};
use lorekeeper_core::matcher::{MatchCriteria, Matcher, MatcherMiddleware};
use lorekeeper_core::middleware::Middleware;
use lorekeeper_core::response::{Response, ResponseStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Context key for authentication alerts.
pub const SESSION_ALERT_CONTEXT: &str = "authentication:session";

/// Storage key the serialized session persists under.
pub const SESSION_STORAGE_KEY: &str = "session";

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,

    /// Email address.
    pub email: String,

    /// Login name.
    pub username: String,

    /// Authorization role, e.g. `user` or `admin`.
    pub role: String,
}

/// An authenticated session: the token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token presented on subsequent requests.
    pub token: String,

    /// The authenticated user.
    pub user: User,

    /// When the token stops being valid, if the server said.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Actions the session middleware dispatches to the external store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// A login succeeded.
    Create {
        /// The newly established session.
        session: Session,
    },

    /// The session ended.
    Destroy,
}

/// The external store's dispatch seam.
///
/// The engine has no opinion about the state-management library behind
/// this; it only needs a callable that accepts an action.
pub trait SessionDispatcher: Send + Sync {
    /// Delivers one action to the store.
    fn dispatch(&self, action: SessionAction);
}

/// Builds the login middleware.
///
/// Reified against the [`RequestEnv`] once per request construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionMiddlewareBuilder;

impl SessionMiddlewareBuilder {
    /// Creates the builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MiddlewareBuilder<RequestEnv> for SessionMiddlewareBuilder {
    fn build(&self, options: &RequestEnv) -> Arc<dyn Middleware<Params, Value>> {
        let matcher = Matcher::new(
            MatchCriteria::Status(ResponseStatus::Success),
            |response: &Response<Value>, env: &RequestEnv| establish_session(response, env),
        )
        .with_fallback(Matcher::new(
            MatchCriteria::Status(ResponseStatus::Failure),
            |_response: &Response<Value>, env: &RequestEnv| {
                env.alerts().display(
                    AlertProps::new(
                        AlertKind::Failure,
                        "User not found with the provided username and password.",
                    )
                    .with_context(SESSION_ALERT_CONTEXT)
                    .with_icon("user-slash"),
                );
            },
        ));

        Arc::new(MatcherMiddleware::named("session", matcher, options.clone()))
    }
}

/// Builds the logout middleware: on success, dispatches
/// [`SessionAction::Destroy`] and removes the persisted session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearSessionMiddlewareBuilder;

impl ClearSessionMiddlewareBuilder {
    /// Creates the builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MiddlewareBuilder<RequestEnv> for ClearSessionMiddlewareBuilder {
    fn build(&self, options: &RequestEnv) -> Arc<dyn Middleware<Params, Value>> {
        let matcher = Matcher::new(
            MatchCriteria::Status(ResponseStatus::Success),
            |_response: &Response<Value>, env: &RequestEnv| {
                env.dispatcher().dispatch(SessionAction::Destroy);
                env.storage().remove_item(SESSION_STORAGE_KEY);
            },
        );

        Arc::new(MatcherMiddleware::named(
            "session:clear",
            matcher,
            options.clone(),
        ))
    }
}

fn establish_session(response: &Response<Value>, env: &RequestEnv) {
    let Some(data) = response.data() else {
        tracing::error!("login succeeded without a payload");
        return;
    };

    let session: Session = match serde_json::from_value(data.clone()) {
        Ok(session) => session,
        Err(error) => {
            tracing::error!(%error, "login payload did not decode into a session");
            return;
        }
    };

    let serialized = match serde_json::to_string(&session) {
        Ok(serialized) => serialized,
        Err(error) => {
            tracing::error!(%error, "session did not serialize for storage");
            return;
        }
    };

    tracing::debug!(username = %session.user.username, "session established");
    env.dispatcher().dispatch(SessionAction::Create { session });
    env.storage().set_item(SESSION_STORAGE_KEY, &serialized);
    env.alerts().dismiss(SESSION_ALERT_CONTEXT);
}
