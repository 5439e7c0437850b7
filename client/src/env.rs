//! Dependency injection for request middleware and effects.
//!
//! [`RequestEnv`] is the options bag handed to
//! [`MiddlewareBuilder`](crate::request::MiddlewareBuilder)s when a
//! request is built. Every external collaborator sits behind a trait, so
//! production wiring and test doubles are interchangeable:
//!
//! - [`AlertSink`] (from `lorekeeper-core`) — where alert show/hide
//!   calls land
//! - [`SessionDispatcher`](crate::session::SessionDispatcher) — the
//!   external store receiving session actions
//! - [`KeyValueStorage`] — persisted key/value storage for the session

use crate::session::SessionDispatcher;
use lorekeeper_core::alerts::{AlertContext, AlertSink};
use std::sync::Arc;

/// Persisted key/value storage.
///
/// The production implementation wraps whatever the host platform
/// offers; tests use an in-memory map.
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str);

    /// Removes the value stored under `key`, if any.
    fn remove_item(&self, key: &str);
}

/// The caller-supplied environment middleware is reified against.
#[derive(Clone)]
pub struct RequestEnv {
    alerts: Arc<dyn AlertSink>,
    dispatcher: Arc<dyn SessionDispatcher>,
    storage: Arc<dyn KeyValueStorage>,
}

impl RequestEnv {
    /// Bundles the injected collaborators.
    #[must_use]
    pub fn new(
        alerts: Arc<dyn AlertSink>,
        dispatcher: Arc<dyn SessionDispatcher>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        Self {
            alerts,
            dispatcher,
            storage,
        }
    }

    /// The alert sink.
    #[must_use]
    pub fn alerts(&self) -> &dyn AlertSink {
        &*self.alerts
    }

    /// The external store dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &dyn SessionDispatcher {
        &*self.dispatcher
    }

    /// The persisted key/value storage.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStorage {
        &*self.storage
    }
}

impl AlertContext for RequestEnv {
    fn alert_sink(&self) -> &dyn AlertSink {
        &*self.alerts
    }
}

impl std::fmt::Debug for RequestEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEnv").finish_non_exhaustive()
    }
}
