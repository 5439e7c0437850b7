//! Recording doubles for the injected collaborators.
//!
//! Each double implements one environment trait and records what was
//! done to it, with accessors shaped for test assertions.

use lorekeeper_client::api::HeaderProvider;
use lorekeeper_client::env::KeyValueStorage;
use lorekeeper_client::session::{Session, SessionAction, SessionDispatcher};
use lorekeeper_core::alerts::{AlertProps, AlertSink};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// One alert shown through a [`RecordingAlerts`], with the identity the
/// hub would have assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedAlert {
    /// Identity assigned on display.
    pub uuid: Uuid,

    /// The props the engine displayed.
    pub props: AlertProps,
}

/// An [`AlertSink`] that records every display and dismiss call.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    displayed: Mutex<Vec<DisplayedAlert>>,
    dismissed: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every alert displayed so far, in call order.
    #[must_use]
    pub fn displayed(&self) -> Vec<DisplayedAlert> {
        self.displayed.lock().expect("alerts lock poisoned").clone()
    }

    /// Every context key dismissed so far, in call order.
    #[must_use]
    pub fn dismissed(&self) -> Vec<String> {
        self.dismissed.lock().expect("alerts lock poisoned").clone()
    }

    /// The most recent alert displayed under `context`, if any.
    #[must_use]
    pub fn displayed_with_context(&self, context: &str) -> Option<AlertProps> {
        self.displayed()
            .into_iter()
            .rev()
            .map(|alert| alert.props)
            .find(|props| props.context.as_deref() == Some(context))
    }

    /// Whether `context` was dismissed at least once.
    #[must_use]
    pub fn dismissed_context(&self, context: &str) -> bool {
        self.dismissed().iter().any(|key| key == context)
    }
}

impl AlertSink for RecordingAlerts {
    fn display(&self, alert: AlertProps) {
        self.displayed
            .lock()
            .expect("alerts lock poisoned")
            .push(DisplayedAlert {
                uuid: Uuid::new_v4(),
                props: alert,
            });
    }

    fn dismiss(&self, context: &str) {
        self.dismissed
            .lock()
            .expect("alerts lock poisoned")
            .push(context.to_string());
    }
}

/// A [`SessionDispatcher`] that records every dispatched action.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    actions: Mutex<Vec<SessionAction>>,
}

impl RecordingDispatcher {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every action dispatched so far, in call order.
    #[must_use]
    pub fn actions(&self) -> Vec<SessionAction> {
        self.actions.lock().expect("dispatch lock poisoned").clone()
    }

    /// The session from the most recent `Create` action, if any.
    #[must_use]
    pub fn created_session(&self) -> Option<Session> {
        self.actions().into_iter().rev().find_map(|action| match action {
            SessionAction::Create { session } => Some(session),
            SessionAction::Destroy => None,
        })
    }
}

impl SessionDispatcher for RecordingDispatcher {
    fn dispatch(&self, action: SessionAction) {
        self.actions
            .lock()
            .expect("dispatch lock poisoned")
            .push(action);
    }
}

/// An in-memory [`KeyValueStorage`].
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().expect("storage lock poisoned").len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.lock().expect("storage lock poisoned").remove(key);
    }
}

/// A [`HeaderProvider`] returning a fixed header list.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: Vec<(String, String)>,
}

impl StaticHeaders {
    /// No headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn bearer(token: &str) -> Self {
        Self {
            headers: vec![("Authorization".to_string(), format!("Bearer {token}"))],
        }
    }

    /// Appends a header pair.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl HeaderProvider for StaticHeaders {
    fn headers(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }
}
