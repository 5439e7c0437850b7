//! Demo implementations of the injected collaborators.
//!
//! A real deployment would wire the alert hub, the application store,
//! and platform storage here; the demo prints alerts to the console and
//! keeps everything in memory.

use lorekeeper_client::env::KeyValueStorage;
use lorekeeper_client::session::{Session, SessionAction, SessionDispatcher};
use lorekeeper_core::alerts::{AlertProps, AlertSink};
use std::collections::HashMap;
use std::sync::Mutex;

/// Prints alerts to the console.
#[derive(Debug, Default)]
pub struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn display(&self, alert: AlertProps) {
        let context = alert.context.as_deref().unwrap_or("-");
        println!("  [alert/{}] ({context}) {}", alert.kind, alert.message);
    }

    fn dismiss(&self, context: &str) {
        println!("  [alert dismissed] ({context})");
    }
}

/// The application store: holds the current session, if any.
#[derive(Debug, Default)]
pub struct CampaignStore {
    session: Mutex<Option<Session>>,
}

impl CampaignStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if logged in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.lock().ok().and_then(|guard| guard.clone())
    }
}

impl SessionDispatcher for CampaignStore {
    fn dispatch(&self, action: SessionAction) {
        let Ok(mut guard) = self.session.lock() else {
            return;
        };

        match action {
            SessionAction::Create { session } => {
                println!("  [store] session created for {}", session.user.username);
                *guard = Some(session);
            }
            SessionAction::Destroy => {
                println!("  [store] session destroyed");
                *guard = None;
            }
        }
    }
}

/// In-memory key/value storage.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .ok()
            .and_then(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}
