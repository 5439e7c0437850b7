//! # Lorekeeper Testing
//!
//! Test doubles and helpers for the Lorekeeper request engine.
//!
//! This crate provides:
//! - Recording implementations of every environment trait
//!   ([`RecordingAlerts`], [`RecordingDispatcher`], [`MemoryStorage`],
//!   [`StaticHeaders`])
//! - Scripted operations and query sources with canned responses
//! - [`TestEnv`], a prewired [`RequestEnv`] that keeps handles to its
//!   recorders for assertions
//!
//! ## Example
//!
//! ```
//! use lorekeeper_client::RequestConfig;
//! use lorekeeper_core::response::Response;
//! use lorekeeper_testing::{TestEnv, scripted_operation};
//! use serde_json::json;
//!
//! # async fn example() {
//! let harness = TestEnv::new();
//! let request = RequestConfig::new().build(
//!     scripted_operation(vec![Response::success(json!({"id": 1}))]),
//!     &harness.env(),
//! );
//!
//! let response = request.call(Default::default()).await;
//! assert!(response.is_success());
//! assert!(harness.alerts().displayed().is_empty());
//! # }
//! ```

#![allow(clippy::expect_used)] // Test support code can assert on its own locks

use lorekeeper_client::env::RequestEnv;
use std::sync::Arc;

/// Recording doubles for the injected collaborators.
pub mod mocks;

/// Scripted operations and sources with canned responses.
pub mod scripted;

pub use mocks::{
    DisplayedAlert, MemoryStorage, RecordingAlerts, RecordingDispatcher, StaticHeaders,
};
pub use scripted::{CallRecorder, ScriptedSource, scripted_operation};

/// A [`RequestEnv`] wired to recording doubles, keeping handles to each
/// recorder for assertions.
#[derive(Debug, Clone)]
pub struct TestEnv {
    alerts: Arc<RecordingAlerts>,
    dispatcher: Arc<RecordingDispatcher>,
    storage: Arc<MemoryStorage>,
}

impl TestEnv {
    /// Creates a fresh harness with empty recorders.
    #[must_use]
    pub fn new() -> Self {
        Self {
            alerts: Arc::new(RecordingAlerts::new()),
            dispatcher: Arc::new(RecordingDispatcher::new()),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    /// The environment to hand to request builders.
    #[must_use]
    pub fn env(&self) -> RequestEnv {
        RequestEnv::new(
            self.alerts.clone(),
            self.dispatcher.clone(),
            self.storage.clone(),
        )
    }

    /// The alert recorder.
    #[must_use]
    pub fn alerts(&self) -> &RecordingAlerts {
        &self.alerts
    }

    /// The dispatch recorder.
    #[must_use]
    pub fn dispatcher(&self) -> &RecordingDispatcher {
        &self.dispatcher
    }

    /// The in-memory storage.
    #[must_use]
    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
