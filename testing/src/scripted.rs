//! Scripted operations and sources with canned responses.

use lorekeeper_client::request::Params;
use lorekeeper_client::resources::QuerySource;
use lorekeeper_core::error::RequestError;
use lorekeeper_core::middleware::{Operation, operation};
use lorekeeper_core::response::Response;
use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Builds an operation that pops one canned response per call.
///
/// Calls past the end of the script settle as a transport failure, so
/// an over-eager test fails loudly instead of hanging on stale data.
#[must_use]
pub fn scripted_operation(responses: Vec<Response<Value>>) -> Operation<Params, Value> {
    let script = Arc::new(Mutex::new(VecDeque::from(responses)));

    operation(move |_params: Params| {
        let next = script.lock().expect("script lock poisoned").pop_front();
        async move {
            next.unwrap_or_else(|| {
                Response::failure(RequestError::transport("scripted responses exhausted"))
            })
        }
    })
}

/// A [`QuerySource`] that pops one canned response per fetch and
/// records the params of every call.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Response<Value>>>,
    calls: Mutex<Vec<Params>>,
}

impl ScriptedSource {
    /// Creates a source from canned responses, first response first.
    #[must_use]
    pub fn new(responses: Vec<Response<Value>>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(responses)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The params of every fetch so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Params> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl QuerySource for ScriptedSource {
    fn fetch(&self, params: Params) -> BoxFuture<'static, Response<Value>> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(params);
        let next = self
            .script
            .lock()
            .expect("script lock poisoned")
            .pop_front();

        Box::pin(async move {
            next.unwrap_or_else(|| {
                Response::failure(RequestError::transport("scripted responses exhausted"))
            })
        })
    }
}

/// Shared label log for asserting call order across middleware and
/// operations.
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one label.
    pub fn record(&self, label: impl Into<String>) {
        self.calls
            .lock()
            .expect("recorder lock poisoned")
            .push(label.into());
    }

    /// Every label recorded so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("recorder lock poisoned").clone()
    }
}
