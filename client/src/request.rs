//! Reusable requests built from an operation, fixed params, and a
//! middleware stack.
//!
//! [`RequestConfig`] is the declarative half: an ordered list of
//! [`MiddlewareBuilder`]s plus a fixed parameter set. Calling
//! [`RequestConfig::build`] against a base operation and a caller
//! environment reifies each builder exactly once — middleware
//! configuration is frozen at setup time, not at call time — and
//! returns a [`Request`].
//!
//! [`Request::call`] merges fixed params under per-call values
//! (per-call wins on key collision), funnels the merged params through
//! the composed middleware chain, publishes lifecycle transitions to a
//! watch channel, and returns the settled response.
//!
//! # Overlapping calls
//!
//! Concurrent calls to the same [`Request`] are not queued. The policy
//! is cancel-and-replace by generation: every call takes the next
//! generation number and only the latest generation may publish
//! transitions, so a superseded call can no longer affect the
//! observable [`Request::response`]. The superseded caller still
//! receives its own settled return value.

use lorekeeper_core::middleware::{Middleware, Operation, apply_middleware};
use lorekeeper_core::response::Response;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Parameters carried by one request call: a JSON object map.
pub type Params = serde_json::Map<String, Value>;

/// Merges fixed params under per-call values.
///
/// Per-call values take precedence on key collision.
#[must_use]
pub fn merge_params(fixed: &Params, values: Params) -> Params {
    let mut merged = fixed.clone();
    for (key, value) in values {
        merged.insert(key, value);
    }
    merged
}

/// Produces a middleware, parameterized by caller-supplied options.
///
/// Builders run once per [`RequestConfig::build`], so whatever they
/// capture from the options (alert sinks, dispatchers, storage) is
/// fixed for the lifetime of the resulting [`Request`].
pub trait MiddlewareBuilder<C>: Send + Sync {
    /// Reifies the middleware against the caller's options.
    fn build(&self, options: &C) -> Arc<dyn Middleware<Params, Value>>;
}

impl<C, F> MiddlewareBuilder<C> for F
where
    F: Fn(&C) -> Arc<dyn Middleware<Params, Value>> + Send + Sync,
{
    fn build(&self, options: &C) -> Arc<dyn Middleware<Params, Value>> {
        self(options)
    }
}

/// What a request is for, recorded in its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Reads data without changing server state.
    Query,

    /// Changes server state.
    Mutation,
}

/// Immutable diagnostic metadata attached to a request at construction.
///
/// Feeds tracing output and test assertions; never affects behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Human-readable request name, e.g. `session:create`.
    pub name: Cow<'static, str>,

    /// Whether the request reads or writes.
    pub kind: RequestKind,
}

impl RequestMetadata {
    /// Creates metadata for a query.
    pub fn query(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: RequestKind::Query,
        }
    }

    /// Creates metadata for a mutation.
    pub fn mutation(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: RequestKind::Mutation,
        }
    }
}

/// Declarative request configuration: middleware builders plus fixed
/// params.
pub struct RequestConfig<C> {
    middleware: Vec<Arc<dyn MiddlewareBuilder<C>>>,
    params: Params,
    metadata: Option<RequestMetadata>,
}

impl<C> RequestConfig<C> {
    /// An empty configuration: no middleware, no fixed params.
    #[must_use]
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
            params: Params::new(),
            metadata: None,
        }
    }

    /// Appends a middleware builder; builders wrap in push order, the
    /// first pushed being the outermost.
    #[must_use]
    pub fn with_middleware(mut self, builder: impl MiddlewareBuilder<C> + 'static) -> Self {
        self.middleware.push(Arc::new(builder));
        self
    }

    /// Replaces the fixed parameter set.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets one fixed parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Attaches diagnostic metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Reifies the middleware against `options` and binds the chain
    /// around `operation`.
    ///
    /// Each builder runs exactly once here; subsequent
    /// [`Request::call`]s reuse the reified chain.
    #[must_use]
    pub fn build(&self, operation: Operation<Params, Value>, options: &C) -> Request {
        let reified: Vec<Arc<dyn Middleware<Params, Value>>> = self
            .middleware
            .iter()
            .map(|builder| builder.build(options))
            .collect();

        if tracing::enabled!(tracing::Level::DEBUG) {
            for middleware in &reified {
                tracing::debug!(
                    request = self.metadata.as_ref().map(|m| m.name.as_ref()),
                    middleware = %middleware.metadata().name,
                    "middleware reified"
                );
            }
        }

        let (state, _) = watch::channel(Response::uninitialized());

        Request {
            operation: apply_middleware(operation, reified),
            params: self.params.clone(),
            metadata: self.metadata.clone(),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<C> Default for RequestConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for RequestConfig<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestConfig")
            .field("middleware", &self.middleware.len())
            .field("params", &self.params)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// A reusable request callable with a reactive response value.
#[derive(Clone)]
pub struct Request {
    operation: Operation<Params, Value>,
    params: Params,
    metadata: Option<RequestMetadata>,
    state: Arc<watch::Sender<Response<Value>>>,
    generation: Arc<AtomicU64>,
}

impl Request {
    /// Issues the request with per-call values merged over the fixed
    /// params, and returns the settled response.
    pub async fn call(&self, values: Params) -> Response<Value> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let name = self.name();

        let loading = {
            let current = self.state.borrow().clone();
            if current.is_failure() {
                Response::retrying(current)
            } else {
                Response::loading()
            }
        };
        tracing::debug!(request = name, retrying = loading.is_retrying(), "request started");
        metrics::counter!("request.calls").increment(1);
        self.publish(generation, loading);

        let merged = merge_params(&self.params, values);
        let response = (self.operation)(merged).await;

        tracing::debug!(request = name, status = %response.status(), "request settled");
        if response.is_failure() {
            metrics::counter!("request.failures").increment(1);
        } else {
            metrics::counter!("request.successes").increment(1);
        }
        self.publish(generation, response.clone());

        response
    }

    /// The currently published response.
    #[must_use]
    pub fn response(&self) -> Response<Value> {
        self.state.borrow().clone()
    }

    /// Subscribes to response transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Response<Value>> {
        self.state.subscribe()
    }

    /// Diagnostic metadata, if any was attached.
    #[must_use]
    pub const fn metadata(&self) -> Option<&RequestMetadata> {
        self.metadata.as_ref()
    }

    fn name(&self) -> &str {
        self.metadata.as_ref().map_or("request", |m| m.name.as_ref())
    }

    /// Publishes a transition unless a newer call has taken over.
    fn publish(&self, generation: u64, response: Response<Value>) {
        if self.generation.load(Ordering::Acquire) == generation {
            self.state.send_replace(response);
        }
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("params", &self.params)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
