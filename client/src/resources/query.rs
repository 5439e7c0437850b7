//! The reactive resource query.
//!
//! [`ResourceQuery`] specializes the request machinery for one
//! resource/action pair. It wraps an underlying [`QuerySource`] (the
//! data-fetching collaborator), compiles the configured alert rules
//! into a prepended response effect, and runs every effect in list
//! order whenever the published response makes a meaningful transition
//! — re-observing an identical status/error pair does not fire the
//! effects again.
//!
//! Overlapping [`ResourceQuery::run`] calls follow the same
//! cancel-and-replace-by-generation policy as
//! [`Request`](crate::request::Request): only the latest call publishes
//! transitions or fires effects.

use super::{AlertsConfig, ResourceConfig, generate_alerts};
use crate::request::Params;
use futures::future::BoxFuture;
use lorekeeper_core::alerts::{AlertContext, compile_directives};
use lorekeeper_core::middleware::Operation;
use lorekeeper_core::response::Response;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// The underlying data-fetching collaborator.
///
/// Anything that can resolve params into a settled response works; the
/// query neither knows nor cares about the transport behind it.
pub trait QuerySource: Send + Sync {
    /// Fetches one settled response for `params`.
    fn fetch(&self, params: Params) -> BoxFuture<'static, Response<Value>>;
}

impl QuerySource for Operation<Params, Value> {
    fn fetch(&self, params: Params) -> BoxFuture<'static, Response<Value>> {
        (**self)(params)
    }
}

/// A side-effecting callback run on every meaningful response
/// transition.
pub type ResponseEffect<C> = Arc<dyn Fn(&Response<Value>, &C) + Send + Sync>;

/// Configures and assembles a [`ResourceQuery`].
pub struct ResourceQueryBuilder<C> {
    resource: ResourceConfig,
    alerts: AlertsConfig,
    effects: Vec<ResponseEffect<C>>,
}

impl<C> ResourceQueryBuilder<C>
where
    C: AlertContext + Clone + Send + Sync + 'static,
{
    /// Starts a builder for one resource/action pair.
    #[must_use]
    pub fn new(resource: ResourceConfig) -> Self {
        Self {
            resource,
            alerts: AlertsConfig::Default,
            effects: Vec::new(),
        }
    }

    /// Overrides the alert rules (or disables them entirely).
    #[must_use]
    pub fn with_alerts(mut self, alerts: AlertsConfig) -> Self {
        self.alerts = alerts;
        self
    }

    /// Appends a response effect. Effects run in append order, after
    /// the alert effect.
    #[must_use]
    pub fn with_effect(mut self, effect: impl Fn(&Response<Value>, &C) + Send + Sync + 'static) -> Self {
        self.effects.push(Arc::new(effect));
        self
    }

    /// Assembles the query around a data source and its bound context.
    #[must_use]
    pub fn build(self, source: Arc<dyn QuerySource>, context: C) -> ResourceQuery<C> {
        let directives = match self.alerts {
            AlertsConfig::Default => Some(generate_alerts(&self.resource)),
            AlertsConfig::Custom(directives) => Some(directives),
            AlertsConfig::Disabled => None,
        };

        // The alert effect is always first in the effect list.
        let mut effects: Vec<ResponseEffect<C>> = Vec::with_capacity(self.effects.len() + 1);
        if let Some(matcher) = directives.and_then(|directives| compile_directives(directives)) {
            effects.push(Arc::new(move |response: &Response<Value>, context: &C| {
                matcher.run(response, context);
            }));
        }
        effects.extend(self.effects);

        let (state, _) = watch::channel(Response::uninitialized());

        ResourceQuery {
            resource: self.resource,
            source,
            effects,
            context,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl<C> std::fmt::Debug for ResourceQueryBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceQueryBuilder")
            .field("resource", &self.resource)
            .field("effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}

/// A reactive query over one resource/action pair.
pub struct ResourceQuery<C> {
    resource: ResourceConfig,
    source: Arc<dyn QuerySource>,
    effects: Vec<ResponseEffect<C>>,
    context: C,
    state: Arc<watch::Sender<Response<Value>>>,
    generation: Arc<AtomicU64>,
}

impl<C> ResourceQuery<C> {
    /// Runs the query and returns the settled response.
    ///
    /// Member actions must carry their identifying wildcards (e.g.
    /// `id`) in `params`; a missing wildcard surfaces as the source's
    /// failure response, never a panic.
    pub async fn run(&self, params: Params) -> Response<Value> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let loading = {
            let current = self.state.borrow().clone();
            if current.is_failure() {
                Response::retrying(current)
            } else {
                Response::loading()
            }
        };
        self.transition(generation, loading);

        let response = self.source.fetch(params).await;
        self.transition(generation, response.clone());

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

    /// The resource/action pair this query serves.
    #[must_use]
    pub const fn resource(&self) -> &ResourceConfig {
        &self.resource
    }

    /// Publishes a transition and fires effects, unless a newer call
    /// has taken over or the published state would not meaningfully
    /// change.
    fn transition(&self, generation: u64, response: Response<Value>) {
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(
                resource = %self.resource.resource_name,
                action = %self.resource.action,
                "superseded call dropped its transition"
            );
            return;
        }

        let previous = self.state.send_replace(response.clone());
        let changed = previous.status() != response.status()
            || previous.error_type() != response.error_type();
        if !changed {
            return;
        }

        tracing::debug!(
            resource = %self.resource.resource_name,
            action = %self.resource.action,
            status = %response.status(),
            "response transition"
        );
        for effect in &self.effects {
            effect(&response, &self.context);
        }
    }
}

impl<C: Clone> Clone for ResourceQuery<C> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            source: Arc::clone(&self.source),
            effects: self.effects.clone(),
            context: self.context.clone(),
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<C> std::fmt::Debug for ResourceQuery<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceQuery")
            .field("resource", &self.resource)
            .field("effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}
