//! Composable wrappers around asynchronous operations.
//!
//! A [`Middleware`] wraps an [`Operation`] — any async function from
//! parameters to a settled [`Response`] — and may transform the
//! parameters on the way in, transform or observe the response on the
//! way out, or skip the rest of the chain entirely by never invoking
//! `next`.
//!
//! [`apply_middleware`] composes an ordered list around a base operation.
//! The first middleware in the list is the outermost wrapper: it runs
//! first on the way in and last on the way out. Each middleware's `next`
//! argument is the composition of everything after it plus the base
//! operation.
//!
//! There is no implicit error handling at this layer. Business failures
//! travel as failure responses; a panic in a middleware or the base
//! operation propagates to the caller untrapped.
//!
//! # Example
//!
//! ```
//! use lorekeeper_core::middleware::{apply_middleware, middleware_fn, operation};
//! use lorekeeper_core::response::Response;
//!
//! # async fn example() {
//! let base = operation(|n: u32| async move { Response::success(n + 1) });
//!
//! let doubler = middleware_fn("doubler", |n: u32, next| {
//!     Box::pin(async move { next(n * 2).await })
//! });
//!
//! let composed = apply_middleware(base, [doubler]);
//! assert_eq!(composed(10).await, Response::success(21));
//! # }
//! ```

use crate::response::Response;
use futures::future::BoxFuture;
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

/// An asynchronous operation from parameters to a settled response.
///
/// This is the shape shared by base operations (queries and mutations)
/// and by composed middleware chains, so wrapping never changes the
/// caller-facing signature.
pub type Operation<P, T> = Arc<dyn Fn(P) -> BoxFuture<'static, Response<T>> + Send + Sync>;

/// Adapts an async closure into an [`Operation`].
pub fn operation<P, T, F, Fut>(f: F) -> Operation<P, T>
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<T>> + Send + 'static,
{
    Arc::new(move |params| Box::pin(f(params)))
}

/// What a middleware is for, recorded in its metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MiddlewareKind {
    /// Observes settled responses through a matcher for side effects.
    Matcher,

    /// Manages the authenticated session.
    Session,

    /// Anything else.
    Custom,
}

/// Immutable diagnostic metadata attached to a middleware at
/// construction.
///
/// Metadata never affects behavior; it feeds tracing spans and test
/// assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareMetadata {
    /// Human-readable middleware name.
    pub name: Cow<'static, str>,

    /// What the middleware is for.
    pub kind: MiddlewareKind,
}

impl MiddlewareMetadata {
    /// Creates metadata with an explicit kind.
    pub fn new(name: impl Into<Cow<'static, str>>, kind: MiddlewareKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Metadata for middleware that declared none.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            name: Cow::Borrowed("anonymous"),
            kind: MiddlewareKind::Custom,
        }
    }
}

/// A composable wrapper around an asynchronous operation.
///
/// Implementations must explicitly invoke `next` to continue the chain
/// (possibly with transformed parameters) and may transform or observe
/// the awaited response before returning it. Not invoking `next`
/// short-circuits the remainder of the chain, including the base
/// operation.
pub trait Middleware<P, T>: Send + Sync {
    /// Runs this middleware around `next`.
    fn call(&self, params: P, next: &Operation<P, T>) -> BoxFuture<'static, Response<T>>;

    /// Diagnostic metadata for this middleware.
    fn metadata(&self) -> MiddlewareMetadata {
        MiddlewareMetadata::anonymous()
    }
}

/// Composes an ordered middleware list around a base operation.
///
/// The first middleware in the list is the outermost wrapper (runs first
/// on the way in, last on the way out). The returned operation has the
/// same signature as the base, so composed chains nest freely.
pub fn apply_middleware<P, T>(
    operation: Operation<P, T>,
    middleware: impl IntoIterator<Item = Arc<dyn Middleware<P, T>>>,
) -> Operation<P, T>
where
    P: Send + 'static,
    T: Send + 'static,
{
    let layers: Vec<Arc<dyn Middleware<P, T>>> = middleware.into_iter().collect();

    layers.into_iter().rev().fold(operation, |next, layer| {
        Arc::new(move |params: P| layer.call(params, &next)) as Operation<P, T>
    })
}

/// Adapts an async closure into a named [`Middleware`].
///
/// The closure receives the parameters and an owned handle to the rest
/// of the chain.
pub fn middleware_fn<P, T, F>(
    name: impl Into<Cow<'static, str>>,
    f: F,
) -> Arc<dyn Middleware<P, T>>
where
    F: Fn(P, Operation<P, T>) -> BoxFuture<'static, Response<T>> + Send + Sync + 'static,
    P: Send + 'static,
    T: Send + 'static,
{
    Arc::new(FnMiddleware {
        metadata: MiddlewareMetadata::new(name, MiddlewareKind::Custom),
        f,
    })
}

struct FnMiddleware<F> {
    metadata: MiddlewareMetadata,
    f: F,
}

impl<P, T, F> Middleware<P, T> for FnMiddleware<F>
where
    F: Fn(P, Operation<P, T>) -> BoxFuture<'static, Response<T>> + Send + Sync,
    P: Send + 'static,
    T: Send + 'static,
{
    fn call(&self, params: P, next: &Operation<P, T>) -> BoxFuture<'static, Response<T>> {
        (self.f)(params, next.clone())
    }

    fn metadata(&self) -> MiddlewareMetadata {
        self.metadata.clone()
    }
}
