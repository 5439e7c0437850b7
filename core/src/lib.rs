//! # Lorekeeper Core
//!
//! The request-composition and status-matching engine behind the
//! Lorekeeper campaign companion client.
//!
//! Everything here is transport-agnostic and side-effect free except
//! where a caller hands in a side-effecting handler. The crate provides:
//!
//! - **[`response`]**: the canonical tagged union for a request's
//!   lifecycle (uninitialized → loading → success/failure, with a
//!   retrying state that embeds the prior failure)
//! - **[`error`]**: the failure taxonomy (transport, decode, structured
//!   API error) and the dotted-namespace [`ErrorType`] discriminator
//! - **[`middleware`]**: composable wrappers around async operations,
//!   applied outward-in in list order, with explicit short-circuiting
//! - **[`matcher`]**: predicate dispatch over settled responses, used
//!   purely for side effects
//! - **[`alerts`]**: declarative status → show/dismiss rules compiled
//!   into matchers
//!
//! The imperative shell (HTTP client, request builder, resource
//! queries) lives in `lorekeeper-client`.
//!
//! ## Example
//!
//! ```
//! use lorekeeper_core::middleware::{apply_middleware, middleware_fn, operation};
//! use lorekeeper_core::response::Response;
//!
//! # async fn example() {
//! let fetch = operation(|name: String| async move {
//!     Response::success(format!("rocket {name}"))
//! });
//!
//! let shouting = middleware_fn("shouting", |name: String, next| {
//!     Box::pin(async move { next(name.to_uppercase()).await })
//! });
//!
//! let composed = apply_middleware(fetch, [shouting]);
//! let response = composed("imp iv".to_string()).await;
//! assert_eq!(response.data().map(String::as_str), Some("rocket IMP IV"));
//! # }
//! ```

/// Declarative alert rules compiled into matchers.
pub mod alerts;

/// Error taxonomy for the request pipeline.
pub mod error;

/// Predicate dispatch over settled responses.
pub mod matcher;

/// Composable wrappers around asynchronous operations.
pub mod middleware;

/// The canonical request lifecycle model.
pub mod response;

// Re-export commonly used types
pub use alerts::{AlertDirective, AlertKind, AlertProps, AlertSink};
pub use error::{ApiError, ErrorType, RequestError};
pub use matcher::{MatchCriteria, Matcher};
pub use middleware::{Middleware, Operation, apply_middleware};
pub use response::{Response, ResponseStatus};

// Re-export the small-vector types used in public signatures
pub use smallvec::{SmallVec, smallvec};
