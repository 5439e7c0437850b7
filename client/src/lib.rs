//! # Lorekeeper Client
//!
//! The imperative shell around `lorekeeper-core`: the HTTP client
//! speaking the campaign server's envelope protocol, the request
//! builder that freezes middleware configuration at setup time, the
//! resource-query specialization with auto-generated alerts, and the
//! session (authentication) middleware.
//!
//! ## Wiring
//!
//! Everything external is injected. One [`ApiClient`] is constructed at
//! application start; collaborators (alert hub, store dispatcher,
//! persisted storage) arrive through [`RequestEnv`]:
//!
//! ```ignore
//! use lorekeeper_client::{
//!     ApiClient, RequestConfig, RequestEnv, SessionMiddlewareBuilder,
//! };
//! use lorekeeper_client::request::RequestMetadata;
//! use reqwest::Method;
//!
//! let api = ApiClient::new("https://campaign.example/api", headers);
//! let env = RequestEnv::new(alerts, dispatcher, storage);
//!
//! let login = RequestConfig::new()
//!     .with_middleware(SessionMiddlewareBuilder::new())
//!     .with_metadata(RequestMetadata::mutation("session:create"))
//!     .build(api.operation(Method::POST, "session"), &env);
//!
//! let response = login.call(credentials).await;
//! ```

/// HTTP API client for the campaign server.
pub mod api;

/// Dependency injection for request middleware and effects.
pub mod env;

/// Reusable requests from operations, params, and middleware stacks.
pub mod request;

/// Resource-scoped specialization of the request machinery.
pub mod resources;

/// The authenticated session and its request middleware.
pub mod session;

// Re-export commonly used types
pub use api::{ApiClient, HeaderProvider, NoHeaders};
pub use env::{KeyValueStorage, RequestEnv};
pub use request::{MiddlewareBuilder, Params, Request, RequestConfig, RequestMetadata};
pub use resources::{
    AlertsConfig, QuerySource, ResourceConfig, ResourceQuery, ResourceQueryBuilder,
    generate_alerts,
};
pub use session::{
    ClearSessionMiddlewareBuilder, Session, SessionAction, SessionDispatcher,
    SessionMiddlewareBuilder, User,
};
