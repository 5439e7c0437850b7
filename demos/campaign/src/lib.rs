//! Campaign companion demo for the Lorekeeper request engine.
//!
//! Wires the full pipeline — session middleware, resource queries with
//! auto-generated alerts, the retrying lifecycle — against an
//! in-process scripted backend, so the demo runs without a server.
//!
//! # Quick Start
//!
//! ```no_run
//! use campaign::support::{CampaignStore, ConsoleAlerts, InMemoryStorage};
//! use lorekeeper_client::{RequestConfig, RequestEnv, SessionMiddlewareBuilder};
//! use std::sync::Arc;
//!
//! let env = RequestEnv::new(
//!     Arc::new(ConsoleAlerts),
//!     Arc::new(CampaignStore::new()),
//!     Arc::new(InMemoryStorage::new()),
//! );
//!
//! let login = RequestConfig::new()
//!     .with_middleware(SessionMiddlewareBuilder::new())
//!     .build(campaign::backend::login_operation(), &env);
//! ```

/// Scripted in-process backend operations.
pub mod backend;

/// Demo implementations of the injected collaborators.
pub mod support;

/// Domain payloads.
pub mod types;

pub use support::{CampaignStore, ConsoleAlerts, InMemoryStorage};
pub use types::{Book, Rocket};
