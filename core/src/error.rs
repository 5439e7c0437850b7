//! Error taxonomy for the request pipeline.
//!
//! Failures are data, not exceptions: a settled request carries one of
//! three error shapes inside its [`Response`](crate::response::Response):
//!
//! - [`RequestError::Transport`] — the network failed before any server
//!   response arrived
//! - [`RequestError::Decode`] — a body arrived but could not be decoded
//! - [`RequestError::Api`] — the server answered with a structured
//!   [`ApiError`] envelope
//!
//! Only the last shape carries an [`ErrorType`] discriminator, which is
//! what matchers dispatch on. The first two are "transport-level" and are
//! what the `Errored` match criteria selects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Discriminator for structured API errors.
///
/// A dotted namespace string such as `campaign.errors.notFound`. The
/// server mints these; the client only compares them, so the type is a
/// thin newtype over the wire string with constants for the values this
/// application knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorType(String);

impl ErrorType {
    /// A request carried parameters that failed server-side validation.
    pub const INVALID_PARAMETERS: &'static str = "campaign.errors.invalidParameters";

    /// The addressed record does not exist.
    pub const NOT_FOUND: &'static str = "campaign.errors.notFound";

    /// A uniqueness constraint rejected the record.
    pub const NOT_UNIQUE: &'static str = "campaign.errors.notUnique";

    /// The provided credentials did not match a user.
    pub const FAILED_LOGIN: &'static str = "campaign.authentication.failedLogin";

    /// The session token has expired.
    pub const EXPIRED_SESSION: &'static str = "campaign.authentication.expiredSession";

    /// Creates an error type from its wire representation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ErrorType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ErrorType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for ErrorType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ErrorType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A structured error returned by the server.
///
/// Wire shape (inside the `{ok: false, error: {...}}` envelope):
///
/// ```json
/// {
///   "type": "campaign.errors.invalidParameters",
///   "message": "Rocket is invalid",
///   "data": { "errors": { "name": ["can't be blank"] } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Dotted namespace discriminator, used for matcher dispatch.
    #[serde(rename = "type")]
    pub error_type: ErrorType,

    /// Human-readable description of the failure.
    pub message: String,

    /// Arbitrary structured payload accompanying the error.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ApiError {
    /// Creates an error with an empty data payload.
    pub fn new(error_type: impl Into<ErrorType>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            data: serde_json::Map::new(),
        }
    }

    /// Attaches a structured data payload.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Map<String, serde_json::Value>) -> Self {
        self.data = data;
        self
    }

    /// Extracts per-field validation messages from `data.errors`.
    ///
    /// Invalid-parameters errors map field names to lists of messages.
    /// Entries that are not arrays of strings are skipped. Returns `None`
    /// when the payload has no `errors` object at all.
    #[must_use]
    pub fn validation_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let errors = self.data.get("errors")?.as_object()?;

        let mut fields = BTreeMap::new();
        for (field, messages) in errors {
            let Some(messages) = messages.as_array() else {
                continue;
            };

            let messages: Vec<String> = messages
                .iter()
                .filter_map(|m| m.as_str().map(ToString::to_string))
                .collect();
            fields.insert(field.clone(), messages);
        }

        Some(fields)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The error carried by a failed [`Response`](crate::response::Response).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// The request never produced a server response.
    #[error("request failed before a response arrived: {0}")]
    Transport(String),

    /// A response arrived but its body could not be decoded.
    #[error("could not decode the response body: {0}")]
    Decode(String),

    /// The server answered with a structured error envelope.
    #[error("{0}")]
    Api(ApiError),
}

impl RequestError {
    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns the structured discriminator, if the server supplied one.
    #[must_use]
    pub const fn error_type(&self) -> Option<&ErrorType> {
        match self {
            Self::Api(error) => Some(&error.error_type),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Whether this failure is transport-level rather than a structured
    /// API error.
    ///
    /// This is the discriminator behind the `Errored` match criteria:
    /// "the network/transport failed" as opposed to "the server responded
    /// with a business error".
    #[must_use]
    pub const fn is_errored(&self) -> bool {
        !matches!(self, Self::Api(_))
    }

    /// Returns the structured API error, if any.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

impl From<ApiError> for RequestError {
    fn from(error: ApiError) -> Self {
        Self::Api(error)
    }
}
