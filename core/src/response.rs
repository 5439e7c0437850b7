//! The canonical representation of an asynchronous request's lifecycle.
//!
//! Every request moves through the same state machine:
//!
//! ```text
//! uninitialized --(call)--> loading --(resolve ok)--> success
//!                                   \--(resolve err)--> failure
//!                                                          |
//!                  loading (retrying, embeds failure) <--(call again)
//! ```
//!
//! Terminal states are not final: any state accepts a new loading
//! transition when the request is re-invoked. A loading response produced
//! while a prior response was settled embeds that prior response, so
//! consumers can keep showing stale data or the previous error while the
//! retry is in flight.
//!
//! [`Response`] is an explicit tagged union and the constructors here are
//! the single source of truth for its shape — middleware and matchers
//! never assemble response values by hand.

use crate::error::{ErrorType, RequestError};

/// Lifecycle status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// No request has been issued yet.
    Uninitialized,

    /// A request is in flight.
    Loading,

    /// The request settled with data.
    Success,

    /// The request settled with an error.
    Failure,
}

impl ResponseStatus {
    /// Whether this status represents a settled request.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// The lifecycle state of one asynchronous request.
///
/// # Invariants
///
/// Held by construction:
///
/// - `Success` never carries an error.
/// - `Uninitialized` and `Loading` carry neither data nor an error of
///   their own; a retrying `Loading` exposes the previous state only
///   through [`prior`](Response::prior).
/// - `Failure` may carry data when the server returned a partial payload
///   alongside a structured error.
#[derive(Debug, Clone, PartialEq)]
pub enum Response<T> {
    /// No request has been issued yet.
    Uninitialized,

    /// A request is in flight. `prior` embeds the previously settled
    /// response when this is a retry.
    Loading {
        /// The response that was current when the retry began.
        prior: Option<Box<Response<T>>>,
    },

    /// The request settled with data.
    Success {
        /// The decoded payload.
        data: T,
    },

    /// The request settled with an error.
    Failure {
        /// What went wrong.
        error: RequestError,

        /// Partial payload returned alongside the error, if any.
        data: Option<T>,
    },
}

impl<T> Response<T> {
    /// The state before any request has been issued.
    #[must_use]
    pub const fn uninitialized() -> Self {
        Self::Uninitialized
    }

    /// A request is in flight with no prior state to show.
    #[must_use]
    pub const fn loading() -> Self {
        Self::Loading { prior: None }
    }

    /// A request is in flight, retrying after `prior` settled.
    #[must_use]
    pub fn retrying(prior: Self) -> Self {
        Self::Loading {
            prior: Some(Box::new(prior)),
        }
    }

    /// A settled, successful response.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// A settled, failed response with no data payload.
    #[must_use]
    pub const fn failure(error: RequestError) -> Self {
        Self::Failure { error, data: None }
    }

    /// Settles this response with data, discarding any previous error.
    #[must_use]
    pub fn with_data(self, data: T) -> Self {
        Self::Success { data }
    }

    /// Settles this response with an error, preserving any data the
    /// previous state carried (a partial payload survives the failure).
    #[must_use]
    pub fn with_error(self, error: RequestError) -> Self {
        Self::Failure {
            error,
            data: self.into_data(),
        }
    }

    /// The lifecycle status of this response.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Uninitialized => ResponseStatus::Uninitialized,
            Self::Loading { .. } => ResponseStatus::Loading,
            Self::Success { .. } => ResponseStatus::Success,
            Self::Failure { .. } => ResponseStatus::Failure,
        }
    }

    /// Whether this response carries data.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        matches!(
            self,
            Self::Success { .. } | Self::Failure { data: Some(_), .. }
        )
    }

    /// Whether this response carries an error.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The carried data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure {
                data: Some(data), ..
            } => Some(data),
            _ => None,
        }
    }

    /// The carried error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&RequestError> {
        match self {
            Self::Failure { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The structured error discriminator, if the failure carried one.
    #[must_use]
    pub const fn error_type(&self) -> Option<&ErrorType> {
        match self.error() {
            Some(error) => error.error_type(),
            None => None,
        }
    }

    /// The response that was settled when a retry began.
    #[must_use]
    pub fn prior(&self) -> Option<&Self> {
        match self {
            Self::Loading { prior } => prior.as_deref(),
            _ => None,
        }
    }

    /// Consumes the response, yielding its data payload if present.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { data, .. } => data,
            Self::Uninitialized | Self::Loading { .. } => None,
        }
    }

    /// Whether no request has been issued yet.
    #[must_use]
    pub const fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether a request is in flight after a previous response settled.
    #[must_use]
    pub const fn is_retrying(&self) -> bool {
        matches!(self, Self::Loading { prior: Some(_) })
    }

    /// Whether the request settled successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the request settled with an error.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Maps the data payload, preserving status, error, and any embedded
    /// prior response.
    pub fn map<U>(self, f: impl Fn(T) -> U + Copy) -> Response<U> {
        match self {
            Self::Uninitialized => Response::Uninitialized,
            Self::Loading { prior } => Response::Loading {
                prior: prior.map(|p| Box::new(p.map(f))),
            },
            Self::Success { data } => Response::Success { data: f(data) },
            Self::Failure { error, data } => Response::Failure {
                error,
                data: data.map(f),
            },
        }
    }
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Self::Uninitialized
    }
}
