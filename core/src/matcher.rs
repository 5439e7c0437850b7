//! Predicate dispatch over settled responses.
//!
//! A [`Matcher`] pairs a [`MatchCriteria`] with a side-effecting handler
//! and an optional fallback matcher. Running a matcher against a
//! response invokes the handler of the first matcher in the chain whose
//! criteria accept the response; if none accept, nothing happens.
//!
//! [`reduce_matchers`] folds an ordered rule list into one chain with
//! first-listed-rule-wins semantics: the last rule becomes the innermost
//! fallback. A rule matching any failure therefore acts as a catch-all
//! for failures not claimed by an earlier, more specific error-type
//! rule — specific rules must precede generic ones.
//!
//! Matchers exist purely for side effects (displaying alerts, updating a
//! session store). They never alter the response value:
//! [`MatcherMiddleware`] runs the wrapped operation, hands the settled
//! response to the matcher, and returns the response unchanged.

use crate::error::{ErrorType, RequestError};
use crate::middleware::{Middleware, MiddlewareKind, MiddlewareMetadata, Operation};
use crate::response::{Response, ResponseStatus};
use futures::future::BoxFuture;
use std::borrow::Cow;
use std::sync::Arc;

/// When a matcher's handler fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCriteria {
    /// Any response with the given lifecycle status.
    Status(ResponseStatus),

    /// A failure whose structured error type equals the given type.
    Failure(ErrorType),

    /// A failure whose error is transport-level — the network or
    /// decoding failed and no structured API error exists.
    Errored,
}

impl MatchCriteria {
    /// Whether `response` satisfies this criteria.
    #[must_use]
    pub fn matches<T>(&self, response: &Response<T>) -> bool {
        match self {
            Self::Status(status) => response.status() == *status,
            Self::Failure(error_type) => response.error_type() == Some(error_type),
            Self::Errored => response.error().is_some_and(RequestError::is_errored),
        }
    }
}

/// Side-effecting handler invoked with the matched response and the
/// caller-supplied context.
pub type MatchHandler<T, C> = Arc<dyn Fn(&Response<T>, &C) + Send + Sync>;

/// One criteria/handler rule, the unit [`reduce_matchers`] folds over.
pub struct MatchRule<T, C> {
    criteria: MatchCriteria,
    handler: MatchHandler<T, C>,
}

impl<T, C> MatchRule<T, C> {
    /// Creates a rule from criteria and a handler.
    pub fn new(
        criteria: MatchCriteria,
        handler: impl Fn(&Response<T>, &C) + Send + Sync + 'static,
    ) -> Self {
        Self {
            criteria,
            handler: Arc::new(handler),
        }
    }
}

impl<T, C> std::fmt::Debug for MatchRule<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchRule")
            .field("criteria", &self.criteria)
            .finish_non_exhaustive()
    }
}

/// A predicate-dispatch chain over responses.
pub struct Matcher<T, C> {
    criteria: MatchCriteria,
    handler: MatchHandler<T, C>,
    fallback: Option<Box<Matcher<T, C>>>,
}

impl<T, C> Matcher<T, C> {
    /// Creates a matcher with no fallback.
    pub fn new(
        criteria: MatchCriteria,
        handler: impl Fn(&Response<T>, &C) + Send + Sync + 'static,
    ) -> Self {
        Self {
            criteria,
            handler: Arc::new(handler),
            fallback: None,
        }
    }

    /// Sets the matcher consulted when this one's criteria reject the
    /// response.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Self) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Runs the chain against a response.
    ///
    /// Invokes the first matching handler, or delegates down the
    /// fallback chain; a response no criteria accept is a no-op.
    pub fn run(&self, response: &Response<T>, context: &C) {
        if self.criteria.matches(response) {
            (self.handler)(response, context);
        } else if let Some(fallback) = &self.fallback {
            fallback.run(response, context);
        }
    }
}

// Manual Debug since handlers are closures
impl<T, C> std::fmt::Debug for Matcher<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("criteria", &self.criteria)
            .field("fallback", &self.fallback.as_ref().map(|_| "..."))
            .finish_non_exhaustive()
    }
}

/// Creates a single matcher, optionally delegating to `fallback`.
pub fn match_response<T, C>(
    criteria: MatchCriteria,
    handler: impl Fn(&Response<T>, &C) + Send + Sync + 'static,
    fallback: Option<Matcher<T, C>>,
) -> Matcher<T, C> {
    let matcher = Matcher::new(criteria, handler);
    match fallback {
        Some(fallback) => matcher.with_fallback(fallback),
        None => matcher,
    }
}

/// Folds an ordered rule list into one chained matcher.
///
/// The first applicable rule in list order wins; the last rule is the
/// innermost fallback. Returns `None` for an empty list.
pub fn reduce_matchers<T, C>(
    rules: impl IntoIterator<Item = MatchRule<T, C>>,
) -> Option<Matcher<T, C>> {
    let rules: Vec<MatchRule<T, C>> = rules.into_iter().collect();

    rules.into_iter().rev().fold(None, |fallback, rule| {
        let matcher = Matcher {
            criteria: rule.criteria,
            handler: rule.handler,
            fallback: fallback.map(Box::new),
        };
        Some(matcher)
    })
}

/// Middleware that observes settled responses through a matcher.
///
/// Runs the wrapped operation, invokes the matcher on the settled
/// response purely for side effects, and returns the response
/// unchanged. The context is bound once at construction, mirroring how
/// request middleware is reified against caller options at setup time.
pub struct MatcherMiddleware<T, C> {
    matcher: Arc<Matcher<T, C>>,
    context: C,
    metadata: MiddlewareMetadata,
}

impl<T, C> MatcherMiddleware<T, C> {
    /// Wraps a matcher with its bound context.
    pub fn new(matcher: Matcher<T, C>, context: C) -> Self {
        Self::named("matcher", matcher, context)
    }

    /// Wraps a matcher under a diagnostic name.
    pub fn named(name: impl Into<Cow<'static, str>>, matcher: Matcher<T, C>, context: C) -> Self {
        Self {
            matcher: Arc::new(matcher),
            context,
            metadata: MiddlewareMetadata::new(name, MiddlewareKind::Matcher),
        }
    }
}

impl<P, T, C> Middleware<P, T> for MatcherMiddleware<T, C>
where
    P: Send + 'static,
    T: Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn call(&self, params: P, next: &Operation<P, T>) -> BoxFuture<'static, Response<T>> {
        let next = Arc::clone(next);
        let matcher = Arc::clone(&self.matcher);
        let context = self.context.clone();

        Box::pin(async move {
            let response = next(params).await;
            matcher.run(&response, &context);
            response
        })
    }

    fn metadata(&self) -> MiddlewareMetadata {
        self.metadata.clone()
    }
}

/// Packages a matcher and its context as boxed middleware.
pub fn matcher_middleware<P, T, C>(
    matcher: Matcher<T, C>,
    context: C,
) -> Arc<dyn Middleware<P, T>>
where
    P: Send + 'static,
    T: Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    Arc::new(MatcherMiddleware::new(matcher, context))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::middleware::{apply_middleware, operation};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging_rule(criteria: MatchCriteria, label: &str, log: &Log) -> MatchRule<Value, ()> {
        let label = label.to_string();
        let log = Arc::clone(log);
        MatchRule::new(criteria, move |_response, _ctx: &()| {
            log.lock().unwrap().push(label.clone());
        })
    }

    fn failure_of(error_type: &'static str) -> Response<Value> {
        Response::failure(RequestError::from(ApiError::new(error_type, "nope")))
    }

    #[test]
    fn dispatches_on_status_and_error_type() {
        let log: Log = Arc::default();
        let matcher = Matcher::new(
            MatchCriteria::Failure(ErrorType::new(ErrorType::NOT_FOUND)),
            {
                let log = Arc::clone(&log);
                move |_response: &Response<Value>, _ctx: &()| {
                    log.lock().unwrap().push("matched".to_string());
                }
            },
        );

        matcher.run(&failure_of(ErrorType::NOT_FOUND), &());
        assert_eq!(log.lock().unwrap().len(), 1);

        // A different error type does not fire the handler.
        matcher.run(&failure_of(ErrorType::NOT_UNIQUE), &());
        assert_eq!(log.lock().unwrap().len(), 1);

        // Neither does a success.
        matcher.run(&Response::success(json!({})), &());
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn generic_failure_rule_claims_unlisted_error_types() {
        let log: Log = Arc::default();
        let matcher = reduce_matchers([
            logging_rule(
                MatchCriteria::Failure(ErrorType::new(ErrorType::NOT_FOUND)),
                "specific",
                &log,
            ),
            logging_rule(MatchCriteria::Status(ResponseStatus::Failure), "generic", &log),
        ])
        .unwrap();

        matcher.run(&failure_of(ErrorType::NOT_UNIQUE), &());

        assert_eq!(*log.lock().unwrap(), vec!["generic"]);
    }

    #[test]
    fn first_listed_rule_wins() {
        let log: Log = Arc::default();
        let matcher = reduce_matchers([
            logging_rule(
                MatchCriteria::Failure(ErrorType::new(ErrorType::NOT_FOUND)),
                "specific",
                &log,
            ),
            logging_rule(MatchCriteria::Status(ResponseStatus::Failure), "generic", &log),
        ])
        .unwrap();

        matcher.run(&failure_of(ErrorType::NOT_FOUND), &());

        assert_eq!(*log.lock().unwrap(), vec!["specific"]);
    }

    #[test]
    fn errored_selects_transport_level_failures_only() {
        let criteria = MatchCriteria::Errored;

        let transport: Response<Value> =
            Response::failure(RequestError::transport("connection refused"));
        assert!(criteria.matches(&transport));

        assert!(!criteria.matches(&failure_of(ErrorType::NOT_FOUND)));
        assert!(!criteria.matches(&Response::success(json!({}))));
    }

    #[test]
    fn unmatched_responses_are_a_no_op() {
        let log: Log = Arc::default();
        let matcher = reduce_matchers([logging_rule(
            MatchCriteria::Status(ResponseStatus::Success),
            "success",
            &log,
        )])
        .unwrap();

        matcher.run(&failure_of(ErrorType::NOT_FOUND), &());

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn reduce_of_an_empty_list_is_none() {
        assert!(reduce_matchers::<Value, ()>([]).is_none());
    }

    #[tokio::test]
    async fn matcher_middleware_observes_without_altering() {
        let log: Log = Arc::default();
        let matcher = Matcher::new(MatchCriteria::Status(ResponseStatus::Success), {
            let log = Arc::clone(&log);
            move |response: &Response<Value>, _ctx: &()| {
                let data = response.data().cloned().unwrap_or(Value::Null);
                log.lock().unwrap().push(data.to_string());
            }
        });

        let base = operation(|(): ()| async move { Response::success(json!({"id": 1})) });
        let composed = apply_middleware(base, [matcher_middleware(matcher, ())]);

        let response = composed(()).await;

        assert_eq!(response, Response::success(json!({"id": 1})));
        assert_eq!(*log.lock().unwrap(), vec![r#"{"id":1}"#]);
    }
}
