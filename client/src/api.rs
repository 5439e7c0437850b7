//! HTTP API client for the campaign server.
//!
//! [`ApiClient`] is an explicit object constructed once at application
//! start with an injected base URL and [`HeaderProvider`], then passed
//! by reference — there is no module-level singleton. Every call
//! returns a settled [`Response`]; transport problems, undecodable
//! bodies, and structured server errors all come back as failure
//! responses, never as panics or raw `Err`s (spec'd in the error
//! taxonomy of `lorekeeper-core`).
//!
//! # Wire contract
//!
//! The server wraps every body in an envelope:
//!
//! ```json
//! { "ok": true,  "data": { ... } }
//! { "ok": false, "error": { "type": "...", "message": "...", "data": { ... } } }
//! ```
//!
//! A failure envelope may also carry a `data` payload (e.g. the record
//! with its invalid attributes); it is preserved on the failure
//! response.
//!
//! # Member routes
//!
//! Paths may contain `:wildcard` segments (`rockets/:id`) interpolated
//! from the call params. Consumed params are removed; whatever remains
//! becomes the query string for GET/DELETE or the JSON body otherwise.

use crate::request::Params;
use lorekeeper_core::error::{ApiError, RequestError};
use lorekeeper_core::middleware::{Operation, operation};
use lorekeeper_core::response::Response;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Supplies headers for every request, e.g. the bearer token of the
/// current session.
///
/// Consulted per call, so a token refreshed mid-session is picked up
/// without rebuilding the client.
pub trait HeaderProvider: Send + Sync {
    /// Header name/value pairs to attach.
    fn headers(&self) -> Vec<(String, String)>;
}

/// A provider that attaches no headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeaders;

impl HeaderProvider for NoHeaders {
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// HTTP client speaking the campaign server's envelope protocol.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    header_provider: Arc<dyn HeaderProvider>,
}

impl ApiClient {
    /// Creates a client for `base_url` with injected headers.
    #[must_use]
    pub fn new(base_url: impl Into<String>, header_provider: Arc<dyn HeaderProvider>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            header_provider,
        }
    }

    /// Issues a GET request.
    pub async fn get(&self, path: &str, params: Params) -> Response<Value> {
        self.perform(Method::GET, path, params).await
    }

    /// Issues a POST request.
    pub async fn post(&self, path: &str, params: Params) -> Response<Value> {
        self.perform(Method::POST, path, params).await
    }

    /// Issues a PATCH request.
    pub async fn patch(&self, path: &str, params: Params) -> Response<Value> {
        self.perform(Method::PATCH, path, params).await
    }

    /// Issues a DELETE request.
    pub async fn delete(&self, path: &str, params: Params) -> Response<Value> {
        self.perform(Method::DELETE, path, params).await
    }

    /// Adapts one endpoint into a pipeline [`Operation`].
    #[must_use]
    pub fn operation(&self, method: Method, path: impl Into<String>) -> Operation<Params, Value> {
        let client = self.clone();
        let path = path.into();

        operation(move |params: Params| {
            let client = client.clone();
            let method = method.clone();
            let path = path.clone();
            async move { client.perform(method, &path, params).await }
        })
    }

    async fn perform(&self, method: Method, path: &str, params: Params) -> Response<Value> {
        let (path, params) = match interpolate_path(path, params) {
            Ok(interpolated) => interpolated,
            Err(error) => return Response::failure(error),
        };

        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        tracing::debug!(%method, %url, "api request");
        metrics::counter!("api.requests").increment(1);

        let mut request = self.http.request(method.clone(), &url);
        for (name, value) in self.header_provider.headers() {
            request = request.header(&name, &value);
        }

        request = if method == Method::GET || method == Method::DELETE {
            request.query(&query_pairs(&params))
        } else {
            request.json(&Value::Object(params))
        };

        let http_response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                metrics::counter!("api.transport_errors").increment(1);
                return Response::failure(RequestError::transport(error.to_string()));
            }
        };

        let status = http_response.status();
        let body = match http_response.text().await {
            Ok(body) => body,
            Err(error) => {
                metrics::counter!("api.transport_errors").increment(1);
                return Response::failure(RequestError::transport(error.to_string()));
            }
        };

        decode_envelope(status, &body)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// Replaces `:wildcard` path segments from params, consuming them.
///
/// A missing wildcard fails before anything is sent, surfacing as a
/// transport-level failure.
fn interpolate_path(path: &str, mut params: Params) -> Result<(String, Params), RequestError> {
    let mut segments = Vec::new();

    for segment in path.split('/') {
        if let Some(name) = segment.strip_prefix(':') {
            let Some(value) = params.remove(name) else {
                return Err(RequestError::transport(format!(
                    "missing wildcard `{name}` for path `{path}`"
                )));
            };
            segments.push(scalar_to_string(&value));
        } else {
            segments.push(segment.to_string());
        }
    }

    Ok((segments.join("/"), params))
}

fn query_pairs(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), scalar_to_string(value)))
        .collect()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}

fn decode_envelope(status: StatusCode, body: &str) -> Response<Value> {
    if body.trim().is_empty() {
        if status.is_success() {
            return Response::success(Value::Null);
        }

        return Response::failure(RequestError::decode(format!(
            "empty body with status {status}"
        )));
    }

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(error) => {
            metrics::counter!("api.decode_errors").increment(1);
            return Response::failure(RequestError::decode(error.to_string()));
        }
    };

    if envelope.ok {
        return Response::Success {
            data: envelope.data.unwrap_or(Value::Null),
        };
    }

    match envelope.error {
        Some(error) => Response::Failure {
            error: RequestError::Api(error),
            data: envelope.data,
        },
        None => Response::failure(RequestError::decode(
            "failure envelope without an error object",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use lorekeeper_core::error::ErrorType;
    use serde_json::json;

    fn params_from(value: Value) -> Params {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn interpolates_wildcard_segments_and_consumes_them() {
        let params = params_from(json!({"id": 7, "order": "name"}));

        let (path, remaining) = interpolate_path("rockets/:id", params).unwrap();

        assert_eq!(path, "rockets/7");
        assert_eq!(remaining.get("order"), Some(&json!("name")));
        assert!(!remaining.contains_key("id"));
    }

    #[test]
    fn string_wildcards_are_not_quoted() {
        let params = params_from(json!({"slug": "imp-iv"}));

        let (path, _) = interpolate_path("rockets/:slug", params).unwrap();

        assert_eq!(path, "rockets/imp-iv");
    }

    #[test]
    fn a_missing_wildcard_fails_before_sending() {
        let result = interpolate_path("rockets/:id", Params::new());

        let error = result.unwrap_err();
        assert!(error.is_errored());
        assert!(error.to_string().contains("missing wildcard `id`"));
    }

    #[test]
    fn success_envelopes_decode_to_success() {
        let response = decode_envelope(
            StatusCode::OK,
            r#"{"ok": true, "data": {"name": "Imp IV"}}"#,
        );

        assert_eq!(response, Response::success(json!({"name": "Imp IV"})));
    }

    #[test]
    fn failure_envelopes_preserve_partial_data() {
        let body = json!({
            "ok": false,
            "error": {
                "type": ErrorType::INVALID_PARAMETERS,
                "message": "Rocket is invalid",
            },
            "data": {"name": ""},
        })
        .to_string();

        let response = decode_envelope(StatusCode::UNPROCESSABLE_ENTITY, &body);

        assert!(response.is_failure());
        assert!(response.has_data());
        assert_eq!(response.data(), Some(&json!({"name": ""})));
        assert_eq!(
            response.error_type().map(ErrorType::as_str),
            Some(ErrorType::INVALID_PARAMETERS)
        );
    }

    #[test]
    fn non_envelope_bodies_are_decode_failures() {
        let response = decode_envelope(StatusCode::OK, "<html>proxy error</html>");

        let error = response.error().unwrap();
        assert!(matches!(error, RequestError::Decode(_)));
    }

    #[test]
    fn empty_success_bodies_settle_with_null() {
        let response = decode_envelope(StatusCode::NO_CONTENT, "");

        assert_eq!(response, Response::success(Value::Null));
    }
}
