//! Request dispatch: one POST per query, outcome classified into a [`QueryResult`].
//!
//! The dispatcher never retries and never mutates session state. Both
//! surfaces await the same future; the terminal simply has nothing else to
//! do while it waits.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;

use crate::types::{FailureKind, QueryRequest, QueryResult};

/// Answer shown when the backend response carries no usable `answer` field.
pub const NO_ANSWER: &str = "(no answer)";

/// Anything that can turn a request into a result.
///
/// [`HttpDispatcher`] is the real implementation; tests substitute their own.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Perform exactly one logical attempt.
    async fn dispatch(&self, request: &QueryRequest) -> QueryResult;
}

/// Sends queries to the answer service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpDispatcher {
    /// Create a dispatcher for `endpoint` with a default client.
    ///
    /// The default client has no request timeout; whatever the OS applies to
    /// connection attempts is all there is.
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Backend for HttpDispatcher {
    async fn dispatch(&self, request: &QueryRequest) -> QueryResult {
        let endpoint = &self.endpoint;
        tracing::debug!(
            endpoint = %endpoint,
            n_results = request.result_count(),
            query_len = request.text().len(),
            "Dispatching query"
        );

        let response = match self
            .client
            .post(endpoint.clone())
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = describe_error(&e);
                tracing::warn!(endpoint = %endpoint, error = %message, "Backend unreachable");
                return QueryResult::Failure {
                    kind: FailureKind::Transport,
                    message,
                    status_code: None,
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                let message = describe_error(&e);
                tracing::warn!(status = %status, error = %message, "Failed to read response body");
                return QueryResult::Failure {
                    kind: FailureKind::Transport,
                    message,
                    status_code: None,
                };
            }
            // Non-2xx: the status alone is reported.
            Err(_) => String::new(),
        };

        if !status.is_success() {
            tracing::warn!(status = %status, body_len = body.len(), "Backend returned failure status");
            return http_failure(status, &body);
        }

        let result = parse_success_body(&body);
        match &result {
            QueryResult::Success { sources, .. } => {
                tracing::debug!(status = %status, sources = sources.len(), "Backend answered");
            }
            QueryResult::Failure { message, .. } => {
                tracing::warn!(status = %status, error = %message, "Backend response was not JSON");
            }
        }
        result
    }
}

/// Map a non-2xx response to a failure: reason phrase plus the body verbatim.
fn http_failure(status: StatusCode, body: &str) -> QueryResult {
    let mut message = status.canonical_reason().unwrap_or_default().to_string();
    if !body.is_empty() {
        if !message.is_empty() {
            message.push_str(" - ");
        }
        message.push_str(body);
    }
    QueryResult::Failure {
        kind: FailureKind::Http,
        message,
        status_code: Some(status.as_u16()),
    }
}

/// Interpret the body of a 2xx response.
///
/// `answer` falls back to [`NO_ANSWER`] when absent or null; non-string
/// values are shown as their JSON text. `retrieved_context` counts only when
/// it is an array.
pub fn parse_success_body(body: &str) -> QueryResult {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            return QueryResult::Failure {
                kind: FailureKind::Http,
                message: e.to_string(),
                status_code: None,
            }
        }
    };

    let answer = match value.get("answer") {
        None | Some(Value::Null) => NO_ANSWER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let sources = match value.get("retrieved_context") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    QueryResult::Success { answer, sources }
}

/// Flatten an error and its sources into one line, skipping causes already
/// quoted by their parent.
fn describe_error(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

// =============================================================================
// Tests
// =============================================================================
