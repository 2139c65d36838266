//! forge::error
//!
//! Errors from REST API access.
//!
//! Parsing and protocol-shape errors are always surfaced. The only error
//! absorbed anywhere is a `409 Conflict` during page iteration, which GitHub
//! returns for empty repositories (see [`ForgeError::is_conflict`]).

use thiserror::Error;

/// Errors from forge operations.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {}", summarize_body(.body))]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A `Link` header entry is not of the form `<URL>; rel="name"`.
    #[error("malformed link header entry: {entry:?}")]
    LinkParse {
        /// The offending entry
        entry: String,
    },

    /// A request URL could not be built.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The input that failed to resolve
        url: String,
        /// Parser message
        message: String,
    },

    /// The response body had an unexpected shape.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),
}

impl ForgeError {
    /// The HTTP status, for [`ForgeError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a `409 Conflict` response.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

/// Prefer GitHub's `{"message": ...}` over the raw body in messages.
fn summarize_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
