//! Error types produced by the API client.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::types::ActionResult;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// The request never produced a response (connect, DNS, TLS, ...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Non-2xx response normalized to a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    /// Numeric HTTP status.
    pub status: u16,
    /// Server `detail` field, or the standard status phrase.
    pub message: String,
}

impl RequestError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Builds the error from a failed response and its (leniently parsed) body.
    ///
    /// A string `detail` is used verbatim; other non-null values are rendered
    /// as compact JSON. Without a `detail`, the canonical reason phrase is
    /// used, or the bare code when the status has none.
    pub fn from_response(status: StatusCode, body: &ActionResult) -> Self {
        let message = match body.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(Value::Null) | None => status
                .canonical_reason()
                .map_or_else(|| status.as_u16().to_string(), str::to_string),
            Some(other) => other.to_string(),
        };
        Self::new(status.as_u16(), message)
    }
}
