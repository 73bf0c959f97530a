//! Request and response types shared by the client and the action catalogue.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP verbs used by the simulation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully described call against the simulation API.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the API prefix (e.g. `/sym-type`).
    pub path: String,
    /// JSON body; `None` sends an empty request body.
    pub body: Option<Value>,
}

impl ActionRequest {
    /// Builds a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Attaches a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw JSON response of an action.
///
/// The server decides the schema, so this wraps an arbitrary JSON value
/// instead of a fixed struct. Commonly echoed keys are `action`, `status`,
/// `type`, `loading`, `num`, `items` and `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionResult(Value);

impl ActionResult {
    /// The empty object `{}`.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Wraps an arbitrary JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parses a response body, treating anything that is not valid JSON
    /// (including an empty body) as `{}`.
    pub fn from_body(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).map_or_else(|_| Self::empty(), Self)
    }

    /// Looks up a top-level key; `None` for missing keys or non-object values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Two-space indented JSON for display.
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl Default for ActionResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for ActionResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
