//! Request bodies accepted by the stub and its error shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SymTypeBody {
    #[serde(rename = "type")]
    pub sym_type: String,
}

/// Relay item list; `null` means "all items".
#[derive(Debug, Deserialize)]
pub struct ItemsBody {
    pub items: Option<Vec<String>>,
}

/// Loading factor; `null` when the console could not coerce the field.
#[derive(Debug, Deserialize)]
pub struct LoadingBody {
    pub loading: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RandomCasesBody {
    pub num: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub value: Option<String>,
}

/// Error body for 4xx replies, in the `{"detail": ...}` shape the client reads.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}
