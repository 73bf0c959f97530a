//! HTTP client for the simulation API.
//!
//! Every call is a single request against `<base_url><api_prefix><path>`:
//! no retries, no timeout, no caching. Response bodies are parsed leniently
//! (anything that is not JSON reads as `{}`), and non-2xx responses are
//! normalized into a [`RequestError`].

mod error;
mod types;

use std::future::Future;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

pub use error::{ClientError, RequestError};
pub use types::{ActionRequest, ActionResult, Method};

/// Path prefix every catalogue route lives under.
pub const API_PREFIX: &str = "/api/example";

/// Something that can carry an [`ActionRequest`] to the backend.
///
/// [`ApiClient`] is the real implementation; the seam lets the dispatcher be
/// driven without a network.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Performs exactly one call for `request`.
    fn execute(
        &self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<ActionResult, ClientError>> + Send;
}

/// `reqwest`-backed client bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Creates a client for `base_url` (scheme + authority, trailing slash
    /// optional) and an API prefix such as [`API_PREFIX`].
    pub fn new(base_url: &str, api_prefix: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}{}", base_url.trim_end_matches('/'), api_prefix),
        }
    }

    /// Base URL including the API prefix.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full URL for a catalogue path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Sends one request and returns the parsed response body.
    ///
    /// # Errors
    ///
    /// [`ClientError::Request`] for non-2xx statuses, [`ClientError::Transport`]
    /// when no response was received.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ActionResult, ClientError> {
        let url = self.url(path);
        log::debug!("{method} {url}");

        let mut builder = self
            .http
            .request(method.into(), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.inspect_err(|e| {
            log::warn!("{method} {url} failed: {e}");
        })?;
        let status = response.status();
        let data = match response.bytes().await {
            Ok(bytes) => ActionResult::from_body(&bytes),
            Err(e) => {
                log::debug!("{method} {url}: unreadable body treated as empty: {e}");
                ActionResult::empty()
            }
        };

        if !status.is_success() {
            let err = RequestError::from_response(status, &data);
            log::warn!("{method} {url} -> {}: {}", status.as_u16(), err.message);
            return Err(err.into());
        }
        Ok(data)
    }

    pub async fn get(&self, path: &str) -> Result<ActionResult, ClientError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<ActionResult, ClientError> {
        self.request(Method::Post, path, body).await
    }

    pub async fn delete(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ActionResult, ClientError> {
        self.request(Method::Delete, path, body).await
    }
}

impl Transport for ApiClient {
    fn execute(
        &self,
        request: ActionRequest,
    ) -> impl Future<Output = Result<ActionResult, ClientError>> + Send {
        let client = self.clone();
        async move {
            client
                .request(request.method, &request.path, request.body.as_ref())
                .await
        }
    }
}
