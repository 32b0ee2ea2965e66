//! HTTP transport.
//!
//! [`Transport`] is the seam between the [`Bridge`](crate::Bridge) and the
//! network: it delivers one request and hands back the raw body text. Status
//! codes are deliberately not interpreted; a `500` with a JSON body is just
//! another body to classify.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`.

use std::future::Future;

use chatdesk_models::Routes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::SdkError;

/// Content type declared on every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Delivers requests to the backend and returns the response body as text.
///
/// Implementations must be cheap to clone: each in-flight call runs on its
/// own task with its own handle.
pub trait Transport: Clone + Send + Sync + 'static {
    /// `POST` a JSON body to `path`.
    fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<String, SdkError>> + Send;

    /// `GET` `path` with URL-encoded `query` pairs.
    fn get(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> impl Future<Output = Result<String, SdkError>> + Send;
}

/// `reqwest`-backed transport bound to one backend origin.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// Fails with [`SdkError::Config`] if the URL cannot be parsed or cannot
    /// carry a path.
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| SdkError::Config(format!("invalid base URL `{base_url}`: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(SdkError::Config(format!(
                "base URL `{base_url}` cannot carry endpoint paths"
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for `path` with `query` appended.
    pub fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url, SdkError> {
        let raw = Routes::join(&self.base_url, path);
        let url = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        url.map_err(|e| SdkError::Config(format!("invalid endpoint URL `{raw}`: {e}")))
    }

    async fn read_body(res: reqwest::Response) -> Result<String, SdkError> {
        let status = res.status();
        let text = res.text().await?;
        debug!(%status, bytes = text.len(), "response received");
        Ok(text)
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, SdkError> {
        let url = self.url(path, &[])?;
        debug!(%url, "POST");

        let bytes = serde_json::to_vec(body)?;
        let res = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await?;

        Self::read_body(res).await
    }

    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<String, SdkError> {
        let url = self.url(path, query)?;
        debug!(%url, "GET");

        let res = self.http.get(url).send().await?;
        Self::read_body(res).await
    }
}
