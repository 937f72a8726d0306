//! HTTP transport helpers: URL building, dispatch, and status mapping.

use crate::error::ApiError;
use reqwest::{Method, Url};
use std::time::Duration;

/// Build an HTTP client with timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gtasks/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// One outbound API call, independent of the bearer it is sent with.
#[derive(Debug, Clone)]
pub(super) struct ApiRequest {
    pub(super) method: Method,
    pub(super) segments: Vec<String>,
    pub(super) query: Vec<(&'static str, String)>,
    pub(super) body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub(super) fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(super) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(super) fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Join `base_url` and percent-encoded path segments.
pub(super) fn build_url(base_url: &str, request: &ApiRequest) -> Result<Url, ApiError> {
    let mut url = Url::parse(base_url)
        .map_err(|err| ApiError::InvalidRequest(format!("bad API base URL `{base_url}`: {err}")))?;
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            ApiError::InvalidRequest(format!("API base URL `{base_url}` cannot take a path"))
        })?;
        path.pop_if_empty();
        path.extend(request.segments.iter().map(String::as_str));
    }
    if !request.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

/// Send one request; returns the response body on 2xx.
pub(super) async fn dispatch_request(
    http: &reqwest::Client,
    base_url: &str,
    request: &ApiRequest,
    bearer: &str,
) -> Result<String, ApiError> {
    let url = build_url(base_url, request)?;
    tracing::debug!(method = %request.method, %url, "tasks api request");
    let mut builder = http
        .request(request.method.clone(), url)
        .bearer_auth(bearer);
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }
    let response = builder.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "tasks api error response");
        return Err(ApiError::status(status.as_u16(), &text));
    }
    Ok(text)
}

/// Deserialize a 2xx body, naming the operation on failure.
pub(super) fn parse_body<T: serde::de::DeserializeOwned>(
    operation: &str,
    body: &str,
) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::InvalidResponse(format!("{operation}: {err}")))
}
