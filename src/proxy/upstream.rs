//! Upstream invocation.
//!
//! # Responsibilities
//! - Send the outbound request over a pooled HTTP(S) client
//! - Buffer the upstream response into a re-readable snapshot
//! - Translate transport failures into 502 Bad Gateway
//!
//! # Design Decisions
//! - Redirects are never followed; 3xx responses flow back untouched
//! - No retries: a failed call is answered once with 502
//! - Connect and total timeouts live on the client's transport
//! - Only the status code is kept; reqwest does not expose the upstream reason phrase

use std::time::Duration;

use axum::body::Bytes;
use axum::http::header::HeaderMap;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reqwest::redirect::Policy;
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::proxy::request::OutboundRequest;

/// Transport-level failure talking to the upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Send(#[source] reqwest::Error),

    #[error("upstream response body failed: {0}")]
    Body(#[source] reqwest::Error),
}

impl UpstreamError {
    /// The error and its whole source chain, `: `-separated, without repeats.
    pub fn describe(&self) -> String {
        let mut description = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if !description.contains(&text) {
                description.push_str(": ");
                description.push_str(&text);
            }
            source = err.source();
        }
        description
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, format!("Bad gateway: {}", self.describe())).into_response()
    }
}

/// Buffered upstream response. `Bytes` clones share the buffer, so the body can
/// be inspected and forwarded without draining it. The reason phrase is not carried.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP client bound to the relay's transport settings.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(timeouts.upstream())
            .no_proxy()
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self { client })
    }

    /// Send `request` and buffer the full response.
    pub async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(UpstreamError::Send)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(UpstreamError::Body)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
