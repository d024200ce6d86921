//! Request transformation.
//!
//! # Responsibilities
//! - Capture the inbound request (with a re-readable body snapshot)
//! - Build the outbound URL from the target origin and the inbound path/query
//! - Rewrite identity headers so the upstream sees a same-site browser fetch
//!
//! # Design Decisions
//! - Header construction is a pure function of (inbound headers, target, path)
//! - GET and HEAD never carry a body upstream
//! - Bodies are forwarded as raw bytes, never re-encoded

use axum::body::{Body, Bytes};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use thiserror::Error;
use url::Url;

use crate::proxy::headers::{non_empty, strip_hop_by_hop};
use crate::proxy::target::TargetAddress;

pub const SEC_FETCH_SITE: HeaderName = HeaderName::from_static("sec-fetch-site");
pub const SEC_FETCH_MODE: HeaderName = HeaderName::from_static("sec-fetch-mode");
pub const SEC_FETCH_DEST: HeaderName = HeaderName::from_static("sec-fetch-dest");
pub const ALT_USED: HeaderName = HeaderName::from_static("alt-used");

/// Request as received from the client.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// `None` for GET and HEAD. `Bytes` clones share the buffer, so the body
    /// can be read again after it has been forwarded.
    pub body: Option<Bytes>,
}

/// Failure to read the inbound body.
#[derive(Debug, Error)]
#[error("failed to read request body: {0}")]
pub struct BodyReadError(#[source] pub axum::Error);

impl BodyReadError {
    /// True when the body was larger than the configured limit.
    pub fn exceeded_limit(&self) -> bool {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&self.0);
        while let Some(err) = source {
            if err.is::<LengthLimitError>() {
                return true;
            }
            source = err.source();
        }
        false
    }
}

impl IntoResponse for BodyReadError {
    fn into_response(self) -> Response {
        if self.exceeded_limit() {
            (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
        } else {
            (StatusCode::BAD_REQUEST, self.to_string()).into_response()
        }
    }
}

/// True for methods whose body is never forwarded.
pub fn is_bodiless(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

impl InboundRequest {
    /// Split the request and buffer its body (up to `limit` bytes).
    pub async fn read(request: Request<Body>, limit: usize) -> Result<Self, BodyReadError> {
        let (parts, body) = request.into_parts();

        let body = if is_bodiless(&parts.method) {
            None
        } else {
            Some(
                axum::body::to_bytes(body, limit)
                    .await
                    .map_err(BodyReadError)?,
            )
        };

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        })
    }

    /// Path as received, before dot-segment normalization.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The client's `Origin` header, if present and non-empty.
    pub fn origin(&self) -> Option<&HeaderValue> {
        non_empty(&self.headers, &header::ORIGIN)
    }
}

/// Per-upstream header options.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    /// Send `Alt-Used: <target-hostname>`.
    pub alt_used: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { alt_used: true }
    }
}

/// Request to be sent upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Normalized path the upstream will see.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn from_inbound(
        inbound: &InboundRequest,
        target: &TargetAddress,
        options: &RequestOptions,
    ) -> Self {
        let body = if is_bodiless(&inbound.method) {
            None
        } else {
            inbound.body.clone()
        };

        let url = target.url_for(inbound.uri.path(), inbound.uri.query());
        // Referer and the cookie policy see the same normalized path as the upstream.
        let headers = outbound_headers(&inbound.headers, target, url.path(), options);

        Self {
            method: inbound.method.clone(),
            url,
            headers,
            body,
        }
    }
}

/// Build the outbound header set from the inbound one.
///
/// `Host` and `Content-Length` are dropped: the client derives them from the
/// target URL and the forwarded body.
pub fn outbound_headers(
    inbound: &HeaderMap,
    target: &TargetAddress,
    path: &str,
    options: &RequestOptions,
) -> HeaderMap {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    if let Ok(origin) = HeaderValue::from_str(&target.origin_header()) {
        headers.insert(header::ORIGIN, origin);
    }
    if let Ok(referer) = HeaderValue::from_str(&target.referer_for(path)) {
        headers.insert(header::REFERER, referer);
    }

    headers.insert(SEC_FETCH_SITE, HeaderValue::from_static("same-site"));
    headers.insert(SEC_FETCH_MODE, HeaderValue::from_static("cors"));
    headers.insert(SEC_FETCH_DEST, HeaderValue::from_static("empty"));

    if options.alt_used {
        if let Ok(host) = HeaderValue::from_str(target.hostname()) {
            headers.insert(ALT_USED, host);
        }
    }

    headers
}
