//! Response transformation.
//!
//! # Responsibilities
//! - Pass the upstream status and body through unchanged (3xx included)
//! - Apply the Set-Cookie policy
//! - Add CORS headers for the requesting origin
//!
//! # Design Decisions
//! - `Location` is never rewritten
//! - Hop-by-hop headers are stripped; the body is re-framed by the server

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderValue};
use axum::response::Response;

use crate::proxy::cookies::CookiePolicy;
use crate::proxy::cors::apply_cors;
use crate::proxy::headers::strip_hop_by_hop;
use crate::proxy::upstream::UpstreamResponse;

/// Result of [`response_headers`]: the headers plus how many cookies were re-added.
#[derive(Debug)]
pub struct TransformedHeaders {
    pub headers: HeaderMap,
    pub cookies_rewritten: usize,
}

/// Derive the client-facing header set from the upstream one.
pub fn response_headers(
    upstream: &HeaderMap,
    path: &str,
    origin: Option<&HeaderValue>,
    cookies: &CookiePolicy,
) -> TransformedHeaders {
    let mut headers = upstream.clone();
    strip_hop_by_hop(&mut headers);
    let cookies_rewritten = cookies.apply(path, &mut headers);
    apply_cors(&mut headers, origin);

    TransformedHeaders {
        headers,
        cookies_rewritten,
    }
}

/// Build the response returned to the client.
pub fn transform_response(
    upstream: UpstreamResponse,
    path: &str,
    origin: Option<&HeaderValue>,
    cookies: &CookiePolicy,
) -> (Response, usize) {
    let TransformedHeaders {
        headers,
        cookies_rewritten,
    } = response_headers(&upstream.headers, path, origin, cookies);

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    (response, cookies_rewritten)
}
