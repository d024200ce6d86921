//! CORS preflight short-circuit. `OPTIONS` never reaches the upstream.

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::response::Response;

use crate::proxy::cors::ALLOWED_METHODS;
use crate::proxy::headers::non_empty;

/// Preflight cache lifetime in seconds.
pub const MAX_AGE_SECS: u32 = 86_400;

pub fn is_preflight(method: &Method) -> bool {
    *method == Method::OPTIONS
}

/// Headers answering a preflight with the given request headers.
pub fn preflight_headers(inbound: &HeaderMap) -> HeaderMap {
    let wildcard = HeaderValue::from_static("*");
    let mut headers = HeaderMap::new();

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        non_empty(inbound, &header::ORIGIN)
            .cloned()
            .unwrap_or_else(|| wildcard.clone()),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        non_empty(inbound, &header::ACCESS_CONTROL_REQUEST_HEADERS)
            .cloned()
            .unwrap_or(wildcard),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(MAX_AGE_SECS));

    headers
}

/// 204 with an empty body.
pub fn preflight_response(inbound: &HeaderMap) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    *response.headers_mut() = preflight_headers(inbound);
    response
}
