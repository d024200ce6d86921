//! Cross-origin headers for relayed responses.

use axum::http::header::{self, HeaderMap, HeaderValue};

/// Methods advertised to browsers, on preflights and regular responses alike.
pub const ALLOWED_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Add CORS headers to a non-preflight response.
///
/// With an `Origin`, that origin is echoed and `Vary: Origin` is set. Without one,
/// the wildcard is paired with `Allow-Credentials: true`; browsers refuse that
/// combination for credentialed requests, but non-browser callers depend on it.
pub fn apply_cors(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    match origin {
        Some(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
        None => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        }
    }
    headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("*"));
}
