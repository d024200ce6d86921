//! Header helpers shared by both legs of the relay.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers (including those named by `Connection`)
//! - Look up single-valued request headers, treating empty values as absent

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Headers that describe a single transport hop and must not be forwarded.
pub const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers in place.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Connection may nominate extra per-hop headers; collect them before it goes.
    let nominated: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    for name in nominated.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// First value of `name`, or `None` when missing or empty.
pub fn non_empty<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a HeaderValue> {
    headers.get(name).filter(|v| !v.is_empty())
}
