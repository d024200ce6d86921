//! Exchange observation hook.
//!
//! The relay reports each forwarded request, each upstream response and each
//! upstream failure to an [`ExchangeObserver`]. Observers only look; nothing they
//! do can change what the client receives.

use crate::proxy::request::OutboundRequest;
use crate::proxy::upstream::{UpstreamError, UpstreamResponse};

/// Side channel for inspecting relayed traffic.
pub trait ExchangeObserver: Send + Sync {
    fn request_forwarded(&self, _request_id: &str, _request: &OutboundRequest) {}

    fn response_received(&self, _request_id: &str, _response: &UpstreamResponse) {}

    fn upstream_failed(&self, _request_id: &str, _error: &UpstreamError) {}
}

/// Default observer. Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExchangeObserver for NoopObserver {}

/// Logs headers and bodies at debug level.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    body_limit: usize,
}

impl TracingObserver {
    /// `body_limit` caps how many body bytes are rendered per event.
    pub fn new(body_limit: usize) -> Self {
        Self { body_limit }
    }
}

impl ExchangeObserver for TracingObserver {
    fn request_forwarded(&self, request_id: &str, request: &OutboundRequest) {
        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            url = %request.url,
            headers = ?request.headers,
            body = %request
                .body
                .as_deref()
                .map(|b| render_body(b, self.body_limit))
                .unwrap_or_else(|| "<none>".to_string()),
            "Forwarding request upstream"
        );
    }

    fn response_received(&self, request_id: &str, response: &UpstreamResponse) {
        tracing::debug!(
            request_id = %request_id,
            status = %response.status,
            headers = ?response.headers,
            body = %render_body(&response.body, self.body_limit),
            "Upstream response received"
        );
    }

    fn upstream_failed(&self, request_id: &str, error: &UpstreamError) {
        tracing::debug!(
            request_id = %request_id,
            error = %error.describe(),
            "Upstream exchange failed"
        );
    }
}

/// Render a body for logs: UTF-8 text cut at `limit` bytes, or a byte count for binary.
pub fn render_body(body: &[u8], limit: usize) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }

    let Ok(text) = std::str::from_utf8(body) else {
        return format!("<{} bytes binary>", body.len());
    };

    if text.len() <= limit {
        return text.to_string();
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &text[..end], text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_within_limit() {
        assert_eq!(render_body(b"{\"ok\":true}", 64), "{\"ok\":true}");
        assert_eq!(render_body(b"", 64), "<empty>");
    }

    #[test]
    fn test_render_truncates_on_char_boundary() {
        // "مرحبا" is 10 bytes; a 5 byte cap lands mid-character.
        let text = "مرحبا";
        let rendered = render_body(text.as_bytes(), 5);
        assert_eq!(rendered, "مر... (10 bytes total)");
    }

    #[test]
    fn test_render_binary_as_size() {
        assert_eq!(render_body(&[0xff, 0xfe, 0x00], 64), "<3 bytes binary>");
    }
}
