//! The relay pipeline.
//!
//! ```text
//! inbound request
//!     → OPTIONS? → preflight.rs (204, terminal)
//!     → request.rs (snapshot body, build outbound request)
//!     → upstream.rs (send; transport failure → 502)
//!     → response.rs (cookie policy, CORS)
//!     → client
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{self, HeaderValue};
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::RelayConfig;
use crate::http::request::request_id;
use crate::observability::{metrics, ExchangeObserver, NoopObserver};
use crate::proxy::cookies::CookiePolicy;
use crate::proxy::cors::apply_cors;
use crate::proxy::headers::non_empty;
use crate::proxy::preflight::{is_preflight, preflight_response};
use crate::proxy::request::{InboundRequest, OutboundRequest, RequestOptions};
use crate::proxy::response::transform_response;
use crate::proxy::target::{TargetAddress, TargetError};
use crate::proxy::upstream::{UpstreamClient, UpstreamError};

/// Error constructing a [`Relay`].
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

struct RelayInner {
    target: TargetAddress,
    options: RequestOptions,
    cookies: CookiePolicy,
    upstream: UpstreamClient,
    observer: Arc<dyn ExchangeObserver>,
    max_body_size: usize,
}

/// One configured relay. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

impl Relay {
    /// Build a relay with the no-op observer.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(
        config: &RelayConfig,
        observer: Arc<dyn ExchangeObserver>,
    ) -> Result<Self, RelayError> {
        let target = TargetAddress::parse(&config.upstream.url)?;
        let upstream = UpstreamClient::new(&config.timeouts)?;

        Ok(Self {
            inner: Arc::new(RelayInner {
                target,
                options: RequestOptions {
                    alt_used: config.upstream.alt_used,
                },
                cookies: CookiePolicy::new(config.cookies.login_path.clone()),
                upstream,
                observer,
                max_body_size: config.limits.max_body_size,
            }),
        })
    }

    pub fn target(&self) -> &TargetAddress {
        &self.inner.target
    }

    /// Relay one request. Always produces a response.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let inner = &*self.inner;
        let request_id = request_id(request.headers()).to_string();

        if is_preflight(request.method()) {
            tracing::debug!(
                request_id = %request_id,
                path = %request.uri().path(),
                "Answering preflight"
            );
            return preflight_response(request.headers());
        }

        let origin: Option<HeaderValue> = non_empty(request.headers(), &header::ORIGIN).cloned();

        let inbound = match InboundRequest::read(request, inner.max_body_size).await {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Rejecting request body");
                return with_cors(e.into_response(), origin.as_ref());
            }
        };

        let outbound = OutboundRequest::from_inbound(&inbound, &inner.target, &inner.options);
        let path = outbound.path().to_string();
        tracing::debug!(
            request_id = %request_id,
            method = %outbound.method,
            url = %outbound.url,
            "Forwarding request"
        );
        inner.observer.request_forwarded(&request_id, &outbound);

        let upstream = match inner.upstream.send(outbound).await {
            Ok(upstream) => upstream,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e.describe(), "Upstream error");
                metrics::record_upstream_failure();
                inner.observer.upstream_failed(&request_id, &e);
                return with_cors(e.into_response(), inbound.origin());
            }
        };
        inner.observer.response_received(&request_id, &upstream);

        let (response, rewritten) =
            transform_response(upstream, &path, inbound.origin(), &inner.cookies);
        if rewritten > 0 {
            tracing::info!(
                request_id = %request_id,
                count = rewritten,
                "Rewrote login cookies"
            );
            metrics::record_cookies_rewritten(rewritten);
        }
        response
    }
}

fn with_cors(mut response: Response, origin: Option<&HeaderValue>) -> Response {
    apply_cors(response.headers_mut(), origin);
    response
}
