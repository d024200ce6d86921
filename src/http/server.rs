//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Dispatch every request to the relay pipeline
//! - Record request metrics

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::{metrics, ExchangeObserver, NoopObserver, TracingObserver};
use crate::proxy::{Relay, RelayError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Relay,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Exchange logging follows `observability.log_exchanges`.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let observer: Arc<dyn ExchangeObserver> = if config.observability.log_exchanges {
            Arc::new(TracingObserver::new(config.observability.body_log_limit))
        } else {
            Arc::new(NoopObserver)
        };
        Self::with_observer(config, observer)
    }

    /// Create a server reporting exchanges to `observer`.
    pub fn with_observer(
        config: RelayConfig,
        observer: Arc<dyn ExchangeObserver>,
    ) -> Result<Self, RelayError> {
        let relay = Relay::with_observer(&config, observer)?;

        tracing::info!(
            upstream = %relay.target(),
            login_path = %config.cookies.login_path,
            "Relay configured"
        );

        let router = Self::build_router(&config, AppState { relay });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
                    .layer(TimeoutLayer::new(config.timeouts.server())),
            )
    }

    /// The fully layered router, for driving the relay without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until SIGINT/SIGTERM or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay every request, whatever the method or path.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let response = state.relay.handle(request).await;

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}
