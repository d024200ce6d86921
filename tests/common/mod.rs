//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, Response},
    routing::any,
    Router,
};
use cors_relay::config::RelayConfig;
use cors_relay::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// What the mock upstream saw for one request.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("mock upstream saw no requests")
    }
}

type Reply = Arc<dyn Fn(&Recorded) -> Response<Body> + Send + Sync>;

#[derive(Clone)]
struct MockState {
    seen: Arc<Mutex<Vec<Recorded>>>,
    reply: Reply,
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response<Body> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let recorded = Recorded {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    };
    let response = (state.reply)(&recorded);
    state.seen.lock().unwrap().push(recorded);
    response
}

/// Start a programmable upstream on an ephemeral port.
///
/// Every request is recorded, then answered by `reply`.
pub async fn start_mock_upstream<F>(reply: F) -> MockUpstream
where
    F: Fn(&Recorded) -> Response<Body> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/{*path}", any(record))
        .route("/", any(record))
        .with_state(MockState {
            seen: seen.clone(),
            reply: Arc::new(reply),
        });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, seen }
}

/// A mock upstream that answers 200 with a fixed body.
#[allow(dead_code)]
pub async fn start_static_upstream(body: &'static str) -> MockUpstream {
    start_mock_upstream(move |_| Response::new(Body::from(body))).await
}

/// An upstream that waits `delay` before answering 200.
#[allow(dead_code)]
pub async fn start_slow_upstream(delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "too late"
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// A running relay plus the handle that keeps it alive.
#[allow(dead_code)]
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl RunningRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Relay config pointing at `upstream_url`.
pub fn relay_config(upstream_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.url = upstream_url.to_string();
    config.timeouts.connect_secs = 2;
    config.timeouts.request_secs = 10;
    config
}

/// Start `server` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_relay(server: HttpServer) -> RunningRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningRelay { addr, shutdown }
}

/// HTTP client that never follows redirects or uses system proxies.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
