//! CORS relay library.
//!
//! Forwards every request to one fixed upstream origin, presenting it as a
//! same-site browser fetch, and hands the response back with permissive CORS
//! headers and login cookies rewritten for the relay's own origin.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::Relay;
