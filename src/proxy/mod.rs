//! Relay pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! axum handler
//!     → relay.rs (orchestrates one request)
//!         → preflight.rs (OPTIONS short-circuit)
//!         → request.rs (target URL, header rewrite, body snapshot)
//!         → upstream.rs (pooled client, no redirects, 502 on failure)
//!         → response.rs (cookies.rs + cors.rs)
//! ```
//!
//! # Design Decisions
//! - The upstream origin is fixed at startup (target.rs)
//! - Transformers are pure functions over header maps
//! - Bodies are buffered `Bytes` snapshots, readable more than once

pub mod cookies;
pub mod cors;
pub mod headers;
pub mod preflight;
pub mod relay;
pub mod request;
pub mod response;
pub mod target;
pub mod upstream;

pub use cookies::{CookieDirective, CookiePolicy};
pub use relay::{Relay, RelayError};
pub use request::{InboundRequest, OutboundRequest, RequestOptions};
pub use target::{TargetAddress, TargetError};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamResponse};
