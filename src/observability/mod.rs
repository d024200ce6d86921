//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay pipeline produces:
//!     → logging.rs (structured log events, request_id on every event)
//!     → metrics.rs (counters, histograms)
//!     → exchange.rs (optional header/body dumps via ExchangeObserver)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events
//! - Metrics are cheap (atomic increments)
//! - Exchange dumps are off by default and never affect the response

pub mod exchange;
pub mod logging;
pub mod metrics;

pub use exchange::{ExchangeObserver, NoopObserver, TracingObserver};
