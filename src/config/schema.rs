//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::Deserialize;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream origin every request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Set-Cookie rewrite policy.
    pub cookies: CookieConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin URL (scheme, host and optional port). Any path or query is ignored.
    pub url: String,

    /// Send `Alt-Used: <host>` on forwarded requests.
    pub alt_used: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://ecsc-expat.sy:8443".to_string(),
            alt_used: true,
        }
    }
}

/// Cookie rewrite configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// Exact request path whose Set-Cookie headers are rewritten and forwarded.
    /// Cookies on every other path are stripped.
    pub login_path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            login_path: "/secure/auth/login".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 60,
        }
    }
}

impl TimeoutConfig {
    /// Total time the upstream client may spend on one exchange.
    pub fn upstream(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    /// Server-side cap on a whole request. Strictly longer than [`Self::upstream`],
    /// so a slow upstream is reported as 502 by the relay before this fires.
    pub fn server(&self) -> Duration {
        Duration::from_secs(self.request_secs.saturating_add(self.connect_secs.max(1)))
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Log forwarded headers and bodies at debug level.
    pub log_exchanges: bool,

    /// Maximum number of body bytes rendered per logged exchange.
    pub body_log_limit: usize,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_exchanges: false,
            body_log_limit: 2048,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
