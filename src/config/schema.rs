//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the priority proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, connection ceiling).
    pub listener: ListenerConfig,

    /// Classification policy: mode, threshold, header, labels.
    pub policy: PolicyConfig,

    /// Published per-request variable.
    pub variable: VariableConfig,

    /// Label routing table: what to do with each classification outcome.
    pub routes: Vec<RouteConfig>,

    /// Upstream server definitions, grouped into pools.
    pub upstreams: Vec<UpstreamConfig>,

    /// Rate limiter backing the throttle route action.
    pub throttle: ThrottleConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            policy: PolicyConfig::default(),
            variable: VariableConfig::default(),
            routes: default_routes(),
            upstreams: default_upstreams(),
            throttle: ThrottleConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Labels the active policy can emit, paired with the outcome name.
    /// Validation uses this to require a non-empty string and a route for
    /// every reachable outcome.
    pub fn active_labels(&self) -> Vec<(&'static str, &str)> {
        let labels = &self.policy.labels;
        match self.policy.mode {
            PolicyMode::LoadOnly => vec![
                ("normal", labels.normal.as_str()),
                ("high_load", labels.high_load.as_str()),
            ],
            PolicyMode::HeaderOnly => vec![
                ("high", labels.high.as_str()),
                ("low", labels.low.as_str()),
            ],
            PolicyMode::LoadWithPremiumOverride => vec![
                ("allow", labels.allow.as_str()),
                ("limit_premium", labels.limit_premium.as_str()),
                ("reject", labels.reject.as_str()),
            ],
        }
    }
}

/// Listener configuration.
///
/// `max_connections` doubles as the load-signal capacity: the connection
/// gauge reports (max_connections, free slots) to the classifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure + load signal).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Which decision table classifies requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Label from the active-connection count alone.
    LoadOnly,

    /// Label from a priority header alone.
    HeaderOnly,

    /// Load threshold with a premium-caller override under pressure.
    #[default]
    LoadWithPremiumOverride,
}

/// Classification policy configuration. Immutable once loaded; every
/// request reads it without synchronization.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Active decision table.
    pub mode: PolicyMode,

    /// Active-connection count above which high-load handling applies.
    /// A request at exactly this count is still normal load.
    pub threshold: u64,

    /// Header consulted by header-aware modes. Required for those modes;
    /// ignored by `load_only`.
    pub header_name: String,

    /// Output labels, one per decision outcome.
    pub labels: LabelConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mode: PolicyMode::LoadWithPremiumOverride,
            threshold: 30,
            header_name: "X-Premium-User".to_string(),
            labels: LabelConfig::default(),
        }
    }
}

/// Output labels per decision outcome.
///
/// Only the outcomes of the active mode are consulted. Defaults preserve
/// the conventional (inverted) stream naming: the unthrottled load-only
/// outcome is "high_priority_stream".
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    /// load_only: at or below threshold.
    pub normal: String,

    /// load_only: above threshold.
    pub high_load: String,

    /// header_only: header value matched "high".
    pub high: String,

    /// header_only: header absent or any other value.
    pub low: String,

    /// load_with_premium_override: at or below threshold.
    pub allow: String,

    /// load_with_premium_override: above threshold, premium caller.
    pub limit_premium: String,

    /// load_with_premium_override: above threshold, non-premium caller.
    pub reject: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            normal: "high_priority_stream".to_string(),
            high_load: "low_priority_stream".to_string(),
            high: "high_priority_stream".to_string(),
            low: "low_priority_stream".to_string(),
            allow: "allow".to_string(),
            limit_premium: "limit_premium".to_string(),
            reject: "reject".to_string(),
        }
    }
}

/// Published per-request variable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VariableConfig {
    /// Variable name for extensions and logs.
    pub name: String,

    /// Header carrying the label to the upstream and back to the client.
    pub header: String,
}

impl Default for VariableConfig {
    fn default() -> Self {
        Self {
            name: "my_priority_stream".to_string(),
            header: "x-priority-label".to_string(),
        }
    }
}

/// What the routing layer does with a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteActionKind {
    /// Forward to the named pool.
    Forward,

    /// Forward to the named pool, subject to the throttle limiter.
    Throttle,

    /// Answer immediately with `reject_status`.
    Reject,
}

/// One label routing rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Classification label this rule applies to.
    pub label: String,

    /// Action taken for the label.
    pub action: RouteActionKind,

    /// Target pool. Required for forward and throttle actions.
    #[serde(default)]
    pub pool: Option<String>,

    /// Response status for the reject action.
    #[serde(default = "default_reject_status")]
    pub reject_status: u16,
}

fn default_reject_status() -> u16 {
    429
}

/// Upstream server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Unique upstream identifier.
    pub name: String,

    /// Pool this server belongs to.
    pub pool: String,

    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Maximum concurrent connections to this upstream.
    #[serde(default = "default_max_upstream_conns")]
    pub max_connections: usize,
}

fn default_max_upstream_conns() -> usize {
    100
}

/// Rate limiter configuration for the throttle route action.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Sustained requests per second per client.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Default routing table for the default premium-override policy:
/// allow passes through, limit_premium is throttled, reject is refused.
fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            label: "allow".to_string(),
            action: RouteActionKind::Forward,
            pool: Some("default".to_string()),
            reject_status: default_reject_status(),
        },
        RouteConfig {
            label: "limit_premium".to_string(),
            action: RouteActionKind::Throttle,
            pool: Some("default".to_string()),
            reject_status: default_reject_status(),
        },
        RouteConfig {
            label: "reject".to_string(),
            action: RouteActionKind::Reject,
            pool: None,
            reject_status: default_reject_status(),
        },
    ]
}

fn default_upstreams() -> Vec<UpstreamConfig> {
    vec![UpstreamConfig {
        name: "default-1".to_string(),
        pool: "default".to_string(),
        address: "127.0.0.1:3000".to_string(),
        max_connections: default_max_upstream_conns(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_module() {
        let config = ProxyConfig::default();
        assert_eq!(config.policy.mode, PolicyMode::LoadWithPremiumOverride);
        assert_eq!(config.policy.threshold, 30);
        assert_eq!(config.policy.header_name, "X-Premium-User");
        assert_eq!(config.variable.name, "my_priority_stream");
        assert_eq!(config.policy.labels.allow, "allow");
        assert_eq!(config.policy.labels.limit_premium, "limit_premium");
        assert_eq!(config.policy.labels.reject, "reject");
    }

    #[test]
    fn test_minimal_toml_round_trip() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [policy]
            mode = "header_only"
            header_name = "X-Priority"
            "#,
        )
        .unwrap();
        assert_eq!(config.policy.mode, PolicyMode::HeaderOnly);
        assert_eq!(config.policy.header_name, "X-Priority");
        // untouched sections keep their defaults
        assert_eq!(config.listener.max_connections, 10_000);
        assert_eq!(config.policy.labels.high, "high_priority_stream");
    }

    #[test]
    fn test_route_toml_parsing() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [[routes]]
            label = "reject"
            action = "reject"
            reject_status = 503

            [[routes]]
            label = "allow"
            action = "forward"
            pool = "web"
            "#,
        )
        .unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].action, RouteActionKind::Reject);
        assert_eq!(config.routes[0].reject_status, 503);
        assert_eq!(config.routes[1].pool.as_deref(), Some("web"));
    }

    #[test]
    fn test_active_labels_per_mode() {
        let mut config = ProxyConfig::default();
        assert_eq!(config.active_labels().len(), 3);

        config.policy.mode = PolicyMode::LoadOnly;
        let labels = config.active_labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0], ("normal", "high_priority_stream"));
        assert_eq!(labels[1], ("high_load", "low_priority_stream"));
    }
}
