//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing pools)
//! - Require every reachable label to have a non-empty text and a route
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted; per-request code assumes it passed

use std::collections::HashSet;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{PolicyMode, ProxyConfig, RouteActionKind};

/// A single semantic configuration problem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("policy mode '{mode}' requires policy.header_name")]
    MissingHeaderName { mode: String },

    #[error("label for outcome '{outcome}' is empty")]
    EmptyLabel { outcome: &'static str },

    #[error("label '{label}' is not a legal header value")]
    UnpublishableLabel { label: String },

    #[error("no route defined for label '{label}'")]
    UnroutedLabel { label: String },

    #[error("duplicate route for label '{label}'")]
    DuplicateRoute { label: String },

    #[error("route for label '{label}' requires a pool")]
    MissingPool { label: String },

    #[error("route for label '{label}' references unknown pool '{pool}'")]
    UnknownPool { label: String, pool: String },

    #[error("route for label '{label}' has invalid reject status {status}")]
    InvalidRejectStatus { label: String, status: u16 },

    #[error("upstream '{name}' has unparseable address '{address}'")]
    InvalidUpstreamAddress { name: String, address: String },

    #[error("variable.name must not be empty")]
    EmptyVariableName,

    #[error("variable.header '{header}' is not a legal header name")]
    InvalidVariableHeader { header: String },

    #[error("listener.max_connections must be greater than zero")]
    ZeroConnectionCapacity,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnectionCapacity);
    }

    let consults_headers = matches!(
        config.policy.mode,
        PolicyMode::HeaderOnly | PolicyMode::LoadWithPremiumOverride
    );
    if consults_headers && config.policy.header_name.is_empty() {
        errors.push(ValidationError::MissingHeaderName {
            mode: mode_name(config.policy.mode).to_string(),
        });
    }

    if config.variable.name.is_empty() {
        errors.push(ValidationError::EmptyVariableName);
    }
    if HeaderName::from_bytes(config.variable.header.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidVariableHeader {
            header: config.variable.header.clone(),
        });
    }

    let pools: HashSet<&str> = config.upstreams.iter().map(|u| u.pool.as_str()).collect();

    for upstream in &config.upstreams {
        if upstream.address.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidUpstreamAddress {
                name: upstream.name.clone(),
                address: upstream.address.clone(),
            });
        }
    }

    let mut routed: HashSet<&str> = HashSet::new();
    for route in &config.routes {
        if !routed.insert(route.label.as_str()) {
            errors.push(ValidationError::DuplicateRoute {
                label: route.label.clone(),
            });
        }
        match route.action {
            RouteActionKind::Forward | RouteActionKind::Throttle => match &route.pool {
                None => errors.push(ValidationError::MissingPool {
                    label: route.label.clone(),
                }),
                Some(pool) if !pools.contains(pool.as_str()) => {
                    errors.push(ValidationError::UnknownPool {
                        label: route.label.clone(),
                        pool: pool.clone(),
                    });
                }
                Some(_) => {}
            },
            RouteActionKind::Reject => {
                if !(100..=599).contains(&route.reject_status) {
                    errors.push(ValidationError::InvalidRejectStatus {
                        label: route.label.clone(),
                        status: route.reject_status,
                    });
                }
            }
        }
    }

    for (outcome, label) in config.active_labels() {
        if label.is_empty() {
            errors.push(ValidationError::EmptyLabel { outcome });
            continue;
        }
        if HeaderValue::from_str(label).is_err() {
            errors.push(ValidationError::UnpublishableLabel {
                label: label.to_string(),
            });
        }
        if !routed.contains(label) {
            errors.push(ValidationError::UnroutedLabel {
                label: label.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn mode_name(mode: PolicyMode) -> &'static str {
    match mode {
        PolicyMode::LoadOnly => "load_only",
        PolicyMode::HeaderOnly => "header_only",
        PolicyMode::LoadWithPremiumOverride => "load_with_premium_override",
    }
}
