//! Label route lookup.
//!
//! # Responsibilities
//! - Store the compiled label → action table
//! - Resolve the action for a classification label
//! - Surface an explicit fallback for labels with no rule
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) label lookup via HashMap
//! - Validation guarantees every label the active policy emits has a rule;
//!   the fallback only covers operator-added labels

use std::collections::HashMap;

use axum::http::StatusCode;

use crate::config::{RouteActionKind, RouteConfig};

/// What to do with a request once it carries a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Forward to the named pool.
    Forward { pool: String },

    /// Forward to the named pool, subject to the per-client throttle.
    Throttle { pool: String },

    /// Answer immediately with the given status.
    Reject { status: StatusCode },
}

/// Compiled routing table from labels to actions.
#[derive(Debug)]
pub struct LabelRouter {
    routes: HashMap<String, RouteAction>,
    fallback: RouteAction,
}

impl LabelRouter {
    /// Compile the routing table from configuration.
    ///
    /// Later duplicate labels were already rejected by validation; if one
    /// slips through, the first rule wins, matching header-lookup
    /// semantics elsewhere in the system.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut table = HashMap::with_capacity(routes.len());
        for route in routes {
            let action = match route.action {
                RouteActionKind::Forward => RouteAction::Forward {
                    pool: route.pool.clone().unwrap_or_default(),
                },
                RouteActionKind::Throttle => RouteAction::Throttle {
                    pool: route.pool.clone().unwrap_or_default(),
                },
                RouteActionKind::Reject => RouteAction::Reject {
                    status: StatusCode::from_u16(route.reject_status)
                        .unwrap_or(StatusCode::TOO_MANY_REQUESTS),
                },
            };
            table.entry(route.label.clone()).or_insert(action);
        }
        Self {
            routes: table,
            fallback: RouteAction::Reject {
                status: StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    /// Resolve the action for a label.
    pub fn resolve(&self, label: &str) -> &RouteAction {
        match self.routes.get(label) {
            Some(action) => action,
            None => {
                tracing::warn!(label = %label, "no route for label, using fallback reject");
                &self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;

    #[test]
    fn test_default_table_resolution() {
        let config = ProxyConfig::default();
        let router = LabelRouter::from_config(&config.routes);

        assert_eq!(
            router.resolve("allow"),
            &RouteAction::Forward {
                pool: "default".to_string()
            }
        );
        assert_eq!(
            router.resolve("limit_premium"),
            &RouteAction::Throttle {
                pool: "default".to_string()
            }
        );
        assert_eq!(
            router.resolve("reject"),
            &RouteAction::Reject {
                status: StatusCode::TOO_MANY_REQUESTS
            }
        );
    }

    #[test]
    fn test_unknown_label_falls_back_to_reject() {
        let config = ProxyConfig::default();
        let router = LabelRouter::from_config(&config.routes);
        assert_eq!(
            router.resolve("mystery"),
            &RouteAction::Reject {
                status: StatusCode::SERVICE_UNAVAILABLE
            }
        );
    }

    #[test]
    fn test_first_rule_wins_on_duplicates() {
        let mut config = ProxyConfig::default();
        let mut duplicate = config.routes[0].clone();
        duplicate.action = crate::config::RouteActionKind::Reject;
        config.routes.push(duplicate);

        let router = LabelRouter::from_config(&config.routes);
        assert!(matches!(
            router.resolve("allow"),
            RouteAction::Forward { .. }
        ));
    }
}
