//! Classifier construction and per-request evaluation.
//!
//! # Responsibilities
//! - Compile the configured policy into a concrete strategy at startup
//! - Sample the injected load provider exactly once per classification
//! - Produce the final Classification with its publication flags

use std::sync::Arc;

use crate::classify::policy::{
    HeaderOnlyPolicy, LoadOnlyPolicy, Policy, PremiumOverridePolicy,
};
use crate::config::{PolicyConfig, PolicyMode};
use crate::headers::HeaderView;
use crate::load::LoadSnapshotProvider;

/// The output of one classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The chosen label, always a non-empty configured string.
    pub label: String,

    /// Whether the routing layer may reuse this result for later reads
    /// within the same request. Always false: the label depends on a live
    /// load sample.
    pub cacheable: bool,

    /// Whether the value is defined. Always true: absence of a header is
    /// a handled branch, not a missing result.
    pub valid: bool,
}

impl Classification {
    /// Wrap a label with the fixed publication flags.
    pub fn new(label: String) -> Self {
        Self {
            label,
            cacheable: false,
            valid: true,
        }
    }
}

/// Per-request priority classifier.
///
/// Holds the compiled policy and the load provider capability. Stateless
/// across requests; safe to share behind an `Arc` and invoke concurrently.
#[derive(Debug)]
pub struct Classifier {
    policy: Box<dyn Policy>,
    provider: Arc<dyn LoadSnapshotProvider>,
}

impl Classifier {
    /// Create a classifier from an explicit policy and provider.
    pub fn new(policy: Box<dyn Policy>, provider: Arc<dyn LoadSnapshotProvider>) -> Self {
        Self { policy, provider }
    }

    /// Compile the configured policy.
    ///
    /// Expects a validated configuration; validation rejects header-consulting
    /// modes without a header name and empty labels before this runs.
    pub fn from_config(config: &PolicyConfig, provider: Arc<dyn LoadSnapshotProvider>) -> Self {
        let labels = &config.labels;
        let policy: Box<dyn Policy> = match config.mode {
            PolicyMode::LoadOnly => Box::new(LoadOnlyPolicy::new(
                config.threshold,
                labels.normal.clone(),
                labels.high_load.clone(),
            )),
            PolicyMode::HeaderOnly => Box::new(HeaderOnlyPolicy::new(
                config.header_name.clone(),
                labels.high.clone(),
                labels.low.clone(),
            )),
            PolicyMode::LoadWithPremiumOverride => Box::new(PremiumOverridePolicy::new(
                config.threshold,
                config.header_name.clone(),
                labels.allow.clone(),
                labels.limit_premium.clone(),
                labels.reject.clone(),
            )),
        };
        Self::new(policy, provider)
    }

    /// Name of the active policy, for logs and metric labels.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Classify one request.
    ///
    /// Samples the provider once, then applies the decision table. Total
    /// function: never fails, never blocks.
    pub fn classify(&self, request_id: &str, headers: &HeaderView<'_>) -> Classification {
        let snapshot = self.provider.sample();
        self.policy.evaluate(request_id, headers, snapshot)
    }
}
