//! Classification policies.
//!
//! # Responsibilities
//! - Turn (headers, load snapshot) into a label per the configured policy
//! - Emit a trace record at each decision point
//!
//! # Design Decisions
//! - One named type per decision table; deployments select exactly one
//! - Labels come from configuration; the condition→label mapping is fixed
//!   here, the label text is not
//! - Header value matching is case-insensitive and exact-length ("highest"
//!   never matches "high")

use crate::classify::classifier::Classification;
use crate::headers::HeaderView;
use crate::load::LoadSnapshot;

/// A classification decision table.
///
/// Implementations are pure: no shared mutable state, no error path, the
/// same inputs always produce the same label.
pub trait Policy: Send + Sync + std::fmt::Debug {
    /// Policy name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Evaluate the decision table for one request.
    fn evaluate(
        &self,
        request_id: &str,
        headers: &HeaderView<'_>,
        load: LoadSnapshot,
    ) -> Classification;
}

/// Load-only policy: headers are not consulted.
///
/// Note the inherited label naming: the unthrottled outcome is
/// conventionally "high_priority_stream" and the throttled one
/// "low_priority_stream". The mapping from condition to label is what
/// matters; the text is configuration.
#[derive(Debug)]
pub struct LoadOnlyPolicy {
    threshold: u64,
    normal_label: String,
    high_load_label: String,
}

impl LoadOnlyPolicy {
    pub fn new(threshold: u64, normal_label: String, high_load_label: String) -> Self {
        Self {
            threshold,
            normal_label,
            high_load_label,
        }
    }
}

impl Policy for LoadOnlyPolicy {
    fn name(&self) -> &'static str {
        "load_only"
    }

    fn evaluate(
        &self,
        request_id: &str,
        _headers: &HeaderView<'_>,
        load: LoadSnapshot,
    ) -> Classification {
        let active = load.active();
        // A request at exactly the threshold still counts as normal load.
        let label = if active > self.threshold {
            &self.high_load_label
        } else {
            &self.normal_label
        };

        tracing::debug!(
            request_id = %request_id,
            active,
            threshold = self.threshold,
            label = %label,
            "load-only classification"
        );

        Classification::new(label.clone())
    }
}

/// Header-only policy: load is not consulted.
///
/// The default outcome is the low label; only a header value equal to
/// "high" (any case, exact length) selects the high label.
#[derive(Debug)]
pub struct HeaderOnlyPolicy {
    header_name: String,
    high_label: String,
    low_label: String,
}

impl HeaderOnlyPolicy {
    pub fn new(header_name: String, high_label: String, low_label: String) -> Self {
        Self {
            header_name,
            high_label,
            low_label,
        }
    }
}

impl Policy for HeaderOnlyPolicy {
    fn name(&self) -> &'static str {
        "header_only"
    }

    fn evaluate(
        &self,
        request_id: &str,
        headers: &HeaderView<'_>,
        _load: LoadSnapshot,
    ) -> Classification {
        let value = headers.find(&self.header_name);
        let is_high = matches!(value, Some(v) if v.eq_ignore_ascii_case(b"high"));
        let label = if is_high {
            &self.high_label
        } else {
            &self.low_label
        };

        tracing::debug!(
            request_id = %request_id,
            header = %self.header_name,
            present = value.is_some(),
            high = is_high,
            label = %label,
            "header-only classification"
        );

        Classification::new(label.clone())
    }
}

/// Load policy with a premium override under pressure.
///
/// | active vs threshold | premium | outcome       |
/// |---------------------|---------|---------------|
/// | active <= threshold | any     | allow         |
/// | active >  threshold | true    | limit_premium |
/// | active >  threshold | false   | reject        |
#[derive(Debug)]
pub struct PremiumOverridePolicy {
    threshold: u64,
    header_name: String,
    allow_label: String,
    limit_premium_label: String,
    reject_label: String,
}

impl PremiumOverridePolicy {
    pub fn new(
        threshold: u64,
        header_name: String,
        allow_label: String,
        limit_premium_label: String,
        reject_label: String,
    ) -> Self {
        Self {
            threshold,
            header_name,
            allow_label,
            limit_premium_label,
            reject_label,
        }
    }
}

impl Policy for PremiumOverridePolicy {
    fn name(&self) -> &'static str {
        "load_with_premium_override"
    }

    fn evaluate(
        &self,
        request_id: &str,
        headers: &HeaderView<'_>,
        load: LoadSnapshot,
    ) -> Classification {
        // Anything other than "true" (any case), including absence,
        // is non-premium.
        let premium = matches!(
            headers.find(&self.header_name),
            Some(v) if v.eq_ignore_ascii_case(b"true")
        );
        let active = load.active();

        let label = if active <= self.threshold {
            &self.allow_label
        } else if premium {
            &self.limit_premium_label
        } else {
            &self.reject_label
        };

        tracing::debug!(
            request_id = %request_id,
            active,
            threshold = self.threshold,
            premium,
            label = %label,
            "premium-override classification"
        );

        Classification::new(label.clone())
    }
}
