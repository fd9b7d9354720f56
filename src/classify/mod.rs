//! Priority classification subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (headers) + injected LoadSnapshotProvider
//!     → classifier.rs (sample load once, delegate to policy)
//!     → policy.rs (LoadOnly | HeaderOnly | PremiumOverride decision table)
//!     → Classification { label, cacheable: false, valid: true }
//!     → variable.rs (published as a per-request variable)
//! ```
//!
//! # Design Decisions
//! - One classifier, three explicit policies selected by configuration;
//!   the near-duplicate per-policy modules this replaces shared everything
//!   but their decision table
//! - Classification is a total function: absence and anomalies resolve to
//!   a defined branch, never an error
//! - Stateless and re-entrant; safe under any host concurrency model

pub mod classifier;
pub mod policy;
pub mod variable;

pub use classifier::{Classification, Classifier};
pub use policy::{HeaderOnlyPolicy, LoadOnlyPolicy, Policy, PremiumOverridePolicy};
pub use variable::PriorityVariable;
