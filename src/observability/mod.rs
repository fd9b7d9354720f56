//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured trace records via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Decision-point records are a side channel; classification never
//!   blocks or fails on an unavailable sink
//! - Metrics are cheap (atomic increments)
//! - Request ID flows through all records

pub mod logging;
pub mod metrics;
