//! Load measurement subsystem.
//!
//! # Data Flow
//! ```text
//! Listener accepts request
//!     → gauge.rs (ConnectionGauge: permit acquired, in-flight count +1)
//!     → classifier samples LoadSnapshotProvider once per request
//!     → snapshot.rs (LoadSnapshot: capacity, free, active)
//!     → permit dropped when the request completes (in-flight count -1)
//! ```
//!
//! # Design Decisions
//! - The classifier receives a provider capability, never a global read
//! - Snapshots are taken fresh per classification and never cached
//! - A malformed snapshot (free > capacity) clamps to zero active

pub mod gauge;
pub mod snapshot;

pub use gauge::{ConnectionGauge, ConnectionPermit, FixedSnapshot, LoadSnapshotProvider};
pub use snapshot::LoadSnapshot;
