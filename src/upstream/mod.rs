//! Upstream pool subsystem.
//!
//! # Data Flow
//! ```text
//! Route action names a pool
//!     → pool.rs (look up pool members)
//!     → round_robin.rs (rotate through servers)
//!     → server.rs (acquire connection guard)
//!     → Return upstream guard or none
//! ```
//!
//! # Design Decisions
//! - Selection is stateless beyond a rotation counter; guards track
//!   per-server connections
//! - Servers at their connection ceiling are skipped over

use std::sync::Arc;

pub mod pool;
pub mod round_robin;
pub mod server;

pub use pool::PoolManager;
pub use round_robin::RoundRobin;
pub use server::{UpstreamGuard, UpstreamServer};

/// Strategy for picking the next server in a pool.
pub trait Selector: Send + Sync + std::fmt::Debug {
    /// Return the next candidate server, or `None` if the pool is empty.
    fn next_server(&self, servers: &[Arc<UpstreamServer>]) -> Option<Arc<UpstreamServer>>;
}
