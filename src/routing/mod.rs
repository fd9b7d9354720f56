//! Label routing subsystem.
//!
//! # Data Flow
//! ```text
//! Classification label
//!     → router.rs (label → RouteAction lookup)
//!     → Forward { pool } | Throttle { pool } | Reject { status }
//!     → Throttle consults throttle.rs (per-client token bucket)
//! ```
//!
//! # Design Decisions
//! - Routing table compiled at startup, immutable at runtime
//! - Deterministic: same label always resolves to the same action
//! - Unknown labels hit an explicit fallback rather than a silent default

pub mod router;
pub mod throttle;

pub use router::{LabelRouter, RouteAction};
pub use throttle::Throttle;
