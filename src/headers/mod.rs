//! Request header inspection subsystem.
//!
//! # Data Flow
//! ```text
//! Host request headers (contiguous map or linked segments)
//!     → lookup.rs (HeaderView: ordered chain of chunks)
//!     → find(name): case-insensitive scan, first match wins
//!     → Option<value> consumed by the classifier
//! ```
//!
//! # Design Decisions
//! - Chunks are traversed lazily; the view never flattens them into one buffer
//! - First matching entry is authoritative when duplicates exist
//! - Absence is a normal outcome, not an error

pub mod lookup;

pub use lookup::{HeaderEntry, HeaderView};
