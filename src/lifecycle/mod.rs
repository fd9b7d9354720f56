//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger() → broadcast → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Startup is ordered: config first, then core, then the listener
//! - A bad configuration refuses startup; nothing serves traffic on it

pub mod shutdown;

pub use shutdown::Shutdown;
