//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request-id/trace/timeout layers)
//!     → connection permit acquired (load signal)
//!     → classifier invoked with a HeaderView of the request
//!     → variable published (extension + header)
//!     → label routed: forward | throttle | reject
//!     → response returned with the label attached
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
