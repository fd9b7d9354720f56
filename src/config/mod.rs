//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the policy never changes mid-flight
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any validation error is fatal at startup, never surfaced per-request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LabelConfig, ListenerConfig, ObservabilityConfig, PolicyConfig, PolicyMode, ProxyConfig,
    RouteActionKind, RouteConfig, ThrottleConfig, TimeoutConfig, UpstreamConfig, VariableConfig,
};
pub use validation::{validate_config, ValidationError};
