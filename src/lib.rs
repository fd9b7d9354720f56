//! Priority Classification Proxy Library
//!
//! Classifies each inbound request against the current connection load and
//! an optional caller-supplied header, publishes the resulting label as a
//! per-request variable, and routes the request accordingly.

pub mod classify;
pub mod config;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod load;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use classify::{Classification, Classifier};
pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
