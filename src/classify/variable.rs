//! Per-request variable publication.
//!
//! The chosen label is exposed to downstream consumers as a named variable,
//! attached to the request as an extension for in-process readers and as a
//! header for the upstream hop and the client response. The variable is
//! declared non-cacheable: it is recomputed for every request and never
//! reused across requests.

use std::sync::Arc;

use crate::classify::classifier::Classification;

/// The published per-request priority variable.
///
/// Inserted into request extensions after classification; the routing
/// layer and any later middleware read it from there.
#[derive(Debug, Clone)]
pub struct PriorityVariable {
    /// Configured variable name, e.g. "my_priority_stream".
    pub name: Arc<str>,

    /// The classification result, flags included.
    pub classification: Classification,
}

impl PriorityVariable {
    /// Bind a classification to the configured variable name.
    pub fn new(name: Arc<str>, classification: Classification) -> Self {
        Self {
            name,
            classification,
        }
    }

    /// The published label text.
    pub fn label(&self) -> &str {
        &self.classification.label
    }
}
