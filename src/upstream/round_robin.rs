//! Round-robin selection strategy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::upstream::server::UpstreamServer;
use crate::upstream::Selector;

/// Round-robin selector.
/// Stores an internal counter to rotate through servers.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for RoundRobin {
    fn next_server(&self, servers: &[Arc<UpstreamServer>]) -> Option<Arc<UpstreamServer>> {
        if servers.is_empty() {
            return None;
        }

        let start = self.counter.fetch_add(1, Ordering::Relaxed);
        let len = servers.len();

        // Skip servers already at their connection ceiling.
        for i in 0..len {
            let candidate = &servers[(start + i) % len];
            if candidate.active() < candidate.max_connections {
                return Some(candidate.clone());
            }
        }
        None
    }
}
