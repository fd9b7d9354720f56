//! Upstream server abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track active connections
//! - Enforce per-server connection limits

use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use url::Url;

/// A single upstream server.
#[derive(Debug)]
pub struct UpstreamServer {
    /// The address of the server.
    pub addr: SocketAddr,

    /// Pre-calculated base URL.
    pub base_url: Url,

    /// Maximum concurrent connections allowed.
    pub max_connections: usize,

    /// Number of currently active connections.
    active_connections: AtomicUsize,
}

impl UpstreamServer {
    /// Create a new upstream server.
    pub fn new(addr: SocketAddr, max_connections: usize) -> Self {
        let base_url = Url::parse(&format!("http://{}", addr)).expect("socket address forms a URL");
        Self {
            addr,
            base_url,
            max_connections,
            active_connections: AtomicUsize::new(0),
        }
    }

    /// Current number of active connections.
    pub fn active(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Try to create a guard that occupies one connection slot.
    /// Returns `None` when the server is at its ceiling.
    pub fn try_create_guard(self: &Arc<Self>) -> Option<UpstreamGuard> {
        let mut prev = self.active_connections.load(Ordering::Relaxed);
        loop {
            if prev >= self.max_connections {
                return None;
            }
            match self.active_connections.compare_exchange_weak(
                prev,
                prev + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => prev = x,
            }
        }
        Some(UpstreamGuard {
            server: self.clone(),
        })
    }
}

/// A RAII guard that manages the active connection count.
#[derive(Debug)]
pub struct UpstreamGuard {
    server: Arc<UpstreamServer>,
}

impl Deref for UpstreamGuard {
    type Target = UpstreamServer;

    fn deref(&self) -> &Self::Target {
        &self.server
    }
}

impl Drop for UpstreamGuard {
    fn drop(&mut self) {
        self.server.active_connections.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_tracks_connections() {
        let server = Arc::new(UpstreamServer::new("127.0.0.1:3000".parse().unwrap(), 2));
        let g1 = server.try_create_guard().unwrap();
        let _g2 = server.try_create_guard().unwrap();
        assert_eq!(server.active(), 2);
        assert!(server.try_create_guard().is_none());

        drop(g1);
        assert_eq!(server.active(), 1);
        assert!(server.try_create_guard().is_some());
    }
}
