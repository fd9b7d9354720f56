//! Upstream pool management.
//!
//! # Responsibilities
//! - Group upstream servers into named pools
//! - Apply the selection strategy to pick a server
//! - Hand out connection guards for tracking

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::UpstreamConfig;
use crate::upstream::round_robin::RoundRobin;
use crate::upstream::server::{UpstreamGuard, UpstreamServer};
use crate::upstream::Selector;

/// Manages upstream pools and server selection.
#[derive(Debug)]
pub struct PoolManager {
    /// Map of pool name -> (servers, selection strategy).
    pools: HashMap<String, (Vec<Arc<UpstreamServer>>, Box<dyn Selector>)>,
}

impl PoolManager {
    /// Create a new pool manager from configuration.
    ///
    /// Addresses were parse-checked by validation; anything unparseable
    /// here is skipped with a warning rather than aborting the process.
    pub fn new(configs: &[UpstreamConfig]) -> Self {
        let mut grouped: HashMap<String, Vec<Arc<UpstreamServer>>> = HashMap::new();

        for config in configs {
            match config.address.parse() {
                Ok(addr) => {
                    let server = Arc::new(UpstreamServer::new(addr, config.max_connections));
                    grouped.entry(config.pool.clone()).or_default().push(server);
                }
                Err(_) => {
                    tracing::warn!(
                        upstream = %config.name,
                        address = %config.address,
                        "invalid upstream address, skipping"
                    );
                }
            }
        }

        let mut pools = HashMap::new();
        for (name, servers) in grouped {
            let selector: Box<dyn Selector> = Box::new(RoundRobin::new());
            pools.insert(name, (servers, selector));
        }

        Self { pools }
    }

    /// Select a server from the given pool.
    /// Returns a guard that releases the connection slot on drop.
    pub fn get(&self, pool_name: &str) -> Option<UpstreamGuard> {
        let (servers, selector) = match self.pools.get(pool_name) {
            Some(pool) => pool,
            None => {
                tracing::debug!(pool = %pool_name, "pool not found");
                return None;
            }
        };

        match selector.next_server(servers) {
            Some(server) => server.try_create_guard(),
            None => {
                tracing::debug!(
                    pool = %pool_name,
                    server_count = servers.len(),
                    "no available server in pool"
                );
                None
            }
        }
    }

    /// Names of all configured pools.
    pub fn pool_names(&self) -> Vec<&str> {
        self.pools.keys().map(String::as_str).collect()
    }
}
