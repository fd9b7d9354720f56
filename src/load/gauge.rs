//! Load snapshot providers.
//!
//! # Responsibilities
//! - Define the provider capability the classifier samples
//! - Track the process-wide in-flight request count
//! - Enforce the listener connection ceiling via RAII permits

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load::snapshot::LoadSnapshot;

/// Capability for sampling current load.
///
/// Each call is independent; the classifier expects no memoization and
/// samples exactly once per classification.
pub trait LoadSnapshotProvider: Send + Sync + fmt::Debug {
    /// Return a self-consistent (capacity, free) measurement.
    fn sample(&self) -> LoadSnapshot;
}

/// Connection accounting for the listener.
///
/// Capacity is fixed at startup; the in-flight count moves with request
/// lifetimes through [`ConnectionPermit`] guards.
#[derive(Debug)]
pub struct ConnectionGauge {
    capacity: usize,
    in_flight: AtomicUsize,
}

impl ConnectionGauge {
    /// Create a gauge with a fixed slot capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Total connection slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Requests currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Try to occupy a slot. Returns a guard that releases the slot on
    /// drop, or `None` when the gauge is saturated.
    pub fn try_acquire(self: &Arc<Self>) -> Option<ConnectionPermit> {
        let mut prev = self.in_flight.load(Ordering::Relaxed);
        loop {
            if prev >= self.capacity {
                return None;
            }
            match self.in_flight.compare_exchange_weak(
                prev,
                prev + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => prev = x,
            }
        }
        Some(ConnectionPermit {
            gauge: self.clone(),
        })
    }
}

impl LoadSnapshotProvider for ConnectionGauge {
    fn sample(&self) -> LoadSnapshot {
        // The count can race past capacity between load and permit drop;
        // free saturates at zero rather than underflowing.
        let used = self.in_flight.load(Ordering::Relaxed).min(self.capacity);
        LoadSnapshot::new(self.capacity as u64, (self.capacity - used) as u64)
    }
}

/// RAII guard for one occupied connection slot.
#[derive(Debug)]
pub struct ConnectionPermit {
    gauge: Arc<ConnectionGauge>,
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        self.gauge.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Provider returning a constant snapshot. Used for synthetic load in
/// tests and for probing policies outside a running listener.
#[derive(Debug, Clone, Copy)]
pub struct FixedSnapshot {
    snapshot: LoadSnapshot,
}

impl FixedSnapshot {
    /// Create a provider that always reports the given pair.
    pub fn new(capacity: u64, free: u64) -> Self {
        Self {
            snapshot: LoadSnapshot::new(capacity, free),
        }
    }
}

impl LoadSnapshotProvider for FixedSnapshot {
    fn sample(&self) -> LoadSnapshot {
        self.snapshot
    }
}
