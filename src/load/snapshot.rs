//! Point-in-time load measurement.

/// An immutable measurement of connection slot usage.
///
/// Sampled once per classification call and discarded afterwards; never
/// shared across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSnapshot {
    capacity: u64,
    free: u64,
}

impl LoadSnapshot {
    /// Create a snapshot from total and free slot counts.
    ///
    /// A provider reporting more free slots than capacity would push a
    /// negative active count downstream; that pair is clamped so the
    /// request classifies as unloaded, and the anomaly is logged.
    pub fn new(capacity: u64, free: u64) -> Self {
        if free > capacity {
            tracing::error!(
                capacity,
                free,
                "load snapshot reports more free slots than capacity, clamping active to zero"
            );
            return Self {
                capacity,
                free: capacity,
            };
        }
        Self { capacity, free }
    }

    /// Total connection slots.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Currently unused connection slots.
    pub fn free(&self) -> u64 {
        self.free
    }

    /// Connections currently in use. Non-negative by construction.
    pub fn active(&self) -> u64 {
        self.capacity - self.free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_derivation() {
        let snapshot = LoadSnapshot::new(100, 75);
        assert_eq!(snapshot.capacity(), 100);
        assert_eq!(snapshot.free(), 75);
        assert_eq!(snapshot.active(), 25);
    }

    #[test]
    fn test_fully_free() {
        assert_eq!(LoadSnapshot::new(200, 200).active(), 0);
    }

    #[test]
    fn test_fully_loaded() {
        assert_eq!(LoadSnapshot::new(200, 0).active(), 200);
    }

    #[test]
    fn test_malformed_pair_clamps_to_zero_active() {
        let snapshot = LoadSnapshot::new(50, 80);
        assert_eq!(snapshot.active(), 0);
        assert_eq!(snapshot.capacity(), 50);
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(LoadSnapshot::new(0, 0).active(), 0);
    }
}
