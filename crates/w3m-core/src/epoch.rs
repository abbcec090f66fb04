//! Request epochs for discarding stale responses.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Monotonic per-mode request counter.
///
/// Every request takes a ticket; only the holder of the latest ticket may
/// publish. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct EpochCounter {
    latest: Arc<AtomicU64>,
}

impl EpochCounter {
    /// Create a counter at epoch 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier tickets
    pub fn issue(&self) -> EpochTicket {
        let value = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        EpochTicket {
            latest: Arc::clone(&self.latest),
            value,
        }
    }

    /// Supersede every outstanding ticket without starting a request
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Latest issued epoch
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Ticket held by one in-flight request
#[derive(Debug, Clone)]
pub struct EpochTicket {
    latest: Arc<AtomicU64>,
    value: u64,
}

impl EpochTicket {
    /// Epoch of this ticket
    pub fn value(&self) -> u64 {
        self.value
    }

    /// True while no newer ticket was issued and the counter was not invalidated
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let counter = EpochCounter::new();
        let first = counter.issue();
        assert!(first.is_current());

        let second = counter.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.value() > first.value());
    }

    #[test]
    fn test_invalidate() {
        let counter = EpochCounter::new();
        let ticket = counter.issue();
        counter.invalidate();
        assert!(!ticket.is_current());
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_clones_share_counter() {
        let counter = EpochCounter::new();
        let ticket = counter.issue();
        counter.clone().issue();
        assert!(!ticket.is_current());
    }
}
