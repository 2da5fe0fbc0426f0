//! Generation tracking for listing requests.
//!
//! Each reload of a table takes a ticket before it issues its request. When
//! a response arrives, only the holder of the most recent ticket may apply
//! it; anything older was superseded by a later filter change.

use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a request was issued at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new logical request, superseding every earlier ticket.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `value` through only if `ticket` is still the latest.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        if self.is_latest(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                generation = ticket.0,
                latest = self.latest.load(Ordering::SeqCst),
                "discarding stale response"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_tickets_increase() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert_eq!(a.generation() + 1, b.generation());
    }

    #[test]
    fn test_only_latest_is_accepted() {
        let seq = RequestSequencer::new();
        let older = seq.issue();
        let newer = seq.issue();

        // Newer response lands first, then the stale one
        assert_eq!(seq.accept(newer, "page for last7days"), Some("page for last7days"));
        assert_eq!(seq.accept(older, "page for today"), None);
    }

    #[test]
    fn test_latest_after_concurrent_issue() {
        let seq = Arc::new(RequestSequencer::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || (0..100).map(|_| seq.issue()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<RequestTicket> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();

        assert_eq!(all.len(), 800);
        let last = *all.last().unwrap();
        assert!(seq.is_latest(last));
        assert_eq!(all.iter().filter(|t| seq.is_latest(**t)).count(), 1);
    }
}
