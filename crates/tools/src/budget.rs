//! Per-agent search budget — a hard client-side throttle.
//!
//! Budget exhaustion is not an error: once the limit is reached, the
//! agent's searches return empty immediately without consulting cache or
//! tool.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

/// Counts the searches an agent has issued this session against a limit.
///
/// A limit of −1 means unlimited; 0 means no searches at all.
#[derive(Debug)]
pub struct SearchBudget {
    limit: i32,
    used: AtomicUsize,
}

impl SearchBudget {
    pub fn new(limit: i32) -> Self {
        Self {
            limit,
            used: AtomicUsize::new(0),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(-1)
    }

    /// Claim one search slot. Returns false once the limit is reached; the
    /// counter never exceeds the limit.
    pub fn try_acquire(&self) -> bool {
        if self.limit < 0 {
            self.used.fetch_add(1, Ordering::SeqCst);
            return true;
        }

        let limit = self.limit as usize;
        let acquired = self
            .used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                if n < limit { Some(n + 1) } else { None }
            })
            .is_ok();

        if !acquired {
            warn!(limit = self.limit, "Search budget exhausted, skipping search");
        }

        acquired
    }

    /// Searches issued so far.
    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    /// Whether the budget still has room.
    pub fn has_remaining(&self) -> bool {
        self.limit < 0 || self.used() < self.limit as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_exhausts() {
        let budget = SearchBudget::unlimited();
        for _ in 0..100 {
            assert!(budget.try_acquire());
        }
        assert_eq!(budget.used(), 100);
    }

    #[test]
    fn zero_budget_rejects_immediately() {
        let budget = SearchBudget::new(0);
        assert!(!budget.try_acquire());
        assert_eq!(budget.used(), 0);
    }

    #[test]
    fn counter_never_exceeds_limit() {
        let budget = SearchBudget::new(3);
        let mut granted = 0;
        for _ in 0..10 {
            if budget.try_acquire() {
                granted += 1;
            }
        }
        assert_eq!(granted, 3);
        assert_eq!(budget.used(), 3);
        assert!(!budget.has_remaining());
    }

    #[test]
    fn concurrent_acquires_stay_within_limit() {
        use std::sync::Arc;

        let budget = Arc::new(SearchBudget::new(5));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let budget = budget.clone();
            handles.push(std::thread::spawn(move || {
                let mut granted = 0usize;
                for _ in 0..10 {
                    if budget.try_acquire() {
                        granted += 1;
                    }
                }
                granted
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 5);
        assert_eq!(budget.used(), 5);
    }
}
