use std::sync::atomic::{AtomicUsize, Ordering};

/// A byte counter that can be withdrawn from (only while enough remains) and
/// deposited into. The value never goes negative.
pub struct Counter(AtomicUsize);

impl Counter {
    pub fn new(amount: usize) -> Counter {
        Counter(AtomicUsize::new(amount))
    }

    /// Withdraws `amount` if at least that much remains.
    ///
    /// Returns `true` on success; on failure the counter is left unchanged.
    pub fn withdraw(&self, amount: usize) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |current| {
                current.checked_sub(amount)
            })
            .is_ok()
    }

    /// Returns `amount` to the counter, saturating at `usize::MAX`.
    pub fn deposit(&self, amount: usize) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |current| {
                Some(current.saturating_add(amount))
            });
    }

    pub fn read(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Counter").field(&self.read()).finish()
    }
}
