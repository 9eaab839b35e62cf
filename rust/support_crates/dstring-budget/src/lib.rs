//! Byte budgets for dstring storage.
//!
//! A [`Budget`] is a pool of bytes. Buffers attached to a budget charge every byte of
//! their capacity to it through an [`Allocation`], so a budget can cap the memory used
//! by a group of buffers or force allocation failures at an exact point.

use std::sync::Arc;

use counter::Counter;

pub mod counter;

/// A pool of bytes that allocations are taken from.
///
/// Cloning a `Budget` yields another handle to the same pool.
#[derive(Clone)]
pub struct Budget(Arc<Counter>);

impl Budget {
    /// Creates a new budget holding `amount` bytes.
    pub fn new(amount: usize) -> Budget {
        Budget(Arc::new(Counter::new(amount)))
    }

    /// Creates a budget that never runs out.
    pub fn unlimited() -> Budget {
        Budget::new(usize::MAX)
    }

    /// Returns the number of bytes still available.
    ///
    /// **Note**: when the budget is shared the value may be outdated by the time it
    /// is observed.
    pub fn remaining(&self) -> usize {
        self.0.read()
    }

    /// Takes `amount` bytes from the budget.
    ///
    /// The bytes are returned when the `Allocation` is dropped.
    pub fn allocate(&self, amount: usize) -> Result<Allocation, AllocationError> {
        if self.0.withdraw(amount) {
            Ok(Allocation {
                budget: self.0.clone(),
                amount,
            })
        } else {
            Err(AllocationError { requested: amount })
        }
    }
}

impl std::fmt::Debug for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Budget")
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Bytes taken from a [`Budget`].
pub struct Allocation {
    budget: Arc<Counter>,
    amount: usize,
}

impl Allocation {
    /// Currently allocated amount.
    pub fn amount(&self) -> usize {
        self.amount
    }

    /// Grows the allocation by `additional` bytes.
    ///
    /// On failure the allocation keeps its current amount.
    pub fn grow(&mut self, additional: usize) -> Result<(), AllocationError> {
        if additional == 0 {
            return Ok(());
        }
        if !self.budget.withdraw(additional) {
            return Err(AllocationError {
                requested: additional,
            });
        }
        self.amount += additional;
        Ok(())
    }

    /// Shrinks the allocation to `amount` bytes, returning the difference to the
    /// budget. Has no effect if `amount` is not smaller than the current amount.
    pub fn shrink_to(&mut self, amount: usize) {
        if amount < self.amount {
            self.budget.deposit(self.amount - amount);
            self.amount = amount;
        }
    }

    /// Grows or shrinks the allocation to exactly `amount` bytes.
    pub fn resize_to(&mut self, amount: usize) -> Result<(), AllocationError> {
        if amount > self.amount {
            self.grow(amount - self.amount)
        } else {
            self.shrink_to(amount);
            Ok(())
        }
    }

    /// Creates another allocation of the same amount from the same budget.
    pub fn try_clone(&self) -> Result<Allocation, AllocationError> {
        Budget(self.budget.clone()).allocate(self.amount)
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        if self.amount != 0 {
            self.budget.deposit(self.amount);
        }
    }
}

impl std::fmt::Debug for Allocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocation")
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

/// An error that occurs when a budget cannot cover a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationError {
    requested: usize,
}

impl AllocationError {
    /// The number of bytes that could not be allocated.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "budget exhausted: {} bytes requested", self.requested)
    }
}

impl std::error::Error for AllocationError {}
