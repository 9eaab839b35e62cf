//! Owned byte store backing a [`DString`](crate::DString), and the byte-splice
//! primitives used by every structural mutation.

use dstring_budget::{Allocation, Budget};
use dstring_common::{Error, Result};

/// An exclusively owned, fully initialized block of bytes.
///
/// The logical capacity is the length of the inner vector; every byte up to it is
/// initialized, so views never observe uninitialized memory. Capacity `0` means no
/// storage is held. When a budget is attached, the whole capacity is charged to it.
pub(crate) struct Storage {
    data: Vec<u8>,
    allocation: Option<Allocation>,
}

impl Storage {
    /// Creates an empty store with no capacity allocation.
    pub fn new() -> Storage {
        Storage {
            data: Vec::new(),
            allocation: None,
        }
    }

    /// Creates an empty store whose capacity will be charged to `budget`.
    pub fn with_budget(budget: &Budget) -> Storage {
        Storage {
            data: Vec::new(),
            // A zero-byte allocation always succeeds.
            allocation: budget.allocate(0).ok(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Reallocates the store to exactly `target` bytes.
    ///
    /// Existing bytes are preserved up to `min(capacity, target)`; new bytes are
    /// zeroed. A target of `0` releases the storage and always succeeds. On failure
    /// the store (and the budget) are left exactly as they were.
    pub fn resize(&mut self, target: usize) -> Result<()> {
        let capacity = self.capacity();
        if target == capacity {
            return Ok(());
        }

        if target == 0 {
            self.data = Vec::new();
            self.charge(0)?;
        } else if target > capacity {
            self.charge(target)?;
            if let Err(e) = self.data.try_reserve_exact(target - capacity) {
                self.discharge(capacity);
                log::debug!("failed to grow storage from {capacity} to {target} bytes: {e}");
                return Err(Error::allocation_failure(target));
            }
            self.data.resize(target, 0);
        } else {
            let mut data = Vec::new();
            data.try_reserve_exact(target)
                .map_err(|_| Error::allocation_failure(target))?;
            data.extend_from_slice(&self.data[..target]);
            self.data = data;
            self.discharge(target);
        }

        log::trace!("storage resized from {capacity} to {target} bytes");
        Ok(())
    }

    /// Creates a copy of this store with the same capacity, charged to the same budget.
    pub fn try_clone(&self) -> Result<Storage> {
        let allocation = self
            .allocation
            .as_ref()
            .map(Allocation::try_clone)
            .transpose()?;
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())?;
        data.extend_from_slice(&self.data);
        Ok(Storage { data, allocation })
    }

    /// Charges the budget for a total capacity of `amount` bytes. A refusal reports
    /// the whole capacity, not just the missing difference.
    fn charge(&mut self, amount: usize) -> Result<()> {
        if let Some(allocation) = self.allocation.as_mut() {
            allocation
                .resize_to(amount)
                .map_err(|_| Error::allocation_failure(amount))?;
        }
        Ok(())
    }

    fn discharge(&mut self, amount: usize) {
        if let Some(allocation) = self.allocation.as_mut() {
            allocation.shrink_to(amount);
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("cap", &self.capacity())
            .field("budgeted", &self.allocation.is_some())
            .finish_non_exhaustive()
    }
}

/// Opens a gap of `gap` bytes at `at` within the content `buf[..len]`, moving
/// `buf[at..len]` right. The gap keeps whatever bytes were there before.
///
/// `buf` must hold at least `len + gap` bytes and `at <= len`.
#[inline]
pub(crate) fn open_gap(buf: &mut [u8], len: usize, at: usize, gap: usize) {
    debug_assert!(at <= len && len + gap <= buf.len());
    if at < len && gap != 0 {
        buf.copy_within(at..len, at + gap);
    }
}

/// Closes a gap of `count` bytes at `at` within the content `buf[..len]`, moving
/// `buf[at + count..len]` left.
#[inline]
pub(crate) fn close_gap(buf: &mut [u8], len: usize, at: usize, count: usize) {
    debug_assert!(at + count <= len && len <= buf.len());
    if at + count < len && count != 0 {
        buf.copy_within(at + count..len, at);
    }
}

/// Writes `incoming` at `at` within the content `buf[..len]`, shifting the bytes at
/// and after `at` to the right. The length and terminator are left to the caller.
#[inline]
pub(crate) fn splice(buf: &mut [u8], len: usize, at: usize, incoming: &[u8]) {
    open_gap(buf, len, at, incoming.len());
    buf[at..at + incoming.len()].copy_from_slice(incoming);
}

#[cfg(test)]
mod tests {
    use dstring_common::ErrorKind;

    use super::*;

    #[test]
    fn test_storage_new() {
        let storage = Storage::new();
        assert_eq!(storage.capacity(), 0);
        assert!(storage.bytes().is_empty());
    }

    #[test]
    fn test_storage_grow_preserves_and_zeroes() {
        let mut storage = Storage::new();
        storage.resize(8).unwrap();
        storage.bytes_mut()[..3].copy_from_slice(b"abc");
        storage.resize(32).unwrap();
        assert_eq!(storage.capacity(), 32);
        assert_eq!(&storage.bytes()[..3], b"abc");
        assert!(storage.bytes()[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_storage_shrink_keeps_prefix() {
        let mut storage = Storage::new();
        storage.resize(16).unwrap();
        storage.bytes_mut().copy_from_slice(b"0123456789abcdef");
        storage.resize(8).unwrap();
        assert_eq!(storage.bytes(), b"01234567");
    }

    #[test]
    fn test_storage_release() {
        let mut storage = Storage::new();
        storage.resize(24).unwrap();
        storage.resize(0).unwrap();
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn test_storage_budget_accounting() {
        let budget = Budget::new(64);
        let mut storage = Storage::with_budget(&budget);
        storage.resize(40).unwrap();
        assert_eq!(budget.remaining(), 24);
        storage.resize(16).unwrap();
        assert_eq!(budget.remaining(), 48);
        storage.resize(0).unwrap();
        assert_eq!(budget.remaining(), 64);
    }

    #[test]
    fn test_storage_budget_failure_leaves_store_unchanged() {
        let budget = Budget::new(16);
        let mut storage = Storage::with_budget(&budget);
        storage.resize(16).unwrap();
        storage.bytes_mut()[..2].copy_from_slice(b"hi");

        let err = storage.resize(24).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::AllocationFailure { requested: 24 }
        ));
        assert_eq!(storage.capacity(), 16);
        assert_eq!(&storage.bytes()[..2], b"hi");
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_storage_drop_returns_budget() {
        let budget = Budget::new(32);
        {
            let mut storage = Storage::with_budget(&budget);
            storage.resize(32).unwrap();
            assert_eq!(budget.remaining(), 0);
        }
        assert_eq!(budget.remaining(), 32);
    }

    #[test]
    fn test_storage_try_clone() {
        let budget = Budget::new(40);
        let mut storage = Storage::with_budget(&budget);
        storage.resize(16).unwrap();
        storage.bytes_mut()[..4].copy_from_slice(b"data");

        let copy = storage.try_clone().unwrap();
        assert_eq!(copy.bytes(), storage.bytes());
        assert_eq!(budget.remaining(), 8);
        assert!(copy.try_clone().is_err());
    }

    #[test]
    fn test_splice_in_middle() {
        let mut buf = *b"held\0\0\0\0";
        splice(&mut buf, 4, 2, b"ll");
        assert_eq!(&buf[..6], b"hellld");
    }

    #[test]
    fn test_splice_at_end_and_start() {
        let mut buf = [0u8; 8];
        buf[..3].copy_from_slice(b"abc");
        splice(&mut buf, 3, 3, b"de");
        assert_eq!(&buf[..5], b"abcde");
        splice(&mut buf, 5, 0, b"_");
        assert_eq!(&buf[..6], b"_abcde");
    }

    #[test]
    fn test_close_gap() {
        let mut buf = *b"hello world\0";
        close_gap(&mut buf, 11, 5, 6);
        assert_eq!(&buf[..5], b"hello");

        let mut buf = *b"hello world\0";
        close_gap(&mut buf, 11, 0, 6);
        assert_eq!(&buf[..5], b"world");
    }

    #[test]
    fn test_open_then_close_gap_restores() {
        let mut buf = [0u8; 16];
        buf[..6].copy_from_slice(b"abcdef");
        open_gap(&mut buf, 6, 2, 4);
        close_gap(&mut buf, 10, 2, 4);
        assert_eq!(&buf[..6], b"abcdef");
    }
}
