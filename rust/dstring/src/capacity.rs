//! Capacity planning: how many bytes of storage to request for a given amount of
//! content.
//!
//! Every non-zero capacity is a multiple of [`ALIGNMENT`] and never below the
//! buffer's floor.

/// Allocation granularity in bytes. Fixed at 8 on every platform so that capacities
/// are reproducible regardless of the native word size.
pub const ALIGNMENT: usize = 8;

/// Aligns a number up to the next multiple of the specified alignment.
///
/// Saturates at the largest aligned `usize` instead of overflowing.
///
/// # Examples
///
/// ```
/// use dstring::capacity::align_up;
///
/// assert_eq!(align_up(0, 8), 0);
/// assert_eq!(align_up(1, 8), 8);
/// assert_eq!(align_up(8, 8), 8);
/// assert_eq!(align_up(9, 8), 16);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if `alignment` is not a non-zero power of 2.
#[inline]
pub fn align_up(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    match n.checked_add(alignment - 1) {
        Some(n) => n & !(alignment - 1),
        None => align_down(usize::MAX, alignment),
    }
}

/// Aligns a number down to the previous multiple of the specified alignment.
///
/// # Panics
///
/// This function will panic in debug builds if `alignment` is not a non-zero power of 2.
#[inline]
pub fn align_down(n: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    n & !(alignment - 1)
}

#[inline]
pub fn is_aligned(n: usize, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    (n & (alignment - 1)) == 0
}

/// Returns the capacity to request for storing at least `requested_min` bytes
/// (terminator included) given the buffer's `floor`.
///
/// A request of `0` plans no storage at all. Otherwise the larger of the two inputs is
/// rounded up to [`ALIGNMENT`]. Requests within `ALIGNMENT` of `usize::MAX` cannot be
/// represented and yield a plan smaller than the request; callers treat that as an
/// allocation failure.
///
/// ```
/// use dstring::capacity::plan;
///
/// assert_eq!(plan(0, 64), 0);
/// assert_eq!(plan(6, 0), 8);
/// assert_eq!(plan(6, 20), 24);
/// assert_eq!(plan(33, 20), 40);
/// ```
#[inline]
pub fn plan(requested_min: usize, floor: usize) -> usize {
    if requested_min == 0 {
        return 0;
    }
    align_up(requested_min.max(floor), ALIGNMENT)
}
