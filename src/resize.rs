//! Growth policy shared by both collision strategies.
//!
//! A table grows before an insertion once `len * 1.5 >= capacity`, i.e. once
//! roughly two thirds of its capacity is live. Growth doubles the capacity;
//! nothing ever shrinks a table automatically.

use alloc::vec::Vec;

use crate::error::Error;
use crate::error::Result;

/// Capacity of a freshly created or cleared table.
pub const INITIAL_CAPACITY: usize = 10;

/// Factor by which capacity is multiplied on growth.
pub const GROWTH_FACTOR: usize = 2;

/// Reciprocal of the maximum load factor (1.5), as the exact ratio 3/2.
const LOAD_RECIPROCAL_NUM: u128 = 3;
const LOAD_RECIPROCAL_DEN: u128 = 2;

/// Returns `true` if a table holding `len` entries in `capacity` slots must
/// grow before accepting another entry.
#[inline(always)]
pub(crate) fn needs_growth(len: usize, capacity: usize) -> bool {
    len as u128 * LOAD_RECIPROCAL_NUM >= capacity as u128 * LOAD_RECIPROCAL_DEN
}

#[inline]
pub(crate) fn grown_capacity(capacity: usize) -> Result<usize> {
    capacity
        .checked_mul(GROWTH_FACTOR)
        .ok_or(Error::AllocationFailure)
}

/// Smallest capacity on the `INITIAL_CAPACITY * 2^n` ladder into which
/// `required` entries can be inserted one by one without triggering growth.
pub(crate) fn capacity_for(required: usize) -> Result<usize> {
    let mut capacity = INITIAL_CAPACITY;
    while needs_growth(required.saturating_sub(1), capacity) {
        capacity = grown_capacity(capacity)?;
    }
    Ok(capacity)
}

/// Allocates a backing store of exactly `capacity` elements.
///
/// The allocation happens before any element is produced, so a failure
/// leaves the caller's current store untouched.
pub(crate) fn try_alloc<T>(capacity: usize, fill: impl FnMut() -> T) -> Result<Vec<T>> {
    let mut store = Vec::new();
    store.try_reserve_exact(capacity)?;
    store.resize_with(capacity, fill);
    Ok(store)
}

/// Infallible counterpart of [`try_alloc`]; aborts on allocation failure
/// like any other `Vec` allocation.
pub(crate) fn alloc<T>(capacity: usize, fill: impl FnMut() -> T) -> Vec<T> {
    let mut store = Vec::with_capacity(capacity);
    store.resize_with(capacity, fill);
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_triggers_at_two_thirds() {
        assert!(!needs_growth(0, INITIAL_CAPACITY));
        assert!(!needs_growth(6, 10));
        assert!(needs_growth(7, 10));
        assert!(!needs_growth(13, 20));
        assert!(needs_growth(14, 20));
        assert!(needs_growth(1, 1));
    }

    #[test]
    fn growth_doubles() {
        assert_eq!(grown_capacity(10), Ok(20));
        assert_eq!(grown_capacity(usize::MAX), Err(Error::AllocationFailure));
    }

    #[test]
    fn capacity_for_stays_on_growth_ladder() {
        assert_eq!(capacity_for(0), Ok(INITIAL_CAPACITY));
        assert_eq!(capacity_for(7), Ok(10));
        assert_eq!(capacity_for(8), Ok(20));
        assert_eq!(capacity_for(100), Ok(160));
        assert_eq!(capacity_for(usize::MAX), Err(Error::AllocationFailure));
    }

    #[test]
    fn try_alloc_fills_exact_length() {
        let store = try_alloc(12, || 0u8).unwrap();
        assert_eq!(store.len(), 12);
        assert!(store.iter().all(|&b| b == 0));
    }

    #[test]
    fn try_alloc_reports_impossible_sizes() {
        assert_eq!(
            try_alloc::<u64>(usize::MAX, || 0).unwrap_err(),
            Error::AllocationFailure
        );
    }
}
