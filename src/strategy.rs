//! The seam between the [`HashMap`](crate::HashMap) façade and the
//! collision-resolution engines.
//!
//! Engines never see the [`HashPolicy`](crate::policy::HashPolicy) itself.
//! Every operation receives the precomputed hash of its key plus an equality
//! predicate, and anything that can relocate entries also receives a
//! `rehash` function used to recompute the hash of stored keys.

use crate::error::Result;
use crate::resize;

/// Folds a signed hash into `[0, capacity)`.
///
/// The hash is reinterpreted as an unsigned two's-complement value before
/// the remainder is taken, so negative hashes map into range and distinct
/// hashes stay distinct modulo `2^64`.
///
/// # Panics
///
/// Panics if `capacity` is zero. Tables never have zero capacity.
#[inline(always)]
pub fn bucket_index(hash: i64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    ((hash as u64) % capacity as u64) as usize
}

/// A collision-resolution engine storing `(K, V)` entries.
///
/// Implemented by [`ChainedTable`](crate::chained::ChainedTable) and
/// [`ProbeTable`](crate::probing::ProbeTable).
pub trait Strategy<K, V>: Sized {
    /// Iterator over shared references to the stored entries.
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Iterator that moves every entry out of the table.
    type Drain<'a>: Iterator<Item = (K, V)>
    where
        Self: 'a;

    /// Creates an empty engine with exactly `capacity` buckets. Aborts on
    /// allocation failure.
    fn with_capacity(capacity: usize) -> Self;

    /// Creates an empty engine with exactly `capacity` buckets.
    fn try_with_capacity(capacity: usize) -> Result<Self>;

    /// Number of live entries.
    fn len(&self) -> usize;

    /// Length of the backing array.
    fn capacity(&self) -> usize;

    /// Looks up the entry whose key satisfies `eq`.
    fn find(&self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)>;

    /// Looks up the entry whose key satisfies `eq`, with mutable access to
    /// its value.
    fn find_mut(&mut self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)>;

    /// Inserts a new entry, growing first if the load threshold is reached.
    ///
    /// `eq(stored, &key)` decides whether a stored key equals the new one;
    /// if any does, the call fails with
    /// [`Error::DuplicateKey`](crate::Error::DuplicateKey) and the table is
    /// not modified.
    fn insert(
        &mut self,
        hash: i64,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
        rehash: impl Fn(&K) -> i64,
    ) -> Result<()>;

    /// Removes and returns the entry whose key satisfies `eq`.
    fn remove(&mut self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(K, V)>;

    /// Moves every live entry into a new backing array of `capacity`
    /// buckets.
    ///
    /// On failure the table is left untouched. `capacity` must be at least
    /// `max(1, len)`; smaller values fail with
    /// [`Error::TableFull`](crate::Error::TableFull).
    fn resize(&mut self, capacity: usize, rehash: impl Fn(&K) -> i64) -> Result<()>;

    /// Drops every entry and reinstalls a backing array of
    /// [`INITIAL_CAPACITY`](crate::INITIAL_CAPACITY).
    ///
    /// The new array is allocated before anything is released; if that
    /// fails the table keeps its entries.
    fn clear(&mut self) -> Result<()>;

    /// Iterates over all entries in unspecified order.
    fn iter<'a>(&'a self) -> Self::Iter<'a>
    where
        K: 'a,
        V: 'a;

    /// Removes and yields all entries, keeping the current capacity.
    fn drain(&mut self) -> Self::Drain<'_>;

    /// Returns `true` if the table holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows the table if inserting one more entry would cross the load
    /// threshold. Returns whether a resize happened.
    fn grow_for_insert(&mut self, rehash: impl Fn(&K) -> i64) -> Result<bool> {
        if !resize::needs_growth(self.len(), self.capacity()) {
            return Ok(false);
        }

        let capacity = resize::grown_capacity(self.capacity())?;
        self.resize(capacity, rehash)?;
        Ok(true)
    }

    /// Snapshot of the table's occupancy.
    #[cfg(any(test, feature = "stats"))]
    fn debug_stats(&self, rehash: impl Fn(&K) -> i64) -> crate::stats::DebugStats;

    /// Histogram of probe distances (open addressing) or chain positions
    /// (chaining) over all live entries.
    #[cfg(any(test, feature = "stats"))]
    fn probe_histogram(&self, rehash: impl Fn(&K) -> i64) -> crate::stats::ProbeHistogram;
}
