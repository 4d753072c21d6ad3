//! Open addressing with linear probing and tombstones.
//!
//! Slots move through `Empty -> Active -> Deleted -> Active -> ...`. A
//! `Deleted` slot never becomes `Empty` again except when the whole table is
//! rebuilt by a resize or a clear. Tombstones therefore accumulate between
//! resizes and lengthen probe sequences; this is accepted. The current count
//! is available from [`ProbeTable::tombstones`].

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;
use crate::error::Result;
use crate::resize;
use crate::strategy::Strategy;
use crate::strategy::bucket_index;

#[derive(Clone)]
enum Slot<K, V> {
    Empty,
    Deleted,
    Active(K, V),
}

/// Outcome of walking a probe sequence.
enum Probe {
    /// An `Active` slot holding a matching key.
    Found(usize),
    /// No match; the entry belongs here. This is the first tombstone on the
    /// sequence if there is one, else the `Empty` slot that ended the walk.
    Vacant(usize),
    /// The walk wrapped around without a match or any free slot.
    Full,
}

#[inline(always)]
fn next_index(index: usize, capacity: usize) -> usize {
    let next = index + 1;
    if next == capacity { 0 } else { next }
}

/// A hash table resolving collisions with linear probing.
///
/// Usually used through [`ProbingMap`](crate::ProbingMap); it can also be
/// driven directly with precomputed hashes.
///
/// # Examples
///
/// ```rust
/// use duo_hash::probing::ProbeTable;
/// use duo_hash::strategy::Strategy;
///
/// let mut table: ProbeTable<u32, &str> = ProbeTable::with_capacity(10);
/// let rehash = |k: &u32| i64::from(*k);
///
/// table.insert(3, 3, "three", |a, b| a == b, rehash).unwrap();
/// assert_eq!(table.remove(3, |&k| k == 3), Some((3, "three")));
/// assert!(table.find(3, |&k| k == 3).is_none());
/// ```
#[derive(Clone)]
pub struct ProbeTable<K, V> {
    slots: Vec<Slot<K, V>>,
    populated: usize,
    tombstones: usize,
}

impl<K, V> ProbeTable<K, V> {
    /// Number of `Deleted` slots awaiting reclamation by the next resize.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Walks the probe sequence for `hash`.
    ///
    /// Tombstones never match and never end the walk; the first one seen is
    /// remembered as the placement slot. Every `Active` slot up to the first
    /// `Empty` (or a full wrap) is checked, so a duplicate placed beyond a
    /// tombstone is still found.
    fn probe(&self, hash: i64, eq: impl Fn(&K) -> bool) -> Probe {
        let capacity = self.slots.len();
        let start = bucket_index(hash, capacity);
        let mut tombstone = None;
        let mut index = start;

        loop {
            match &self.slots[index] {
                Slot::Active(key, _) if eq(key) => return Probe::Found(index),
                Slot::Active(..) => {}
                Slot::Deleted => {
                    tombstone.get_or_insert(index);
                }
                Slot::Empty => return Probe::Vacant(tombstone.unwrap_or(index)),
            }

            index = next_index(index, capacity);
            if index == start {
                return tombstone.map_or(Probe::Full, Probe::Vacant);
            }
        }
    }

    fn find_index(&self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<usize> {
        match self.probe(hash, eq) {
            Probe::Found(index) => Some(index),
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// First `Empty` slot on the sequence for `hash`. Only valid on a table
    /// without tombstones that has at least one free slot, which holds while
    /// a resize is refilling a fresh array.
    fn first_empty(&self, hash: i64) -> usize {
        let capacity = self.slots.len();
        let mut index = bucket_index(hash, capacity);
        while !matches!(self.slots[index], Slot::Empty) {
            index = next_index(index, capacity);
        }
        index
    }

    /// Reports, for every live entry, the distance between the slot its key
    /// hashes to and the slot it occupies.
    #[cfg(any(test, feature = "stats"))]
    fn for_each_probe_distance(&self, rehash: impl Fn(&K) -> i64, mut report: impl FnMut(usize)) {
        let capacity = self.slots.len();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Active(key, _) = slot {
                let home = bucket_index(rehash(key), capacity);
                report((index + capacity - home) % capacity);
            }
        }
    }
}

impl<K, V> Strategy<K, V> for ProbeTable<K, V> {
    type Iter<'a>
        = Iter<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    type Drain<'a>
        = Drain<'a, K, V>
    where
        Self: 'a;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: resize::alloc(capacity.max(1), || Slot::Empty),
            populated: 0,
            tombstones: 0,
        }
    }

    fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            slots: resize::try_alloc(capacity.max(1), || Slot::Empty)?,
            populated: 0,
            tombstones: 0,
        })
    }

    #[inline]
    fn len(&self) -> usize {
        self.populated
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn find(&self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)> {
        match &self.slots[self.find_index(hash, eq)?] {
            Slot::Active(key, value) => Some((key, value)),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    fn find_mut(&mut self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        let index = self.find_index(hash, eq)?;
        match &mut self.slots[index] {
            Slot::Active(key, value) => Some((&*key, value)),
            Slot::Empty | Slot::Deleted => None,
        }
    }

    fn insert(
        &mut self,
        hash: i64,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
        rehash: impl Fn(&K) -> i64,
    ) -> Result<()> {
        let probe = self.probe(hash, |stored| eq(stored, &key));
        if let Probe::Found(_) = probe {
            return Err(Error::DuplicateKey);
        }

        let index = if self.grow_for_insert(rehash)? {
            self.first_empty(hash)
        } else {
            match probe {
                Probe::Vacant(index) => index,
                Probe::Found(_) | Probe::Full => return Err(Error::TableFull),
            }
        };

        if let Slot::Deleted = self.slots[index] {
            self.tombstones -= 1;
        }
        self.slots[index] = Slot::Active(key, value);
        self.populated += 1;
        Ok(())
    }

    fn remove(&mut self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(K, V)> {
        let index = self.find_index(hash, eq)?;
        match core::mem::replace(&mut self.slots[index], Slot::Deleted) {
            Slot::Active(key, value) => {
                self.populated -= 1;
                self.tombstones += 1;
                Some((key, value))
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    fn resize(&mut self, capacity: usize, rehash: impl Fn(&K) -> i64) -> Result<()> {
        if capacity == 0 || capacity < self.populated {
            return Err(Error::TableFull);
        }

        let slots = resize::try_alloc(capacity, || Slot::Empty)?;
        let old = core::mem::replace(&mut self.slots, slots);
        self.tombstones = 0;

        // Only live entries move; tombstones are dropped here.
        for slot in old {
            if let Slot::Active(key, value) = slot {
                let index = self.first_empty(rehash(&key));
                self.slots[index] = Slot::Active(key, value);
            }
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.slots = resize::try_alloc(resize::INITIAL_CAPACITY, || Slot::Empty)?;
        self.populated = 0;
        self.tombstones = 0;
        Ok(())
    }

    fn iter<'a>(&'a self) -> Iter<'a, K, V>
    where
        K: 'a,
        V: 'a,
    {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    #[cfg(any(test, feature = "stats"))]
    fn debug_stats(&self, rehash: impl Fn(&K) -> i64) -> crate::stats::DebugStats {
        let mut longest_probe = 0;
        self.for_each_probe_distance(rehash, |distance| {
            longest_probe = longest_probe.max(distance);
        });
        crate::stats::DebugStats::new(
            self.populated,
            self.slots.len(),
            self.populated,
            self.tombstones,
            longest_probe,
            self.slots.len() * core::mem::size_of::<Slot<K, V>>(),
        )
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_histogram(&self, rehash: impl Fn(&K) -> i64) -> crate::stats::ProbeHistogram {
        let mut histogram = crate::stats::ProbeHistogram::default();
        self.for_each_probe_distance(rehash, |distance| histogram.record(distance));
        histogram
    }
}

impl<K, V> Debug for ProbeTable<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        f.debug_struct("ProbeTable")
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        Slot::Empty => String::from(".."),
                        Slot::Deleted => String::from("xx"),
                        Slot::Active(key, value) => format!("{key:?}={value:?}"),
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// An iterator over the entries of a [`ProbeTable`].
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Active(key, value) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A draining iterator over the entries of a [`ProbeTable`].
///
/// Every slot the iterator passes, tombstones included, is reset to empty.
/// Entries not consumed by the time the iterator is dropped are dropped with
/// it; the table keeps its capacity.
pub struct Drain<'a, K, V> {
    table: &'a mut ProbeTable<K, V>,
    index: usize,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.table.slots.get_mut(self.index) {
            self.index += 1;
            match core::mem::replace(slot, Slot::Empty) {
                Slot::Active(key, value) => {
                    self.table.populated -= 1;
                    return Some((key, value));
                }
                Slot::Deleted => self.table.tombstones -= 1,
                Slot::Empty => {}
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        for _ in self {}
    }
}
