//! Separate chaining.
//!
//! Each bucket is a singly linked list of owned nodes. New entries are
//! pushed at the head of their chain, so insertion is O(1) once the
//! duplicate scan is done. Lookups degrade to O(n) when every key lands in
//! the same bucket; that is accepted behavior, not a bug.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;
use crate::error::Result;
use crate::resize;
use crate::strategy::Strategy;
use crate::strategy::bucket_index;

struct Node<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

/// Releases a chain node by node instead of through recursive `Box` drops,
/// which would overflow the stack on long chains.
fn release_chain<K, V>(mut link: Link<K, V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

/// A hash table resolving collisions with separate chaining.
///
/// Usually used through [`ChainedMap`](crate::ChainedMap); it can also be
/// driven directly with precomputed hashes.
///
/// # Examples
///
/// ```rust
/// use duo_hash::chained::ChainedTable;
/// use duo_hash::strategy::Strategy;
///
/// let mut table: ChainedTable<u32, &str> = ChainedTable::with_capacity(10);
/// let rehash = |k: &u32| i64::from(*k);
///
/// table.insert(1, 1, "one", |a, b| a == b, rehash).unwrap();
/// assert_eq!(table.find(1, |&k| k == 1), Some((&1, &"one")));
/// assert!(table.insert(1, 1, "uno", |a, b| a == b, rehash).is_err());
/// ```
pub struct ChainedTable<K, V> {
    buckets: Vec<Link<K, V>>,
    populated: usize,
}

impl<K, V> ChainedTable<K, V> {
    fn head(&self, hash: i64) -> Option<&Node<K, V>> {
        self.buckets[bucket_index(hash, self.buckets.len())].as_deref()
    }
}

impl<K, V> Strategy<K, V> for ChainedTable<K, V> {
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
            buckets: resize::alloc(capacity.max(1), || None),
            populated: 0,
        }
    }

    fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            buckets: resize::try_alloc(capacity.max(1), || None)?,
            populated: 0,
        })
    }

    #[inline]
    fn len(&self) -> usize {
        self.populated
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn find(&self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)> {
        let mut cursor = self.head(hash);
        while let Some(node) = cursor {
            if eq(&node.key) {
                return Some((&node.key, &node.value));
            }
            cursor = node.next.as_deref();
        }
        None
    }

    fn find_mut(&mut self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        let index = bucket_index(hash, self.buckets.len());
        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(node) = cursor {
            if eq(&node.key) {
                return Some((&node.key, &mut node.value));
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    fn insert(
        &mut self,
        hash: i64,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
        rehash: impl Fn(&K) -> i64,
    ) -> Result<()> {
        if self.find(hash, |stored| eq(stored, &key)).is_some() {
            return Err(Error::DuplicateKey);
        }

        self.grow_for_insert(rehash)?;

        let index = bucket_index(hash, self.buckets.len());
        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Node { key, value, next }));
        self.populated += 1;
        Ok(())
    }

    fn remove(&mut self, hash: i64, eq: impl Fn(&K) -> bool) -> Option<(K, V)> {
        let index = bucket_index(hash, self.buckets.len());
        let mut link = &mut self.buckets[index];
        while link.as_ref().is_some_and(|node| !eq(&node.key)) {
            link = &mut link.as_mut()?.next;
        }

        let Node { key, value, next } = *link.take()?;
        *link = next;
        self.populated -= 1;
        Some((key, value))
    }

    fn resize(&mut self, capacity: usize, rehash: impl Fn(&K) -> i64) -> Result<()> {
        if capacity == 0 || capacity < self.populated {
            return Err(Error::TableFull);
        }

        let buckets = resize::try_alloc(capacity, || None)?;
        let old = core::mem::replace(&mut self.buckets, buckets);

        // Relink the existing nodes; no node is reallocated.
        for mut link in old {
            while let Some(mut node) = link {
                link = node.next.take();
                let index = bucket_index(rehash(&node.key), capacity);
                node.next = self.buckets[index].take();
                self.buckets[index] = Some(node);
            }
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let buckets = resize::try_alloc(resize::INITIAL_CAPACITY, || None)?;
        let old = core::mem::replace(&mut self.buckets, buckets);
        self.populated = 0;
        old.into_iter().for_each(release_chain);
        Ok(())
    }

    fn iter<'a>(&'a self) -> Iter<'a, K, V>
    where
        K: 'a,
        V: 'a,
    {
        Iter {
            buckets: self.buckets.iter(),
            node: None,
            remaining: self.populated,
        }
    }

    fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            table: self,
            bucket_index: 0,
        }
    }

    #[cfg(any(test, feature = "stats"))]
    fn debug_stats(&self, _rehash: impl Fn(&K) -> i64) -> crate::stats::DebugStats {
        let mut occupied_slots = 0;
        let mut longest_probe = 0;
        for bucket in &self.buckets {
            let mut cursor = bucket.as_deref();
            let mut position = 0;
            while let Some(node) = cursor {
                longest_probe = longest_probe.max(position);
                position += 1;
                cursor = node.next.as_deref();
            }
            if position > 0 {
                occupied_slots += 1;
            }
        }

        crate::stats::DebugStats::new(
            self.populated,
            self.buckets.len(),
            occupied_slots,
            0,
            longest_probe,
            self.buckets.len() * core::mem::size_of::<Link<K, V>>(),
        )
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_histogram(&self, _rehash: impl Fn(&K) -> i64) -> crate::stats::ProbeHistogram {
        self.buckets
            .iter()
            .flat_map(|bucket| {
                core::iter::successors(bucket.as_deref(), |node| node.next.as_deref())
                    .enumerate()
                    .map(|(position, _)| position)
            })
            .collect()
    }
}

impl<K, V> Drop for ChainedTable<K, V> {
    fn drop(&mut self) {
        for bucket in self.buckets.iter_mut() {
            release_chain(bucket.take());
        }
    }
}

impl<K, V> Clone for ChainedTable<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut buckets = resize::alloc(self.buckets.len(), || None);
        let mut entries = Vec::new();
        for (bucket, source) in buckets.iter_mut().zip(&self.buckets) {
            entries.extend(
                core::iter::successors(source.as_deref(), |node| node.next.as_deref())
                    .map(|node| (node.key.clone(), node.value.clone())),
            );
            // Rebuild back to front so the clone keeps the chain order.
            while let Some((key, value)) = entries.pop() {
                let next = bucket.take();
                *bucket = Some(Box::new(Node { key, value, next }));
            }
        }

        Self {
            buckets,
            populated: self.populated,
        }
    }
}

impl<K, V> Debug for ChainedTable<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChainedTable")
            .field("populated", &self.populated)
            .field("capacity", &self.buckets.len())
            .field(
                "buckets",
                &self
                    .buckets
                    .iter()
                    .map(|bucket| {
                        core::iter::successors(bucket.as_deref(), |node| node.next.as_deref())
                            .map(|node| (&node.key, &node.value))
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// An iterator over the entries of a [`ChainedTable`].
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Link<K, V>>,
    node: Option<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.node {
                self.node = node.next.as_deref();
                self.remaining -= 1;
                return Some((&node.key, &node.value));
            }
            self.node = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// A draining iterator over the entries of a [`ChainedTable`].
///
/// Entries not consumed by the time the iterator is dropped are dropped with
/// it; the table keeps its capacity.
pub struct Drain<'a, K, V> {
    table: &'a mut ChainedTable<K, V>,
    bucket_index: usize,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        // Nodes are unlinked one at a time, so entries not yet yielded stay
        // in the table and `populated` always matches what it holds.
        loop {
            let bucket = self.table.buckets.get_mut(self.bucket_index)?;
            match bucket.take() {
                Some(node) => {
                    let Node { key, value, next } = *node;
                    *bucket = next;
                    self.table.populated -= 1;
                    return Some((key, value));
                }
                None => self.bucket_index += 1,
            }
        }
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
