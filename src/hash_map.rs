use core::fmt::Debug;
use core::marker::PhantomData;

use crate::chained::ChainedTable;
use crate::error::Error;
use crate::error::Result;
use crate::policy::FnPolicy;
use crate::policy::HashPolicy;
use crate::probing::ProbeTable;
use crate::resize;
use crate::strategy::Strategy;

/// A key-value table generic over its collision strategy `T` and its key
/// identity policy `P`.
///
/// Most code names one of the two aliases, [`ChainedMap`] or
/// [`ProbingMap`], rather than this type directly. Both strategies expose
/// the same operations and the same growth behavior: a table starts at
/// [`INITIAL_CAPACITY`](crate::INITIAL_CAPACITY) slots and doubles before
/// an insertion once `len * 1.5 >= capacity`.
///
/// Keys are unique. Inserting a key the policy considers equal to a stored
/// one fails with [`Error::DuplicateKey`] and leaves the stored entry as it
/// was.
///
/// # Examples
///
/// ```rust
/// use duo_hash::Error;
/// use duo_hash::ProbingMap;
///
/// let mut map: ProbingMap<&str, u32> = ProbingMap::new();
/// map.insert("apples", 3).unwrap();
/// map.insert("pears", 5).unwrap();
///
/// assert_eq!(map.get(&"apples"), Some(&3));
/// assert_eq!(map.insert("apples", 7), Err(Error::DuplicateKey));
/// assert_eq!(map.get(&"apples"), Some(&3));
/// assert_eq!(map.remove(&"pears"), Some(5));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, T, P> {
    table: T,
    policy: P,
    _marker: PhantomData<(K, V)>,
}

cfg_if::cfg_if! {
    if #[cfg(any(feature = "foldhash", feature = "std"))] {
        /// A [`HashMap`] resolving collisions with separate chaining.
        pub type ChainedMap<K, V, P = crate::policy::DefaultPolicy> =
            HashMap<K, V, ChainedTable<K, V>, P>;

        /// A [`HashMap`] resolving collisions with linear probing.
        pub type ProbingMap<K, V, P = crate::policy::DefaultPolicy> =
            HashMap<K, V, ProbeTable<K, V>, P>;
    } else {
        /// A [`HashMap`] resolving collisions with separate chaining.
        pub type ChainedMap<K, V, P> = HashMap<K, V, ChainedTable<K, V>, P>;

        /// A [`HashMap`] resolving collisions with linear probing.
        pub type ProbingMap<K, V, P> = HashMap<K, V, ProbeTable<K, V>, P>;
    }
}

impl<K, V, T, P> Debug for HashMap<K, V, T, P>
where
    K: Debug,
    V: Debug,
    T: Strategy<K, V>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, T, P> HashMap<K, V, T, P>
where
    T: Strategy<K, V>,
{
    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ChainedMap;
    /// let mut map: ChainedMap<_, _> = ChainedMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots (open addressing) or buckets (chaining)
    /// in the backing array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// # use duo_hash::INITIAL_CAPACITY;
    /// let map: ProbingMap<u64, u64> = ProbingMap::new();
    /// assert_eq!(map.capacity(), INITIAL_CAPACITY);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the policy deciding key identity for this map.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ChainedMap;
    /// let mut map: ChainedMap<_, _> = ChainedMap::new();
    /// map.insert(1, 10).unwrap();
    /// map.insert(2, 20).unwrap();
    ///
    /// let mut pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(1, 10), (2, 20)]);
    /// ```
    pub fn iter(&self) -> T::Iter<'_> {
        self.table.iter()
    }

    /// An iterator visiting all keys in arbitrary order.
    pub fn keys(&self) -> Keys<T::Iter<'_>> {
        Keys { inner: self.iter() }
    }

    /// An iterator visiting all values in arbitrary order.
    pub fn values(&self) -> Values<T::Iter<'_>> {
        Values { inner: self.iter() }
    }

    /// Removes every entry, yielding them in arbitrary order. The map keeps
    /// its capacity.
    ///
    /// Entries not consumed before the iterator is dropped are dropped with
    /// it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// let mut map: ProbingMap<_, _> = ProbingMap::new();
    /// map.insert("a", 1).unwrap();
    /// map.insert("b", 2).unwrap();
    ///
    /// let total: i32 = map.drain().map(|(_, v)| v).sum();
    /// assert_eq!(total, 3);
    /// assert!(map.is_empty());
    /// ```
    pub fn drain(&mut self) -> T::Drain<'_> {
        self.table.drain()
    }

    /// Removes every entry and returns the map to
    /// [`INITIAL_CAPACITY`](crate::INITIAL_CAPACITY).
    ///
    /// The replacement backing array is allocated first; if that fails the
    /// map keeps its entries and [`Error::AllocationFailure`] is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// # use duo_hash::INITIAL_CAPACITY;
    /// let mut map: ProbingMap<_, _> = ProbingMap::new();
    /// for i in 0..100 {
    ///     map.insert(i, i).unwrap();
    /// }
    /// map.clear().unwrap();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), INITIAL_CAPACITY);
    /// ```
    pub fn clear(&mut self) -> Result<()> {
        self.table.clear()
    }
}

impl<K, V, T, P> HashMap<K, V, T, P>
where
    T: Strategy<K, V>,
    P: HashPolicy<K>,
{
    /// Creates an empty map using `policy` to hash and compare keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duo_hash::ChainedMap;
    /// use duo_hash::policy::StrPolicy;
    ///
    /// let mut map: ChainedMap<String, u32, _> = ChainedMap::with_policy(StrPolicy);
    /// map.insert(String::from("one"), 1).unwrap();
    /// assert!(map.contains_key(&String::from("one")));
    /// ```
    pub fn with_policy(policy: P) -> Self {
        Self::with_capacity_and_policy(0, policy)
    }

    /// Fallible counterpart of [`with_policy`](Self::with_policy).
    pub fn try_with_policy(policy: P) -> Result<Self> {
        Self::try_with_capacity_and_policy(0, policy)
    }

    /// Creates an empty map able to take `capacity` insertions before it
    /// first grows.
    ///
    /// The backing array is sized to the smallest
    /// `INITIAL_CAPACITY * GROWTH_FACTOR^n` that satisfies the request, so a
    /// map sized here grows along the same ladder as one that started
    /// small.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// # use duo_hash::policy::DefaultPolicy;
    /// let map: ProbingMap<i32, String> =
    ///     ProbingMap::with_capacity_and_policy(100, DefaultPolicy::default());
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity_and_policy(capacity: usize, policy: P) -> Self {
        let capacity = resize::capacity_for(capacity).unwrap_or(usize::MAX);
        Self {
            table: T::with_capacity(capacity),
            policy,
            _marker: PhantomData,
        }
    }

    /// Fallible counterpart of
    /// [`with_capacity_and_policy`](Self::with_capacity_and_policy).
    pub fn try_with_capacity_and_policy(capacity: usize, policy: P) -> Result<Self> {
        Ok(Self {
            table: T::try_with_capacity(resize::capacity_for(capacity)?)?,
            policy,
            _marker: PhantomData,
        })
    }

    /// Inserts a new entry.
    ///
    /// If the map already holds an equal key, the call fails with
    /// [`Error::DuplicateKey`] and nothing changes; the stored value is not
    /// replaced. Growth happens before placement and may fail with
    /// [`Error::AllocationFailure`], in which case the map is unchanged and
    /// the rejected key and value are dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ChainedMap;
    /// # use duo_hash::Error;
    /// let mut map: ChainedMap<_, _> = ChainedMap::new();
    /// assert_eq!(map.insert(37, "a"), Ok(()));
    /// assert_eq!(map.insert(37, "b"), Err(Error::DuplicateKey));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let hash = self.policy.hash(&key);
        let policy = &self.policy;
        self.table.insert(
            hash,
            key,
            value,
            |stored, key| policy.equals(stored, key),
            |stored| policy.hash(stored),
        )
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// let mut map: ProbingMap<_, _> = ProbingMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key equal to `key` together with its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.policy.hash(key);
        self.table
            .find(hash, |stored| self.policy.equals(stored, key))
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ChainedMap;
    /// let mut map: ChainedMap<_, _> = ChainedMap::new();
    /// map.insert(1, 10).unwrap();
    /// if let Some(v) = map.get_mut(&1) {
    ///     *v += 5;
    /// }
    /// assert_eq!(map.get(&1), Some(&15));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.policy.hash(key);
        let policy = &self.policy;
        self.table
            .find_mut(hash, |stored| policy.equals(stored, key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// let mut map: ProbingMap<_, _> = ProbingMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value if it
    /// was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.policy.hash(key);
        let policy = &self.policy;
        self.table
            .remove(hash, |stored| policy.equals(stored, key))
    }

    /// Makes room for at least `additional` more entries without growth.
    ///
    /// If the current capacity is already sufficient nothing happens.
    /// Otherwise the map is rebuilt at the next capacity on the growth
    /// ladder that fits, which also discards open-addressing tombstones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ProbingMap;
    /// let mut map: ProbingMap<u32, u32> = ProbingMap::new();
    /// map.reserve(1000).unwrap();
    /// let capacity = map.capacity();
    /// for i in 0..1000 {
    ///     map.insert(i, i).unwrap();
    /// }
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or(Error::AllocationFailure)?;
        if required == 0 || !resize::needs_growth(required - 1, self.capacity()) {
            return Ok(());
        }

        let capacity = resize::capacity_for(required)?;
        let policy = &self.policy;
        self.table.resize(capacity, |stored| policy.hash(stored))
    }

    /// Rebuilds the map at the smallest capacity on the growth ladder that
    /// holds its entries, never larger than the current capacity.
    ///
    /// The rebuild always happens, so tombstones are discarded even when the
    /// capacity does not change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ChainedMap;
    /// # use duo_hash::INITIAL_CAPACITY;
    /// let mut map: ChainedMap<_, _> = ChainedMap::new();
    /// for i in 0..1000 {
    ///     map.insert(i, i).unwrap();
    /// }
    /// for i in 5..1000 {
    ///     map.remove(&i);
    /// }
    /// map.shrink_to_fit().unwrap();
    /// assert_eq!(map.capacity(), INITIAL_CAPACITY);
    /// assert_eq!(map.get(&4), Some(&4));
    /// ```
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let capacity = resize::capacity_for(self.len())?.min(self.capacity());
        let policy = &self.policy;
        self.table.resize(capacity, |stored| policy.hash(stored))
    }

    /// Snapshot of the backing table's occupancy.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::stats::DebugStats {
        self.table.debug_stats(|stored| self.policy.hash(stored))
    }

    /// Histogram of probe distances (open addressing) or chain positions
    /// (chaining) across all entries.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::stats::ProbeHistogram {
        self.table.probe_histogram(|stored| self.policy.hash(stored))
    }
}

impl<K, V, T, P> HashMap<K, V, T, P>
where
    T: Strategy<K, V>,
    P: HashPolicy<K> + Default,
{
    /// Creates an empty map with the default value of its policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use duo_hash::ChainedMap;
    /// let map: ChainedMap<i32, String> = ChainedMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_policy(P::default())
    }

    /// Creates an empty map able to take `capacity` insertions before it
    /// first grows, using the default value of its policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, P::default())
    }
}

impl<K, V, T, H, E> HashMap<K, V, T, FnPolicy<H, E>>
where
    T: Strategy<K, V>,
    H: Fn(&K) -> i64,
    E: Fn(&K, &K) -> bool,
{
    /// Creates an empty map from a hash function and an equality function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use duo_hash::ProbingMap;
    ///
    /// // Case-insensitive ASCII keys.
    /// let mut map = ProbingMap::with_fns(
    ///     |k: &String| k.to_ascii_lowercase().len() as i64,
    ///     |a: &String, b: &String| a.eq_ignore_ascii_case(b),
    /// );
    /// map.insert(String::from("Key"), 1).unwrap();
    /// assert_eq!(map.get(&String::from("KEY")), Some(&1));
    /// ```
    pub fn with_fns(hash: H, equals: E) -> Self {
        Self::with_policy(FnPolicy::new(hash, equals))
    }
}

impl<K, V, T, P> Default for HashMap<K, V, T, P>
where
    T: Strategy<K, V>,
    P: HashPolicy<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K, V, T, P> IntoIterator for &'a HashMap<K, V, T, P>
where
    K: 'a,
    V: 'a,
    T: Strategy<K, V> + 'a,
{
    type Item = (&'a K, &'a V);
    type IntoIter = T::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<I> {
    inner: I,
}

impl<'a, K: 'a, V: 'a, I> Iterator for Keys<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, I> ExactSizeIterator for Keys<I>
where
    I: ExactSizeIterator<Item = (&'a K, &'a V)>,
{
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<I> {
    inner: I,
}

impl<'a, K: 'a, V: 'a, I> Iterator for Values<I>
where
    I: Iterator<Item = (&'a K, &'a V)>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a, I> ExactSizeIterator for Values<I>
where
    I: ExactSizeIterator<Item = (&'a K, &'a V)>,
{
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::policy::HasherPolicy;
    use crate::policy::IdentityPolicy;
    use crate::policy::StrPolicy;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type Sip = HasherPolicy<SipHashBuilder>;

    fn sip() -> Sip {
        HasherPolicy::new(SipHashBuilder::default())
    }

    fn chained<K, V>() -> HashMap<K, V, ChainedTable<K, V>, Sip>
    where
        K: core::hash::Hash + Eq,
    {
        HashMap::with_policy(sip())
    }

    fn probing<K, V>() -> HashMap<K, V, ProbeTable<K, V>, Sip>
    where
        K: core::hash::Hash + Eq,
    {
        HashMap::with_policy(sip())
    }

    fn insert_get_remove<T: Strategy<i32, String>>(mut map: HashMap<i32, String, T, Sip>) {
        assert!(map.is_empty());
        assert_eq!(map.capacity(), resize::INITIAL_CAPACITY);

        assert_eq!(map.insert(1, "hello".to_string()), Ok(()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert_eq!(
            map.insert(1, "world".to_string()),
            Err(Error::DuplicateKey)
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));

        map.get_mut(&1).unwrap().push_str(" world");
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);

        assert!(map.contains_key(&1));
        assert_eq!(map.remove_entry(&1), Some((1, "hello world".to_string())));
        assert_eq!(map.remove(&1), None);
        assert!(!map.contains_key(&1));
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_get_remove_chained() {
        insert_get_remove(chained());
    }

    #[test]
    fn test_insert_get_remove_probing() {
        insert_get_remove(probing());
    }

    fn growth<T: Strategy<i32, i32>>(mut map: HashMap<i32, i32, T, Sip>) {
        for i in 0..6 {
            map.insert(i, i).unwrap();
        }
        assert_eq!(map.capacity(), 10);
        map.insert(6, 6).unwrap();
        assert_eq!(map.capacity(), 10);
        map.insert(7, 7).unwrap();
        assert_eq!(map.capacity(), 20);

        for i in 8..10_000 {
            map.insert(i, i * 3).unwrap();
        }
        assert_eq!(map.len(), 10_000);
        for i in 8..10_000 {
            assert_eq!(map.get(&i), Some(&(i * 3)), "{}", i);
        }
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_growth_chained() {
        growth(chained());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_growth_probing() {
        growth(probing());
    }

    #[test]
    fn test_with_capacity() {
        let map: HashMap<i32, String, ProbeTable<i32, String>, Sip> =
            HashMap::with_capacity_and_policy(100, sip());
        assert_eq!(map.capacity(), 160);

        let map: HashMap<i32, String, ChainedTable<i32, String>, Sip> =
            HashMap::try_with_capacity_and_policy(7, sip()).unwrap();
        assert_eq!(map.capacity(), 10);

        let err = HashMap::<i32, String, ProbeTable<i32, String>, Sip>::try_with_capacity_and_policy(
            usize::MAX,
            sip(),
        )
        .unwrap_err();
        assert_eq!(err, Error::AllocationFailure);
    }

    fn clear_resets<T: Strategy<i32, i32>>(mut map: HashMap<i32, i32, T, Sip>) {
        for i in 0..100 {
            map.insert(i, i).unwrap();
        }
        assert!(map.capacity() > resize::INITIAL_CAPACITY);

        map.clear().unwrap();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), resize::INITIAL_CAPACITY);
        assert_eq!(map.get(&50), None);

        map.insert(50, 1).unwrap();
        assert_eq!(map.get(&50), Some(&1));
    }

    #[test]
    fn test_clear_chained() {
        clear_resets(chained());
    }

    #[test]
    fn test_clear_probing() {
        clear_resets(probing());
    }

    #[test]
    fn test_reserve() {
        let mut map = probing();
        map.insert(0, 0).unwrap();
        map.reserve(99).unwrap();
        assert_eq!(map.capacity(), 160);

        let capacity = map.capacity();
        for i in 1..100 {
            map.insert(i, i).unwrap();
        }
        assert_eq!(map.capacity(), capacity);

        map.reserve(0).unwrap();
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.reserve(usize::MAX), Err(Error::AllocationFailure));
        assert_eq!(map.len(), 100);
    }

    #[test]
    fn test_shrink_to_fit_purges_tombstones() {
        let mut map = probing();
        for i in 0..6 {
            map.insert(i, i).unwrap();
        }
        for i in 0..3 {
            map.remove(&i);
        }
        assert_eq!(map.debug_stats().tombstones, 3);

        map.shrink_to_fit().unwrap();
        let stats = map.debug_stats();
        assert_eq!(stats.tombstones, 0);
        assert_eq!(stats.capacity, 10);
        for i in 3..6 {
            assert_eq!(map.get(&i), Some(&i));
        }
    }

    #[test]
    fn test_iterators() {
        let mut map = chained();
        map.insert(1, "one".to_string()).unwrap();
        map.insert(2, "two".to_string()).unwrap();
        map.insert(3, "three".to_string()).unwrap();

        let mut keys: Vec<_> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, [1, 2, 3]);

        let mut values: Vec<_> = map.values().cloned().collect();
        values.sort();
        assert_eq!(values, ["one", "three", "two"]);

        let mut count = 0;
        for (k, v) in &map {
            assert_eq!(map.get(k), Some(v));
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(map.iter().len(), 3);
        assert_eq!(map.keys().len(), 3);
        assert_eq!(map.values().len(), 3);
    }

    #[test]
    fn test_drain() {
        let mut map = probing();
        map.insert(1, "one".to_string()).unwrap();
        map.insert(2, "two".to_string()).unwrap();
        map.remove(&1);

        let drained: Vec<_> = map.drain().collect();
        assert_eq!(drained, [(2, "two".to_string())]);
        assert!(map.is_empty());
        assert_eq!(map.debug_stats().tombstones, 0);
    }

    #[test]
    fn test_string_policies() {
        let a = String::from("shared");
        let b = String::from("shared");

        let mut by_content: HashMap<&str, u8, ProbeTable<&str, u8>, StrPolicy> =
            HashMap::with_policy(StrPolicy);
        by_content.insert(a.as_str(), 1).unwrap();
        assert_eq!(
            by_content.insert(b.as_str(), 2),
            Err(Error::DuplicateKey)
        );
        assert_eq!(by_content.get(&b.as_str()), Some(&1));

        let mut by_identity: HashMap<&str, u8, ChainedTable<&str, u8>, IdentityPolicy> =
            HashMap::with_policy(IdentityPolicy);
        by_identity.insert(a.as_str(), 1).unwrap();
        by_identity.insert(b.as_str(), 2).unwrap();
        assert_eq!(by_identity.len(), 2);
        assert_eq!(by_identity.get(&a.as_str()), Some(&1));
        assert_eq!(by_identity.get(&b.as_str()), Some(&2));
    }

    #[test]
    fn test_with_fns_negative_hashes() {
        let mut map: HashMap<i64, i64, ProbeTable<i64, i64>, _> =
            HashMap::with_fns(|k: &i64| -k.abs() - 1, |a: &i64, b: &i64| a == b);
        for k in -50..50 {
            map.insert(k, k * 2).unwrap();
        }
        for k in -50..50 {
            assert_eq!(map.get(&k), Some(&(k * 2)));
        }
        assert_eq!(map.policy().hash(&3), -4);
    }

    #[test]
    fn test_default_trait() {
        let map: HashMap<i32, String, ChainedTable<i32, String>, Sip> = Default::default();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), resize::INITIAL_CAPACITY);
    }

    #[test]
    fn test_clone_and_debug() {
        let mut map = probing();
        map.insert(1, 2).unwrap();
        let mut copy = map.clone();
        *copy.get_mut(&1).unwrap() = 3;
        assert_eq!(map.get(&1), Some(&2));
        assert_eq!(copy.get(&1), Some(&3));
        assert_eq!(alloc::format!("{map:?}"), "{1: 2}");
    }

    #[test]
    fn test_histogram_counts_every_entry() {
        let mut map = chained();
        for i in 0..500 {
            map.insert(i, ()).unwrap();
        }
        assert_eq!(map.probe_histogram().total(), 500);
        assert_eq!(map.debug_stats().populated, 500);
    }
}
