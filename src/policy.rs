use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

/// Defines key identity for a table: how keys hash and when two keys are
/// the same key.
///
/// Implementations must be deterministic for the lifetime of a table, since
/// the table re-invokes [`hash`](HashPolicy::hash) for every entry when it
/// grows. [`equals`](HashPolicy::equals) must be an equivalence relation, and
/// equal keys must hash identically. Breaking either rule never causes memory
/// unsafety, but lookups may then miss entries that are present.
///
/// Hashes are signed; tables fold them into `[0, capacity)` without relying
/// on signed remainder, so negative outputs are fine.
pub trait HashPolicy<K: ?Sized> {
    /// Computes the hash of `key`.
    fn hash(&self, key: &K) -> i64;

    /// Returns `true` if `a` and `b` denote the same key.
    fn equals(&self, a: &K, b: &K) -> bool;
}

/// Identity-based policy for reference keys.
///
/// Two `&T` keys are equal only if they point at the same address, and the
/// hash is that address. Contents are never inspected.
///
/// # Examples
///
/// ```rust
/// use duo_hash::policy::HashPolicy;
/// use duo_hash::policy::IdentityPolicy;
///
/// let a = String::from("key");
/// let b = String::from("key");
///
/// assert!(IdentityPolicy.equals(&a.as_str(), &a.as_str()));
/// assert!(!IdentityPolicy.equals(&a.as_str(), &b.as_str()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityPolicy;

impl<T: ?Sized> HashPolicy<&T> for IdentityPolicy {
    #[inline]
    fn hash(&self, key: &&T) -> i64 {
        (*key as *const T).cast::<()>() as usize as i64
    }

    #[inline]
    fn equals(&self, a: &&T, b: &&T) -> bool {
        core::ptr::addr_eq(*a as *const T, *b as *const T)
    }
}

/// Computes the polynomial string hash used by [`StrPolicy`].
///
/// Each `char` contributes its code point times `31^i`, where `i` is its
/// position counted from the left. Arithmetic wraps.
///
/// ```rust
/// use duo_hash::policy::hash_str;
///
/// assert_eq!(hash_str(""), 0);
/// assert_eq!(hash_str("a"), 97);
/// assert_eq!(hash_str("ab"), 97 + 98 * 31);
/// ```
pub fn hash_str(s: &str) -> i64 {
    let mut hash: i64 = 0;
    let mut exp: i64 = 1;
    for c in s.chars() {
        hash = hash.wrapping_add((c as i64).wrapping_mul(exp));
        exp = exp.wrapping_mul(31);
    }
    hash
}

/// Content equality for strings, short-circuiting when both sides are the
/// same slice.
#[inline]
pub fn str_eq(a: &str, b: &str) -> bool {
    core::ptr::eq(a, b) || a == b
}

/// Content-based policy for string keys, built on [`hash_str`] and
/// [`str_eq`].
///
/// Distinct buffers holding the same text are the same key. The policy is
/// implemented for `&str`, `String`, `Box<str>` and `Option<&str>`; for the
/// latter `None` hashes to zero and equals only `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrPolicy;

impl HashPolicy<&str> for StrPolicy {
    #[inline]
    fn hash(&self, key: &&str) -> i64 {
        hash_str(key)
    }

    #[inline]
    fn equals(&self, a: &&str, b: &&str) -> bool {
        str_eq(a, b)
    }
}

impl HashPolicy<String> for StrPolicy {
    #[inline]
    fn hash(&self, key: &String) -> i64 {
        hash_str(key)
    }

    #[inline]
    fn equals(&self, a: &String, b: &String) -> bool {
        str_eq(a, b)
    }
}

impl HashPolicy<Box<str>> for StrPolicy {
    #[inline]
    fn hash(&self, key: &Box<str>) -> i64 {
        hash_str(key)
    }

    #[inline]
    fn equals(&self, a: &Box<str>, b: &Box<str>) -> bool {
        str_eq(a, b)
    }
}

impl HashPolicy<Option<&str>> for StrPolicy {
    #[inline]
    fn hash(&self, key: &Option<&str>) -> i64 {
        key.map_or(0, hash_str)
    }

    fn equals(&self, a: &Option<&str>, b: &Option<&str>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => str_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Adapts a [`BuildHasher`] and the key's own `Eq` into a policy.
///
/// The 64-bit hasher output is reinterpreted as a signed hash.
#[derive(Debug, Clone, Default)]
pub struct HasherPolicy<S> {
    hash_builder: S,
}

impl<S> HasherPolicy<S> {
    /// Wraps `hash_builder`.
    pub fn new(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns the wrapped hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, S> HashPolicy<K> for HasherPolicy<S>
where
    K: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> i64 {
        self.hash_builder.hash_one(key) as i64
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used by [`DefaultPolicy`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used by [`DefaultPolicy`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// Policy used when none is chosen explicitly: the key's `Hash` and `Eq`
/// implementations behind a randomly seeded hasher.
#[cfg(any(feature = "foldhash", feature = "std"))]
pub type DefaultPolicy = HasherPolicy<DefaultHashBuilder>;

/// A policy made of two caller-supplied functions.
///
/// # Examples
///
/// ```rust
/// use duo_hash::policy::FnPolicy;
/// use duo_hash::policy::HashPolicy;
///
/// let policy = FnPolicy::new(|k: &u32| i64::from(*k % 4), |a: &u32, b: &u32| a == b);
/// assert_eq!(policy.hash(&9), 1);
/// assert!(policy.equals(&3, &3));
/// ```
#[derive(Clone, Copy)]
pub struct FnPolicy<H, E> {
    hash: H,
    equals: E,
}

impl<H, E> FnPolicy<H, E> {
    /// Creates a policy from a hash function and an equality function.
    pub fn new(hash: H, equals: E) -> Self {
        Self { hash, equals }
    }
}

impl<H, E> Debug for FnPolicy<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

impl<K, H, E> HashPolicy<K> for FnPolicy<H, E>
where
    K: ?Sized,
    H: Fn(&K) -> i64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> i64 {
        (self.hash)(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}
