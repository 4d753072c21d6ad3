/// Failure kinds reported by table operations.
///
/// A missing key is not an error: lookups and removals report it as `None`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The backing store could not be allocated, or the requested capacity
    /// overflowed `usize`. The table is left exactly as it was.
    #[error("failed to allocate the table's backing store")]
    AllocationFailure,
    /// A key equal to the inserted one (per the table's policy) is already
    /// present. The existing entry is left untouched.
    #[error("an equal key is already present in the table")]
    DuplicateKey,
    /// A probe visited every slot without finding a place for the entry.
    ///
    /// The growth threshold keeps open-addressed tables below saturation, so
    /// this indicates a broken invariant rather than a normal outcome.
    #[error("probe sequence exhausted every slot in the table")]
    TableFull,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl From<alloc::collections::TryReserveError> for Error {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        Error::AllocationFailure
    }
}
