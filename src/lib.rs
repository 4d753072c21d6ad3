#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod chained;

mod error;

/// The [`HashMap`] façade over either collision strategy.
///
/// This module provides a `HashMap` that owns a strategy and a
/// [`HashPolicy`](policy::HashPolicy) and turns keys into hashes before
/// handing them to the strategy.
pub mod hash_map;

/// Key identity: how keys hash and when two keys are the same key.
pub mod policy;

pub mod probing;

mod resize;

#[cfg(any(test, feature = "stats"))]
pub mod stats;

pub mod strategy;

pub use error::Error;
pub use error::Result;
pub use hash_map::ChainedMap;
pub use hash_map::HashMap;
pub use hash_map::ProbingMap;
pub use policy::HashPolicy;
pub use resize::GROWTH_FACTOR;
pub use resize::INITIAL_CAPACITY;
