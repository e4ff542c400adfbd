//! memocache: bounded in-memory caches with pluggable eviction and a
//! memoizing decorator.
//!
//! The LFU policy adds forced refresh: every `refresh_threshold`-th read of a
//! key reports a miss, so a [`Memoizer`](memoize::Memoizer) recomputes hot
//! values instead of serving them forever.
//!
//! ```
//! use memocache::prelude::*;
//!
//! let double = make_memoizer(128, 10, |n: &u64| Ok::<_, String>(n * 2)).unwrap();
//! assert_eq!(double.call(21), Ok(42));
//! assert!(double.cache().contains(&21));
//! ```
//!
//! Logging goes through `tracing`; the crate never installs a subscriber.

pub mod builder;
pub mod concurrent;
pub mod ds;
pub mod error;
pub mod memoize;
pub mod policy;
pub mod prelude;
pub mod traits;
