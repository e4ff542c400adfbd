//! Eviction policies.
//!
//! | Module  | Type      | Evicts                                   |
//! |---------|-----------|------------------------------------------|
//! | [`lfu`] | `LfuCore` | lowest access count, oldest among ties   |
//! | [`lru`] | `LruCore` | least recently used                      |
//! | [`mru`] | `MruCore` | most recently used                       |

pub mod lfu;
pub mod lru;
pub mod mru;
