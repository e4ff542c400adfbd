pub use crate::builder::{Cache, CacheBuilder, CacheConfig, CachePolicy};
pub use crate::concurrent::{
    ConcurrentCache, ConcurrentLfuCache, ConcurrentLruCache, ConcurrentMruCache,
};
pub use crate::ds::FrequencyBuckets;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::memoize::{Memoizer, make_lru_memoizer, make_memoizer, make_mru_memoizer};
pub use crate::policy::lfu::LfuCore;
pub use crate::policy::lru::LruCore;
pub use crate::policy::mru::MruCore;
pub use crate::traits::{CoreCache, LfuCacheTrait, SharedCache};
