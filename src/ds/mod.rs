pub mod frequency_buckets;
pub(crate) mod intrusive_list;
pub(crate) mod slot_arena;

pub use frequency_buckets::{DEFAULT_BUCKET_PREALLOC, FrequencyBuckets};
pub(crate) use intrusive_list::IntrusiveList;
pub(crate) use slot_arena::SlotId;
