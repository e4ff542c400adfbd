// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behavior every policy must share through the CoreCache contract. These
// span the LFU, LRU and MRU cores plus the builder's dispatching Cache.

use memocache::builder::{Cache, CacheBuilder, CachePolicy};
use memocache::policy::lfu::LfuCore;
use memocache::policy::lru::LruCore;
use memocache::policy::mru::MruCore;
use memocache::traits::CoreCache;

const POLICIES: [CachePolicy; 3] = [
    CachePolicy::Lru,
    CachePolicy::Mru,
    CachePolicy::Lfu {
        refresh_threshold: 1_000,
    },
];

fn build(capacity: usize, policy: CachePolicy) -> Cache<u32, String> {
    CacheBuilder::new(capacity).build(policy)
}

// ==============================================
// Capacity-0 Behavior
// ==============================================
//
// Raw cores accept capacity 0 and never retain anything.

mod zero_capacity {
    use super::*;

    fn assert_never_retains<C: CoreCache<&'static str, i32>>(mut cache: C, name: &str) {
        assert_eq!(cache.capacity(), 0, "{name} should honor capacity=0");
        assert_eq!(cache.insert("key", 42), None);
        assert_eq!(cache.len(), 0, "{name} with capacity=0 should reject inserts");
        assert!(!cache.contains(&"key"));
        assert_eq!(cache.get(&"key"), None);
        assert_eq!(cache.remove(&"key"), None);
    }

    #[test]
    fn capacity_zero_is_honored_by_every_core() {
        assert_never_retains(LruCore::new(0), "LruCore");
        assert_never_retains(MruCore::new(0), "MruCore");
        assert_never_retains(
            LfuCore::new(0, std::num::NonZeroU64::MIN),
            "LfuCore",
        );
    }
}

// ==============================================
// Capacity Bound
// ==============================================

mod capacity_bound {
    use super::*;

    #[test]
    fn len_never_exceeds_capacity() {
        for policy in POLICIES {
            let mut cache = build(5, policy);
            for i in 0..100u32 {
                cache.insert(i % 17, i.to_string());
                if i % 3 == 0 {
                    cache.get(&(i % 7));
                }
                assert!(
                    cache.len() <= 5,
                    "{policy:?} grew to {} entries",
                    cache.len()
                );
            }
            assert_eq!(cache.len(), 5);
        }
    }

    #[test]
    fn capacity_one_holds_only_latest_key() {
        for policy in POLICIES {
            let mut cache = build(1, policy);
            cache.insert(1, "one".into());
            cache.insert(2, "two".into());

            assert!(!cache.contains(&1), "{policy:?}");
            assert!(cache.contains(&2), "{policy:?}");
        }
    }
}

// ==============================================
// Overwrite Semantics
// ==============================================
//
// Overwriting an existing key returns the old value, never changes len and
// never evicts another entry, even when the cache is full.

mod overwrite {
    use super::*;

    #[test]
    fn overwrite_at_capacity_keeps_all_keys() {
        for policy in POLICIES {
            let mut cache = build(3, policy);
            cache.insert(1, "a".into());
            cache.insert(2, "b".into());
            cache.insert(3, "c".into());

            assert_eq!(cache.insert(2, "B".into()), Some("b".to_string()));
            assert_eq!(cache.len(), 3, "{policy:?}");
            for key in 1..=3 {
                assert!(cache.contains(&key), "{policy:?} lost key {key}");
            }
            assert_eq!(cache.get(&2), Some(&"B".to_string()));
        }
    }
}

// ==============================================
// Contains Is Not An Access
// ==============================================

mod contains_no_access {
    use super::*;

    #[test]
    fn contains_never_changes_victim() {
        for policy in POLICIES {
            let mut queried = build(2, policy);
            let mut untouched = build(2, policy);
            for cache in [&mut queried, &mut untouched] {
                cache.insert(1, "one".into());
                cache.insert(2, "two".into());
            }

            for _ in 0..10 {
                assert!(queried.contains(&1));
                assert!(queried.contains(&2));
            }

            queried.insert(3, "three".into());
            untouched.insert(3, "three".into());
            for key in 1..=3 {
                assert_eq!(
                    queried.contains(&key),
                    untouched.contains(&key),
                    "{policy:?}: contains changed eviction of key {key}"
                );
            }
        }
    }
}

// ==============================================
// Remove
// ==============================================

mod remove {
    use super::*;

    #[test]
    fn remove_missing_is_noop_and_frees_room() {
        for policy in POLICIES {
            let mut cache = build(2, policy);
            assert_eq!(cache.remove(&9), None);

            cache.insert(1, "one".into());
            cache.insert(2, "two".into());
            assert_eq!(cache.remove(&1), Some("one".to_string()));
            assert_eq!(cache.len(), 1);

            // Room freed: no eviction needed for a new key.
            cache.insert(3, "three".into());
            assert!(cache.contains(&2), "{policy:?}");
            assert!(cache.contains(&3), "{policy:?}");
            assert!(!cache.contains(&1), "{policy:?}");
        }
    }
}
