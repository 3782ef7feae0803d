//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check freshness, expiry and overwrite behaviour of the store.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys shaped like upstream resource names
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,24}".prop_map(|s| s)
}

fn valid_value_strategy() -> impl Strategy<Value = u32> {
    any::<u32>()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

/// Runs `f` on a current-thread runtime with a paused clock so tests can move time by hand.
fn with_paused_clock<F: std::future::Future<Output = ()>>(f: F) {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value and reading it back before expiry returns the same value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let store = CacheStore::new(TEST_TTL);

        store.set(key.clone(), value);

        prop_assert_eq!(store.get(&key), Some(value), "Round-trip value mismatch");
    }

    // A second set on the same key always wins over the first.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let store = CacheStore::new(TEST_TTL);

        store.set(key.clone(), value1);
        store.set(key.clone(), value2);

        prop_assert_eq!(store.get(&key), Some(value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // Any interleaving of sets and gets behaves like a plain map while entries are live.
    #[test]
    fn prop_matches_model_map(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let store = CacheStore::new(TEST_TTL);
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key).copied());
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // A value is visible strictly before `ttl` has elapsed and absent from `ttl` on.
    #[test]
    fn prop_ttl_freshness(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        ttl_ms in 1u64..10_000,
        elapsed_ms in 0u64..20_000
    ) {
        let mut observed = None;
        with_paused_clock(async {
            let store = CacheStore::new(Duration::from_millis(ttl_ms));
            store.set(key.clone(), value);
            tokio::time::advance(Duration::from_millis(elapsed_ms)).await;
            observed = Some(store.get(&key));
        });

        let expected = if elapsed_ms < ttl_ms { Some(value) } else { None };
        prop_assert_eq!(observed, Some(expected));
    }

    // With a zero TTL nothing is ever served back.
    #[test]
    fn prop_zero_ttl_never_hits(key in valid_key_strategy(), value in valid_value_strategy()) {
        let store = CacheStore::new(Duration::ZERO);

        store.set(key.clone(), value);

        prop_assert_eq!(store.get(&key), None);
    }
}
