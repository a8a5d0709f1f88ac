//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key normalization and store expiry laws.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::cache::{derive_key, ResponseStore, SqlResponseStore};

// == Strategies ==
/// Generates request paths
fn path_strategy() -> impl Strategy<Value = String> {
    "/[a-zA-Z0-9_/]{0,32}".prop_map(|s| s)
}

/// Generates query parameter values, including percent-encoded ones
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9%_.-]{0,16}".prop_map(|s| s)
}

/// Generates parameter lists whose names are all distinct
fn distinct_params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z]{1,8}", value_strategy(), 0..8)
        .prop_map(|map| map.into_iter().collect())
}

fn as_refs(params: &[(String, String)]) -> Vec<(&str, &str)> {
    params
        .iter()
        .map(|(n, v)| (n.as_str(), v.as_str()))
        .collect()
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Distinct parameter names in any arrival order normalize to one key.
    #[test]
    fn prop_key_order_independent(
        path in path_strategy(),
        params in distinct_params_strategy().prop_shuffle(),
    ) {
        let mut sorted = params.clone();
        sorted.sort();

        prop_assert_eq!(
            derive_key(&path, &as_refs(&params)),
            derive_key(&path, &as_refs(&sorted))
        );
    }

    // A request without query parameters is keyed by its path alone.
    #[test]
    fn prop_key_without_params_is_path(path in path_strategy()) {
        prop_assert_eq!(derive_key(&path, &[]), path);
    }

    // Same-named parameters keep their relative arrival order.
    #[test]
    fn prop_key_duplicates_are_stable(
        path in path_strategy(),
        values in prop::collection::vec(value_strategy(), 1..6),
        other in value_strategy(),
    ) {
        let mut params: Vec<(String, String)> =
            values.iter().map(|v| ("dup".to_string(), v.clone())).collect();
        params.insert(0, ("zz".to_string(), other.clone()));

        let mut expected = path.clone();
        for v in &values {
            expected.push_str(&format!("|dup-{}", v));
        }
        expected.push_str(&format!("|zz-{}", other));

        prop_assert_eq!(derive_key(&path, &as_refs(&params)), expected);
    }
}

// Separate proptest block with fewer cases for database-backed laws
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // A put followed by a lookup inside the ttl window returns the stored body.
    #[test]
    fn prop_put_lookup_roundtrip(
        path in path_strategy(),
        body in "[ -~]{0,256}",
        ttl_secs in 1u64..100_000,
    ) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let found = block_on(async {
            let store = SqlResponseStore::connect_in_memory().await.unwrap();
            store.put_at(&path, &body, Duration::from_secs(ttl_secs), now).await.unwrap();
            store.lookup_at(&path, now).await.unwrap()
        });
        prop_assert_eq!(found, Some(body));
    }

    // After a sweep, every remaining row is live at the sweep time and
    // exactly the expired rows were deleted.
    #[test]
    fn prop_purge_partitions_rows(
        ttls in prop::collection::vec(1i64..10_000, 1..20),
        sweep_offset in 0i64..10_000,
    ) {
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let sweep_time = t0 + chrono::Duration::seconds(sweep_offset);
        let expected_removed = ttls.iter().filter(|&&ttl| ttl <= sweep_offset).count() as u64;

        let (removed, remaining) = block_on(async {
            let store = SqlResponseStore::connect_in_memory().await.unwrap();
            for (i, ttl) in ttls.iter().enumerate() {
                let ttl = Duration::from_secs(*ttl as u64);
                store.put_at(&format!("/k{}", i), "{}", ttl, t0).await.unwrap();
            }
            let removed = store.purge_expired_at(sweep_time).await.unwrap();
            let mut remaining = Vec::new();
            for i in 0..ttls.len() {
                remaining.extend(store.entries(&format!("/k{}", i)).await.unwrap());
            }
            (removed, remaining)
        });

        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(remaining.len() as u64, ttls.len() as u64 - expected_removed);
        for entry in remaining {
            prop_assert!(entry.is_live(sweep_time));
        }
    }
}
