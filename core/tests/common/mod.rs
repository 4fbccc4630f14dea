//! Common test utilities and helpers for integration tests

use monoflow_common::FlowConfig;
use monoflow_core::FlowContext;

/// Create a test context with a given name, thread count and partition count
pub fn create_test_context(name: &str, threads: usize, partitions: usize) -> FlowContext {
    let config = FlowConfig::builder()
        .app_name(name)
        .num_threads(threads)
        .default_parallelism(partitions)
        .build()
        .unwrap();
    FlowContext::with_config(config).unwrap()
}

/// Deterministic `key,number` records over `num_keys` keys, including negatives
#[allow(dead_code)]
pub fn create_test_records(count: usize, num_keys: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let value = (i as i64 * 7919) % 1000 - 500;
            format!("key{},{}", i % num_keys, value)
        })
        .collect()
}

/// Assert that two vectors contain the same elements (order-independent)
#[allow(dead_code)]
pub fn assert_same_elements<T: Ord + Clone + std::fmt::Debug>(
    mut actual: Vec<T>,
    mut expected: Vec<T>,
) {
    actual.sort();
    expected.sort();
    assert_eq!(actual, expected);
}
