//! Defines partitioners for distributing data in a shuffle.

use std::fmt::Debug;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Decides which reduce partition a key is sent to.
pub trait Partitioner<K>: Send + Sync + Debug {
    fn num_partitions(&self) -> u32;

    /// Must return a value in `0..num_partitions()`, and the same value for equal keys.
    fn get_partition(&self, key: &K) -> u32;
}

/// A partitioner that uses the hash of the key to distribute data.
#[derive(Clone, Debug)]
pub struct HashPartitioner {
    num_partitions: u32,
    seed: u64,
}

impl HashPartitioner {
    pub fn new(num_partitions: u32) -> Self {
        Self::with_seed(num_partitions, 0)
    }

    pub fn with_seed(num_partitions: u32, seed: u64) -> Self {
        assert!(num_partitions > 0, "Number of partitions must be positive.");
        Self {
            num_partitions,
            seed,
        }
    }
}

impl<K: Hash + Send + Sync> Partitioner<K> for HashPartitioner {
    fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    fn get_partition(&self, key: &K) -> u32 {
        hash_partition(key, self.num_partitions, self.seed)
    }
}

/// Seeded hash of `key` reduced modulo `num_partitions`.
pub fn hash_partition<K: Hash + ?Sized>(key: &K, num_partitions: u32, seed: u64) -> u32 {
    let mut s = DefaultHasher::new();
    seed.hash(&mut s);
    key.hash(&mut s);
    (s.finish() % num_partitions as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_partitioner_is_stable_and_in_range() {
        let partitioner = HashPartitioner::new(4);
        for key in ["a", "b", "alex", "mary", "jeff", "jane", ""] {
            let key = key.to_string();
            let p = partitioner.get_partition(&key);
            assert!(p < 4);
            assert_eq!(p, partitioner.get_partition(&key));
        }
        assert_eq!(Partitioner::<String>::num_partitions(&partitioner), 4);
    }

    #[test]
    fn test_single_partition_takes_everything() {
        let partitioner = HashPartitioner::with_seed(1, 42);
        for i in 0..100i64 {
            assert_eq!(partitioner.get_partition(&i), 0);
        }
    }

    #[test]
    fn test_keys_spread_over_partitions() {
        let partitioner = HashPartitioner::new(8);
        let mut seen = [false; 8];
        for i in 0..1000 {
            seen[partitioner.get_partition(&format!("key-{i}")) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "Number of partitions must be positive.")]
    fn test_zero_partitions_panics() {
        HashPartitioner::new(0);
    }
}
