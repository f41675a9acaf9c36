//! Key-based partition routing.
//!
//! Messages published with a key but no explicit partition are routed
//! by hashing the key with 32-bit FNV-1a and reducing modulo the
//! partition count. The hash is stable across processes, so the same
//! key always lands on the same partition for a given topic layout.

use courier_core::PartitionIndex;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of `data`.
#[must_use]
pub fn fnv1a_32(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Routes a message key to a partition.
///
/// # Panics
///
/// Panics if `partition_count` is zero. Topics are created with at
/// least one partition, so a zero count indicates a bug upstream.
#[must_use]
pub fn partition_for_key(key: &str, partition_count: u32) -> PartitionIndex {
    assert!(partition_count > 0, "partition_count must be non-zero");
    PartitionIndex::new(u64::from(fnv1a_32(key.as_bytes()) % partition_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vectors() {
        // Published FNV-1a 32-bit test vectors.
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_routing_is_deterministic() {
        let first = partition_for_key("order-42", 8);
        let second = partition_for_key("order-42", 8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_routing_within_bounds() {
        for i in 0..1000 {
            let key = format!("key-{i}");
            let partition = partition_for_key(&key, 7);
            assert!(partition.get() < 7);
        }
    }

    #[test]
    fn test_routing_single_partition() {
        assert_eq!(partition_for_key("anything", 1), PartitionIndex::new(0));
    }

    #[test]
    fn test_routing_spreads_keys() {
        // With enough distinct keys every partition of a small topic
        // should receive at least one.
        let mut seen = [false; 4];
        for i in 0..256 {
            let key = format!("key-{i}");
            seen[partition_for_key(&key, 4).get() as usize] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    #[should_panic(expected = "partition_count must be non-zero")]
    fn test_routing_zero_partitions_panics() {
        let _ = partition_for_key("key", 0);
    }
}
