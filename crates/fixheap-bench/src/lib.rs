//! Workload profiles for benchmarking the fixheap allocator.
//!
//! Provides deterministic op scripts for benchmarks and examples:
//!
//! - [`churn_profile`]: interleaved malloc/free with a bounded live set
//! - [`fill_then_drain_profile`]: allocate until full, then free everything
//! - [`fragmenting_profile`]: free every other block, then request large ones

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fixheap_test_utils::HeapOp;

/// Deterministic pseudo-random sequence (64-bit LCG).
fn lcg(seed: u64) -> impl Iterator<Item = u64> {
    std::iter::successors(Some(seed), |s| {
        Some(s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
    })
    .skip(1)
    .map(|s| s >> 33)
}

/// Mixed allocate/free traffic.
///
/// Roughly three mallocs per two frees, sizes in `1..=max_size`. The
/// script is fully determined by `seed`.
pub fn churn_profile(seed: u64, ops: usize, max_size: usize) -> Vec<HeapOp> {
    lcg(seed)
        .take(ops)
        .map(|r| {
            if r % 5 < 3 {
                HeapOp::Malloc(1 + (r / 5) as usize % max_size)
            } else {
                HeapOp::Free((r / 5) as usize)
            }
        })
        .collect()
}

/// `count` mallocs of `size` bytes followed by `count` frees.
pub fn fill_then_drain_profile(count: usize, size: usize) -> Vec<HeapOp> {
    let mut ops = vec![HeapOp::Malloc(size); count];
    ops.extend(std::iter::repeat_n(HeapOp::Free(0), count));
    ops
}

/// `count` small blocks, half of them freed in scattered order, then
/// `count / 2` requests twice as large. The large requests mostly fit only
/// once neighbouring holes coalesce.
pub fn fragmenting_profile(count: usize, size: usize) -> Vec<HeapOp> {
    let mut ops = vec![HeapOp::Malloc(size); count];
    ops.extend((0..count / 2).map(|i| HeapOp::Free(i * 2)));
    ops.extend(std::iter::repeat_n(HeapOp::Malloc(size * 2), count / 2));
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixheap_test_utils::fixtures::heap_with;
    use fixheap_test_utils::{assert_disjoint, assert_tiled, replay};

    #[test]
    fn churn_is_deterministic() {
        assert_eq!(churn_profile(42, 100, 64), churn_profile(42, 100, 64));
        assert_ne!(churn_profile(42, 100, 64), churn_profile(43, 100, 64));
    }

    #[test]
    fn churn_sizes_are_bounded() {
        for op in churn_profile(7, 1000, 64) {
            if let HeapOp::Malloc(size) = op {
                assert!((1..=64).contains(&size), "size {size}");
            }
        }
    }

    #[test]
    fn churn_keeps_heap_sound() {
        let mut heap = heap_with(64 * 1024, 128);
        let live = replay(&mut heap, &churn_profile(42, 2000, 256));
        assert_tiled(&heap);
        assert_disjoint(&heap, &live);
    }

    #[test]
    fn fill_then_drain_leaves_nothing_outstanding() {
        let mut heap = heap_with(4096, 64);
        let live = replay(&mut heap, &fill_then_drain_profile(32, 64));
        assert!(live.is_empty());
        assert_eq!(heap.stats().allocated_blocks, 0);
    }

    #[test]
    fn fragmenting_profile_stays_sound() {
        let mut heap = heap_with(4096, 64);
        let live = replay(&mut heap, &fragmenting_profile(32, 64));
        assert_tiled(&heap);
        assert_disjoint(&heap, &live);
    }
}
