//! Integration test: end-to-end malloc/free scenarios on small heaps.
//!
//! Walks through the documented 1 KiB / 4-entry sequence (split, release,
//! coalesce, whole-arena reallocation) and the 2-entry exhaustion case
//! where the table cannot record a split remainder.

use std::ptr::NonNull;

use fixheap_core::Block;
use fixheap_test_utils::fixtures::{exhaustion_heap, heap_with, scenario_heap};
use fixheap_test_utils::{assert_coalesced, assert_tiled, free_blocks_by_address, replay, HeapOp};

// ── 1 KiB arena, 4 table entries ────────────────────────────────────

#[test]
fn split_release_collect_reallocate() {
    let mut heap = scenario_heap();

    let a = heap.malloc(100).unwrap();
    assert_eq!(heap.offset_of(a), Some(0));
    assert_eq!(heap.allocation_len(a), Some(100));
    assert_eq!(free_blocks_by_address(&heap), vec![Block::free(25, 924)]);

    let b = heap.malloc(200).unwrap();
    assert_eq!(heap.offset_of(b), Some(100));
    assert_eq!(heap.allocation_len(b), Some(200));
    assert_eq!(free_blocks_by_address(&heap), vec![Block::free(75, 724)]);

    heap.free(Some(a));
    heap.free(Some(b));
    assert_eq!(
        free_blocks_by_address(&heap),
        vec![
            Block::free(0, 100),
            Block::free(25, 200),
            Block::free(75, 724),
        ]
    );

    assert_eq!(heap.collect(), 2);
    assert_eq!(free_blocks_by_address(&heap), vec![Block::free(0, 1024)]);
    assert_tiled(&heap);

    let whole = heap.malloc(1024).unwrap();
    assert_eq!(heap.offset_of(whole), Some(0));
    assert_eq!(heap.allocation_len(whole), Some(1024));
}

#[test]
fn whole_arena_reallocation_collects_implicitly() {
    let mut heap = scenario_heap();
    let a = heap.malloc(100);
    let b = heap.malloc(200);
    heap.free(a);
    heap.free(b);

    let whole = heap.malloc(1024).unwrap();
    assert_eq!(heap.offset_of(whole), Some(0));
    assert_eq!(heap.counters().collections, 1);
}

#[test]
fn returned_addresses_are_word_aligned() {
    let mut heap = heap_with(1024, 16);
    for size in [1, 3, 5, 7, 9, 13] {
        let p = heap.malloc(size).unwrap();
        assert_eq!(p.as_ptr().addr() % 4, 0, "size {size}");
        assert!(heap.allocation_len(p).unwrap() >= size);
    }
}

#[test]
fn freed_space_is_reused_in_table_order() {
    let mut heap = heap_with(1024, 8);
    let a = heap.malloc(64);
    let _b = heap.malloc(64).unwrap();
    heap.free(a);
    let c = heap.malloc(32).unwrap();
    assert_eq!(heap.offset_of(c), Some(0));
}

// ── Exhaustion: 2 table entries ─────────────────────────────────────

#[test]
fn exhausted_table_grants_full_block() {
    let mut heap = exhaustion_heap();

    let a = heap.malloc(100).unwrap();
    assert_eq!(heap.table().live_count(), 2);

    // Both slots are live and none is Unused, so the 924-byte remainder
    // cannot be split: the whole block is granted for an 8-byte request.
    let small = heap.malloc(8).unwrap();
    assert_eq!(heap.offset_of(small), Some(100));
    assert_eq!(heap.allocation_len(small), Some(924));
    assert_eq!(heap.counters().unsplit_grants, 1);

    // The arena is now fully allocated.
    assert!(heap.malloc(4).is_none());

    heap.free(Some(a));
    heap.free(Some(small));
    assert_tiled(&heap);
}

#[test]
fn collection_recycles_slots_for_later_splits() {
    let mut heap = exhaustion_heap();
    let a = heap.malloc(100);
    heap.free(a);
    // Slot 0 [0,100) and slot 1 [100,1024) are both free. A request that
    // fits neither forces a collection, which retires slot 1.
    let big = heap.malloc(1000).unwrap();
    assert_eq!(heap.offset_of(big), Some(0));
    // The merged block split again into the recycled slot.
    assert_eq!(heap.allocation_len(big), Some(1000));
    assert_eq!(free_blocks_by_address(&heap), vec![Block::free(250, 24)]);
    assert_eq!(heap.table().live_count(), 2);
}

// ── Invalid releases ────────────────────────────────────────────────

#[test]
fn foreign_and_interior_releases_change_nothing() {
    let mut heap = scenario_heap();
    let a = heap.malloc(100).unwrap();
    let before: Vec<Block> = heap.blocks().map(|(_, b)| *b).collect();

    let mut outside = [0u32; 4];
    heap.free(Some(NonNull::from(&mut outside).cast::<u8>()));
    heap.free(NonNull::new(a.as_ptr().wrapping_add(8)));
    heap.free(None);

    let after: Vec<Block> = heap.blocks().map(|(_, b)| *b).collect();
    assert_eq!(before, after);
    assert_eq!(heap.allocation_len(a), Some(100));
}

#[test]
fn collecting_twice_is_a_fixed_point() {
    let mut heap = heap_with(4096, 32);
    let mut script: Vec<HeapOp> = (1..=10).map(|i| HeapOp::Malloc(16 * i)).collect();
    script.extend([HeapOp::Free(0), HeapOp::Free(2), HeapOp::Free(4), HeapOp::Free(3)]);
    replay(&mut heap, &script);
    heap.collect();
    let once: Vec<Block> = heap.blocks().map(|(_, b)| *b).collect();
    assert_eq!(heap.collect(), 0);
    let twice: Vec<Block> = heap.blocks().map(|(_, b)| *b).collect();
    assert_eq!(once, twice);
    assert_coalesced(&heap);
    assert_tiled(&heap);
}
