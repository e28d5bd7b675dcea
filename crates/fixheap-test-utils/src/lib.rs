//! Test utilities for fixheap development.
//!
//! Provides invariant assertions over a [`StaticHeap`], a small op
//! language ([`HeapOp`]) with a [`replay`] driver, and the standard
//! scenario heaps in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::ops::Range;
use std::ptr::NonNull;

use fixheap_arena::StaticHeap;
use fixheap_core::Block;

/// One step of a scripted workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapOp {
    /// `malloc(size)`; a non-null result joins the outstanding set.
    Malloc(usize),
    /// Free the n-th outstanding allocation, modulo the outstanding count.
    /// Ignored when nothing is outstanding.
    Free(usize),
}

/// Run `ops` against `heap`, returning allocations still outstanding.
pub fn replay(heap: &mut StaticHeap, ops: &[HeapOp]) -> Vec<NonNull<u8>> {
    let mut live = Vec::new();
    for op in ops {
        match *op {
            HeapOp::Malloc(size) => live.extend(heap.malloc(size)),
            HeapOp::Free(n) if !live.is_empty() => {
                let p = live.swap_remove(n % live.len());
                heap.free(Some(p));
            }
            HeapOp::Free(_) => {}
        }
    }
    live
}

/// Free blocks sorted by start word.
pub fn free_blocks_by_address(heap: &StaticHeap) -> Vec<Block> {
    let mut blocks: Vec<Block> = heap
        .blocks()
        .filter(|(_, b)| b.is_free())
        .map(|(_, b)| *b)
        .collect();
    blocks.sort_by_key(|b| b.start);
    blocks
}

/// Byte ranges (relative to the arena base) of the given allocations.
///
/// # Panics
///
/// Panics if any pointer does not start an allocated block.
pub fn outstanding_ranges(heap: &StaticHeap, ptrs: &[NonNull<u8>]) -> Vec<Range<usize>> {
    ptrs.iter()
        .map(|&p| {
            let start = heap
                .offset_of(p)
                .unwrap_or_else(|| panic!("{p:p} is outside the arena"));
            let len = heap
                .allocation_len(p)
                .unwrap_or_else(|| panic!("{p:p} does not start an allocated block"));
            start..start + len
        })
        .collect()
}

/// Panic unless live blocks tile the arena.
pub fn assert_tiled(heap: &StaticHeap) {
    if let Err(violation) = heap.check_invariants() {
        panic!("heap invariant broken: {violation}");
    }
}

/// Panic if any two of the given allocations share a byte.
pub fn assert_disjoint(heap: &StaticHeap, ptrs: &[NonNull<u8>]) {
    let mut ranges = outstanding_ranges(heap, ptrs);
    ranges.sort_unstable_by_key(|r| r.start);
    for pair in ranges.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "allocations {:?} and {:?} overlap",
            pair[0],
            pair[1]
        );
    }
}

/// Panic if a collection would still find something to merge.
pub fn assert_coalesced(heap: &StaticHeap) {
    if let Some((a, b)) = heap.table().adjacent_free_pair() {
        panic!("free slots {a} and {b} are adjacent after collection");
    }
}
