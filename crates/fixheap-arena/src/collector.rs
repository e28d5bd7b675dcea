//! Coalescing of address-adjacent free blocks.
//!
//! A pass visits every ordered pair `(a, b)` of distinct free slots and,
//! whenever `a` ends exactly where `b` begins, grows `a` by `b` and
//! retires `b` to [`BlockState::Unused`](fixheap_core::BlockState::Unused).
//! Passes repeat until one performs no merge, so a finished collection
//! never leaves two adjacent free blocks behind.
//!
//! Each pass is O(live²) over the table. The table is small and fixed, and
//! collection only runs when an allocation has already missed.

use fixheap_core::Block;
use log::debug;

use crate::table::BlockTable;

/// Outcome of one collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectReport {
    /// Number of block pairs merged.
    pub merges: usize,
    /// Number of full passes over the table, including the final empty one.
    pub passes: usize,
}

/// Merge adjacent free blocks in `table` until none remain.
pub fn collect(table: &mut BlockTable) -> CollectReport {
    let mut report = CollectReport::default();
    loop {
        let merged = merge_pass(table.live_slots_mut());
        report.passes += 1;
        report.merges += merged;
        if merged == 0 {
            break;
        }
    }
    debug!(
        "collect: {} merges over {} passes",
        report.merges, report.passes
    );
    report
}

fn merge_pass(slots: &mut [Block]) -> usize {
    let mut merges = 0;
    for a in 0..slots.len() {
        if !slots[a].is_free() {
            continue;
        }
        for b in 0..slots.len() {
            if a == b || !slots[b].is_free() {
                continue;
            }
            if slots[a].precedes(&slots[b]) {
                slots[a].length += slots[b].length;
                slots[b] = Block::UNUSED;
                merges += 1;
            }
        }
    }
    merges
}
