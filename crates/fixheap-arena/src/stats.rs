//! Heap occupancy snapshots and cumulative counters.
//!
//! [`HeapStats`] is computed on demand from the block table.
//! [`HeapCounters`] accumulates over the heap's lifetime. Neither feeds
//! back into allocation decisions.

use crate::table::BlockTable;

/// Point-in-time view of arena occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Arena size in bytes.
    pub capacity_bytes: usize,
    /// Bytes governed by allocated blocks (including unsplit slack).
    pub allocated_bytes: usize,
    /// Bytes governed by free blocks.
    pub free_bytes: usize,
    /// Number of allocated blocks.
    pub allocated_blocks: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Recycled slots inside the live range.
    pub unused_slots: usize,
    /// Slots ever activated.
    pub live_slots: usize,
    /// Total table slots.
    pub table_capacity: usize,
    /// Size of the largest free block in bytes.
    pub largest_free_block: usize,
}

impl HeapStats {
    /// Snapshot `table` for an arena of `capacity_bytes`.
    pub fn from_table(table: &BlockTable, capacity_bytes: usize) -> Self {
        let mut stats = Self {
            capacity_bytes,
            live_slots: table.live_count(),
            table_capacity: table.capacity(),
            ..Self::default()
        };
        for block in table.live_slots() {
            if block.is_allocated() {
                stats.allocated_bytes += block.length;
                stats.allocated_blocks += 1;
            } else if block.is_free() {
                stats.free_bytes += block.length;
                stats.free_blocks += 1;
                stats.largest_free_block = stats.largest_free_block.max(block.length);
            } else {
                stats.unused_slots += 1;
            }
        }
        stats
    }

    /// Slots still available for splits: recycled plus never used.
    pub fn spare_slots(&self) -> usize {
        self.unused_slots + (self.table_capacity - self.live_slots)
    }

    /// Share of free space outside the largest free block, in `[0, 1]`.
    ///
    /// Zero means all free space is one block; values near one mean free
    /// space is scattered across many small blocks.
    pub fn fragmentation(&self) -> f64 {
        if self.free_bytes == 0 {
            return 0.0;
        }
        1.0 - self.largest_free_block as f64 / self.free_bytes as f64
    }
}

/// Cumulative operation counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeapCounters {
    /// Calls to `malloc`, including zero-size ones.
    pub malloc_calls: u64,
    /// `malloc` calls that returned `None` for a non-zero size.
    pub malloc_failures: u64,
    /// `malloc(0)` calls.
    pub zero_size_requests: u64,
    /// Collections run on the retry path.
    pub collections: u64,
    /// Block pairs merged across all collections.
    pub merges: u64,
    /// Grants that handed out a whole block because no slot was free.
    pub unsplit_grants: u64,
    /// `free` calls that released a block.
    pub releases: u64,
    /// Non-null `free` calls that matched no allocated block.
    pub ignored_releases: u64,
}
