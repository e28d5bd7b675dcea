//! C-compatible occupancy snapshot.

use fixheap_arena::HeapStats;

/// Occupancy of one heap, as returned by `fixheap_stats`.
///
/// Fixed-width `u64` fields for ABI portability (not `usize`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixheapStats {
    /// Arena size in bytes.
    pub capacity_bytes: u64,
    /// Bytes governed by allocated blocks.
    pub allocated_bytes: u64,
    /// Bytes governed by free blocks.
    pub free_bytes: u64,
    /// Number of allocated blocks.
    pub allocated_blocks: u64,
    /// Number of free blocks.
    pub free_blocks: u64,
    /// Table slots available for future splits.
    pub spare_slots: u64,
    /// Total table slots.
    pub table_capacity: u64,
    /// Size of the largest free block in bytes.
    pub largest_free_block: u64,
}

impl From<&HeapStats> for FixheapStats {
    fn from(s: &HeapStats) -> Self {
        Self {
            capacity_bytes: s.capacity_bytes as u64,
            allocated_bytes: s.allocated_bytes as u64,
            free_bytes: s.free_bytes as u64,
            allocated_blocks: s.allocated_blocks as u64,
            free_blocks: s.free_blocks as u64,
            spare_slots: s.spare_slots() as u64,
            table_capacity: s.table_capacity as u64,
            largest_free_block: s.largest_free_block as u64,
        }
    }
}
