//! Standard heaps used across integration tests and benchmarks.
//!
//! - [`scenario_heap`]: 1 KiB arena, 4 table entries.
//! - [`exhaustion_heap`]: 1 KiB arena, 2 table entries, so the second
//!   split already finds no spare slot.
//! - [`heap_with`]: arbitrary sizes.

use fixheap_arena::{HeapConfig, StaticHeap};

/// Arena size shared by the small fixtures.
pub const SCENARIO_BYTES: usize = 1024;

/// A heap with the given sizes.
///
/// # Panics
///
/// Panics if the sizes do not form a valid configuration.
pub fn heap_with(capacity_bytes: usize, table_entries: usize) -> StaticHeap {
    StaticHeap::new(HeapConfig::new(capacity_bytes, table_entries))
        .unwrap_or_else(|e| panic!("invalid fixture config: {e}"))
}

/// 1 KiB arena with a 4-entry table.
pub fn scenario_heap() -> StaticHeap {
    heap_with(SCENARIO_BYTES, 4)
}

/// 1 KiB arena with a 2-entry table.
pub fn exhaustion_heap() -> StaticHeap {
    heap_with(SCENARIO_BYTES, 2)
}
