//! Heap configuration parameters.

use fixheap_core::{ConfigError, WORD_SIZE};

/// Configuration for a [`StaticHeap`](crate::StaticHeap).
///
/// Both values are fixed for the lifetime of the heap. Validated at
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Total arena size in bytes.
    ///
    /// Default: 16 MiB. Must be non-zero and a multiple of [`WORD_SIZE`].
    pub capacity_bytes: usize,

    /// Number of block descriptors in the table.
    ///
    /// Default: 1024. Bounds how many distinct ranges (allocated or free)
    /// can exist at once. When the table is full, allocation stops
    /// splitting and hands out whole blocks instead.
    pub table_entries: usize,
}

impl HeapConfig {
    /// Default arena size: 16 MiB.
    pub const DEFAULT_CAPACITY_BYTES: usize = 16 * 1024 * 1024;

    /// Default block table size.
    pub const DEFAULT_TABLE_ENTRIES: usize = 1024;

    /// Create a config with explicit sizes.
    pub fn new(capacity_bytes: usize, table_entries: usize) -> Self {
        Self {
            capacity_bytes,
            table_entries,
        }
    }

    /// Check that the sizes describe a usable heap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_bytes == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity_bytes % WORD_SIZE != 0 {
            return Err(ConfigError::UnalignedCapacity {
                capacity_bytes: self.capacity_bytes,
                word_size: WORD_SIZE,
            });
        }
        if self.table_entries == 0 {
            return Err(ConfigError::ZeroTableEntries);
        }
        Ok(())
    }

    /// Arena size in words.
    pub fn word_count(&self) -> usize {
        self.capacity_bytes / WORD_SIZE
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_BYTES, Self::DEFAULT_TABLE_ENTRIES)
    }
}
