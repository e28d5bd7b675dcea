//! The `malloc`/`free` surface.
//!
//! [`StaticHeap`] composes the [`Allocator`] with the collector: a missed
//! allocation triggers exactly one collection and exactly one retry.
//! Release never collects.

use std::cell::Cell;
use std::ptr::NonNull;

use fixheap_core::{Block, ConfigError, Word};
use log::{debug, info};

use crate::allocator::{Allocator, Grant};
use crate::collector::{self, CollectReport};
use crate::config::HeapConfig;
use crate::error::{AllocFailure, InvariantViolation};
use crate::stats::{HeapCounters, HeapStats};
use crate::table::BlockTable;

/// A single fixed arena with first-fit allocation and deferred coalescing.
///
/// The arena is acquired once in [`StaticHeap::new`]; no later operation
/// obtains memory from the host. Every operation is a bounded scan of the
/// block table.
///
/// ```
/// use fixheap_arena::{HeapConfig, StaticHeap};
///
/// let mut heap = StaticHeap::new(HeapConfig::new(1024, 4)).unwrap();
/// let a = heap.malloc(100).unwrap();
/// assert_eq!(heap.allocation_len(a), Some(100));
/// heap.free(Some(a));
/// assert_eq!(heap.stats().free_bytes, 1024);
/// ```
pub struct StaticHeap {
    config: HeapConfig,
    allocator: Allocator,
    counters: HeapCounters,
}

impl StaticHeap {
    /// Validate `config` and build a heap whose arena is one free block.
    pub fn new(config: HeapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let allocator = Allocator::new(config.word_count(), config.table_entries)?;
        info!(
            "static heap: {} bytes, {} table entries",
            config.capacity_bytes, config.table_entries
        );
        Ok(Self {
            config,
            allocator,
            counters: HeapCounters::default(),
        })
    }

    /// Allocate at least `size` bytes, word-aligned.
    ///
    /// Returns `None` for `size == 0`, when word rounding would overflow,
    /// or when no free block fits even after one collection. Any miss other
    /// than a zero-size request runs [`collect`](Self::collect) and retries
    /// once; `malloc(0)` leaves the table untouched.
    pub fn malloc(&mut self, size: usize) -> Option<NonNull<u8>> {
        self.counters.malloc_calls += 1;
        let attempt = match self.allocator.try_allocate(size) {
            Err(AllocFailure::ZeroSize) => {
                self.counters.zero_size_requests += 1;
                return None;
            }
            Err(_) => {
                self.collect();
                self.allocator.try_allocate(size)
            }
            first => first,
        };
        match attempt {
            Ok(grant) => Some(self.note_grant(grant)),
            Err(failure) => {
                debug!("malloc({size}) failed: {failure}");
                self.counters.malloc_failures += 1;
                None
            }
        }
    }

    fn note_grant(&mut self, grant: Grant) -> NonNull<u8> {
        if !grant.split && grant.length > grant.rounded {
            self.counters.unsplit_grants += 1;
        }
        grant.ptr
    }

    /// Release the block starting exactly at `ptr`.
    ///
    /// `None`, interior pointers, pointers from elsewhere, and blocks that
    /// are already free are silently ignored.
    pub fn free(&mut self, ptr: Option<NonNull<u8>>) {
        let Some(p) = ptr else {
            return;
        };
        match self.allocator.release(Some(p)) {
            Some(_) => self.counters.releases += 1,
            None => {
                debug!("free({p:p}): no allocated block starts here");
                self.counters.ignored_releases += 1;
            }
        }
    }

    /// Merge every run of address-adjacent free blocks. Returns the number
    /// of merges performed.
    ///
    /// [`malloc`](Self::malloc) calls this on its retry path; calling it
    /// directly is only needed to inspect a coalesced table.
    pub fn collect(&mut self) -> usize {
        let CollectReport { merges, .. } = collector::collect(self.allocator.table_mut());
        self.counters.collections += 1;
        self.counters.merges += merges as u64;
        merges
    }

    /// Length in bytes of the allocated block starting exactly at `ptr`.
    pub fn allocation_len(&self, ptr: NonNull<u8>) -> Option<usize> {
        self.allocated_block(ptr).map(|b| b.length)
    }

    /// Word view of the allocated block starting exactly at `ptr`.
    pub fn region(&self, ptr: NonNull<u8>) -> Option<&[Cell<Word>]> {
        let block = self.allocated_block(ptr)?;
        Some(self.allocator.arena().words(block.start, block.words()))
    }

    fn allocated_block(&self, ptr: NonNull<u8>) -> Option<Block> {
        let slot = self.allocator.slot_of(ptr)?;
        let block = *self.allocator.table().get(slot)?;
        block.is_allocated().then_some(block)
    }

    /// Whether `ptr` lies anywhere inside the arena.
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.allocator.arena().contains(ptr)
    }

    /// Drop every allocation and return to a single free block.
    ///
    /// Arena contents are zeroed and counters cleared. Pointers handed out
    /// before the reset must not be used afterwards.
    pub fn reset(&mut self) {
        let words = self.config.word_count();
        self.allocator.table_mut().reset(words);
        self.allocator.arena().clear();
        self.counters = HeapCounters::default();
    }

    /// Verify that live blocks tile the arena exactly.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.allocator.table().verify(self.config.word_count())
    }

    /// Activated table slots with their indices, in table order.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, &Block)> + '_ {
        self.allocator.table().iter()
    }

    /// The block table.
    pub fn table(&self) -> &BlockTable {
        self.allocator.table()
    }

    /// Byte offset of `ptr` from the arena base, if it lies in the arena.
    pub fn offset_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        self.allocator.arena().byte_offset(ptr)
    }

    /// Current occupancy snapshot.
    pub fn stats(&self) -> HeapStats {
        HeapStats::from_table(self.allocator.table(), self.config.capacity_bytes)
    }

    /// Cumulative counters since construction or the last reset.
    pub fn counters(&self) -> &HeapCounters {
        &self.counters
    }

    /// The configuration this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }
}
