//! First-fit allocation and exact-start release.
//!
//! [`Allocator`] owns the [`Arena`] and its [`BlockTable`]. It never
//! coalesces: that is the collector's job, and only on the retry path of
//! [`StaticHeap::malloc`](crate::StaticHeap::malloc).

use std::ptr::NonNull;

use fixheap_core::{round_to_word, words_in, BlockState, ConfigError};
use log::{debug, trace};

use crate::arena::Arena;
use crate::error::AllocFailure;
use crate::table::BlockTable;

/// Result of a successful allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grant {
    /// Address of the first byte of the block.
    pub ptr: NonNull<u8>,
    /// Table slot now governing the block.
    pub slot: usize,
    /// Request size rounded up to a whole word.
    pub rounded: usize,
    /// Bytes governed by the block. At least the rounded request; larger
    /// when the table had no slot left for the remainder.
    pub length: usize,
    /// Whether the chosen free block was split.
    pub split: bool,
}

/// Arena plus block table: the allocate/release half of the heap.
pub struct Allocator {
    arena: Arena,
    table: BlockTable,
}

impl Allocator {
    /// Build an allocator over a fresh arena of `arena_words` words with a
    /// table of `table_entries` slots.
    pub fn new(arena_words: usize, table_entries: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            arena: Arena::new(arena_words)?,
            table: BlockTable::new(table_entries, arena_words)?,
        })
    }

    /// The backing storage.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The block table.
    pub fn table(&self) -> &BlockTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut BlockTable {
        &mut self.table
    }

    /// Allocate `size` bytes, or `None`. Does not collect.
    pub fn allocate(&mut self, size: usize) -> Option<NonNull<u8>> {
        self.try_allocate(size).ok().map(|g| g.ptr)
    }

    /// Allocate `size` bytes, reporting why nothing was granted.
    ///
    /// The request is rounded up to a whole word. The first free block in
    /// table order that can hold it is chosen. If the block is larger, the
    /// remainder is moved into a spare slot; when no slot is left the
    /// whole block is granted instead.
    pub fn try_allocate(&mut self, size: usize) -> Result<Grant, AllocFailure> {
        if size == 0 {
            return Err(AllocFailure::ZeroSize);
        }
        let rounded =
            round_to_word(size).ok_or(AllocFailure::SizeOverflow { requested: size })?;

        let slot = self
            .table
            .first_fit(rounded)
            .ok_or_else(|| AllocFailure::NoFit {
                rounded,
                largest_free: self.table.largest_free(),
            })?;
        let chosen = self.table.live_slots()[slot];

        let remainder = chosen.length - rounded;
        let mut split = false;
        if remainder > 0 {
            let spare = self.table.spare_slot();
            split = self
                .table
                .activate_slot(spare, chosen.start + words_in(rounded), remainder);
            if !split {
                debug!(
                    "table full ({} slots): granting slot {slot} whole ({} bytes for {rounded})",
                    self.table.capacity(),
                    chosen.length
                );
            }
        }

        let length = if split { rounded } else { chosen.length };
        let block = &mut self.table.live_slots_mut()[slot];
        block.state = BlockState::Allocated;
        block.length = length;

        let ptr = self.arena.address(chosen.start);
        trace!(
            "allocate {size} -> slot {slot} at word {} ({length} bytes)",
            chosen.start
        );
        Ok(Grant {
            ptr,
            slot,
            rounded,
            length,
            split,
        })
    }

    /// Slot of the live block whose first byte is exactly `ptr`.
    ///
    /// Interior pointers and pointers outside the arena match nothing.
    pub fn slot_of(&self, ptr: NonNull<u8>) -> Option<usize> {
        self.table
            .position_live(|start| self.arena.address(start) == ptr)
    }

    /// Mark the block starting at `ptr` free. Neighbours are left alone.
    ///
    /// Returns the released slot, or `None` if `ptr` is null or does not
    /// start an allocated block (in which case nothing changes).
    pub fn release(&mut self, ptr: Option<NonNull<u8>>) -> Option<usize> {
        let ptr = ptr?;
        let slot = self.slot_of(ptr)?;
        let block = &mut self.table.live_slots_mut()[slot];
        if block.state != BlockState::Allocated {
            return None;
        }
        block.state = BlockState::Free;
        trace!("release slot {slot} at word {}", block.start);
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixheap_core::Block;

    fn offset(alloc: &Allocator, ptr: NonNull<u8>) -> usize {
        alloc.arena().byte_offset(ptr).unwrap()
    }

    #[test]
    fn zero_size_returns_none_without_touching_table() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        assert_eq!(alloc.try_allocate(0), Err(AllocFailure::ZeroSize));
        assert_eq!(alloc.table().live_count(), 1);
        assert_eq!(alloc.table().get(0), Some(&Block::free(0, 1024)));
    }

    #[test]
    fn overflowing_size_returns_none() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        assert_eq!(
            alloc.try_allocate(usize::MAX),
            Err(AllocFailure::SizeOverflow {
                requested: usize::MAX
            })
        );
    }

    #[test]
    fn first_allocation_splits_at_offset_zero() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let g = alloc.try_allocate(100).unwrap();
        assert_eq!(offset(&alloc, g.ptr), 0);
        assert_eq!(g.slot, 0);
        assert_eq!(g.length, 100);
        assert!(g.split);
        assert_eq!(alloc.table().get(1), Some(&Block::free(25, 924)));
    }

    #[test]
    fn requests_round_up_to_words() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let g = alloc.try_allocate(5).unwrap();
        assert_eq!(g.length, 8);
        let next = alloc.try_allocate(1).unwrap();
        assert_eq!(offset(&alloc, next.ptr), 8);
    }

    #[test]
    fn exact_fit_consumes_no_slot() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let g = alloc.try_allocate(1024).unwrap();
        assert!(!g.split);
        assert_eq!(g.length, 1024);
        assert_eq!(alloc.table().live_count(), 1);
    }

    #[test]
    fn no_fit_reports_largest_free() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        alloc.try_allocate(100).unwrap();
        assert_eq!(
            alloc.try_allocate(1000),
            Err(AllocFailure::NoFit {
                rounded: 1000,
                largest_free: 924,
            })
        );
    }

    #[test]
    fn exhausted_table_grants_whole_block() {
        let mut alloc = Allocator::new(256, 2).unwrap();
        alloc.try_allocate(100).unwrap();
        let g = alloc.try_allocate(8).unwrap();
        assert!(!g.split);
        assert_eq!(g.length, 924);
        assert_eq!(offset(&alloc, g.ptr), 100);
        assert_eq!(alloc.table().live_count(), 2);
    }

    #[test]
    fn release_frees_in_place() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let a = alloc.allocate(100);
        let b = alloc.allocate(200);
        assert_eq!(alloc.release(a), Some(0));
        assert_eq!(alloc.table().get(0), Some(&Block::free(0, 100)));
        // Neighbouring free space is not merged.
        assert_eq!(alloc.table().live_count(), 3);
        assert_eq!(alloc.release(b), Some(1));
        assert_eq!(alloc.table().get(1), Some(&Block::free(25, 200)));
    }

    #[test]
    fn release_null_is_noop() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        alloc.allocate(100);
        assert_eq!(alloc.release(None), None);
        assert!(alloc.table().get(0).unwrap().is_allocated());
    }

    #[test]
    fn interior_pointer_matches_nothing() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let a = alloc.allocate(100).unwrap();
        let interior = alloc.arena().address(1);
        assert_ne!(a, interior);
        assert_eq!(alloc.release(Some(interior)), None);
        assert!(alloc.table().get(0).unwrap().is_allocated());
    }

    #[test]
    fn double_release_is_noop() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let a = alloc.allocate(100);
        assert_eq!(alloc.release(a), Some(0));
        assert_eq!(alloc.release(a), None);
        assert_eq!(alloc.table().get(0), Some(&Block::free(0, 100)));
    }

    #[test]
    fn foreign_pointer_matches_nothing() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        alloc.allocate(100);
        let mut local = 0u8;
        assert_eq!(alloc.release(Some(NonNull::from(&mut local))), None);
    }

    #[test]
    fn freed_block_is_reused_first_fit() {
        let mut alloc = Allocator::new(256, 4).unwrap();
        let a = alloc.allocate(100);
        alloc.allocate(200);
        alloc.release(a);
        let c = alloc.try_allocate(40).unwrap();
        assert_eq!(c.slot, 0);
        assert_eq!(offset(&alloc, c.ptr), 0);
        // Remainder of the freed block went into a new slot.
        assert_eq!(alloc.table().get(3), Some(&Block::free(10, 60)));
    }
}
