//! Fixed-capacity block table.
//!
//! [`BlockTable`] is the allocator's only bookkeeping structure. Slots
//! `[0, live)` have been activated at least once; slots past `live` have
//! never been touched. `live` only grows: a slot retired by the collector
//! becomes [`BlockState::Unused`] in place and is recycled by the next
//! split rather than shrinking the live range.
//!
//! Table order is not address order. First-fit scans in table order.

use fixheap_core::{Block, BlockState, ConfigError, WORD_SIZE};

use crate::arena::try_boxed_slice;
use crate::error::InvariantViolation;

/// Fixed array of block descriptors plus a monotonic live count.
pub struct BlockTable {
    slots: Box<[Block]>,
    live: usize,
}

impl BlockTable {
    /// Create a table of `capacity` slots whose first slot is a single free
    /// block spanning `arena_words` words.
    pub fn new(capacity: usize, arena_words: usize) -> Result<Self, ConfigError> {
        let slots = try_boxed_slice(capacity, Block::UNUSED)?;
        if slots.is_empty() {
            return Err(ConfigError::ZeroTableEntries);
        }
        let mut table = Self { slots, live: 1 };
        table.slots[0] = Block::free(0, arena_words * WORD_SIZE);
        Ok(table)
    }

    /// Restore the bootstrap state: one free block over the whole arena.
    pub fn reset(&mut self, arena_words: usize) {
        self.slots.fill(Block::UNUSED);
        self.slots[0] = Block::free(0, arena_words * WORD_SIZE);
        self.live = 1;
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots that have ever been activated.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// The block in slot `index`, if that slot has ever been activated.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.live_slots().get(index)
    }

    /// Activated slots in table order.
    pub fn live_slots(&self) -> &[Block] {
        &self.slots[..self.live]
    }

    /// Activated slots paired with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Block)> + '_ {
        self.live_slots().iter().enumerate()
    }

    /// First recycled slot in `[0, live)`, if any.
    pub fn find_reusable_slot(&self) -> Option<usize> {
        self.live_slots()
            .iter()
            .position(|b| b.state == BlockState::Unused)
    }

    /// Candidate slot for a new block: a recycled slot if one exists,
    /// otherwise the next never-used index. The candidate may equal
    /// [`capacity`](Self::capacity), in which case activation fails.
    pub fn spare_slot(&self) -> usize {
        self.find_reusable_slot().unwrap_or(self.live)
    }

    /// Make slot `index` a free block over `length` bytes from word `start`.
    ///
    /// Activating index `live` grows the live count by one. Returns `false`
    /// (and changes nothing) if `index` is past `live`, past the table's
    /// capacity, or names a slot that still governs a range.
    #[must_use]
    pub fn activate_slot(&mut self, index: usize, start: usize, length: usize) -> bool {
        if index > self.live || index >= self.slots.len() {
            return false;
        }
        if self.slots[index].is_live() {
            return false;
        }
        self.slots[index] = Block::free(start, length);
        if index == self.live {
            self.live += 1;
        }
        true
    }

    /// First free slot (table order) holding at least `length` bytes.
    pub fn first_fit(&self, length: usize) -> Option<usize> {
        self.live_slots()
            .iter()
            .position(|b| b.is_free() && b.length >= length)
    }

    /// Largest free block in bytes, or zero if none is free.
    pub fn largest_free(&self) -> usize {
        self.live_slots()
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.length)
            .max()
            .unwrap_or(0)
    }

    /// First live slot whose start word satisfies `matches`.
    pub(crate) fn position_live(&self, mut matches: impl FnMut(usize) -> bool) -> Option<usize> {
        self.live_slots()
            .iter()
            .position(|b| b.is_live() && matches(b.start))
    }

    /// Mutable access to the activated slots.
    pub(crate) fn live_slots_mut(&mut self) -> &mut [Block] {
        &mut self.slots[..self.live]
    }

    /// First pair of free slots `(a, b)` where `a` ends exactly where `b` begins.
    pub fn adjacent_free_pair(&self) -> Option<(usize, usize)> {
        let slots = self.live_slots();
        slots.iter().enumerate().find_map(|(a, left)| {
            if !left.is_free() {
                return None;
            }
            slots
                .iter()
                .enumerate()
                .find(|&(b, right)| a != b && right.is_free() && left.precedes(right))
                .map(|(b, _)| (a, b))
        })
    }

    /// Check that live blocks tile `[0, arena_words)` with no gaps or overlaps.
    ///
    /// Runs in O(live²) without allocating: starts must be unique, every
    /// block must end either at the arena end or where another block
    /// starts, word 0 must be covered, and the covered words must sum to
    /// the arena size.
    pub fn verify(&self, arena_words: usize) -> Result<(), InvariantViolation> {
        if self.live > self.slots.len() {
            return Err(InvariantViolation::LiveCountExceedsCapacity {
                live: self.live,
                capacity: self.slots.len(),
            });
        }

        let slots = self.live_slots();
        let mut covered = 0usize;
        for (slot, block) in self.iter().filter(|(_, b)| b.is_live()) {
            if block.length == 0 {
                return Err(InvariantViolation::ZeroLength { slot });
            }
            if block.length % WORD_SIZE != 0 {
                return Err(InvariantViolation::UnalignedLength {
                    slot,
                    length: block.length,
                });
            }
            if block.end() > arena_words {
                return Err(InvariantViolation::OutOfBounds {
                    slot,
                    end: block.end(),
                    arena_words,
                });
            }
            if let Some(other) = slots
                .iter()
                .skip(slot + 1)
                .position(|b| b.is_live() && b.start == block.start)
            {
                return Err(InvariantViolation::DuplicateStart {
                    slot,
                    other: slot + 1 + other,
                    start: block.start,
                });
            }
            let end = block.end();
            if end != arena_words && !slots.iter().any(|b| b.is_live() && b.start == end) {
                return Err(InvariantViolation::Gap { word: end });
            }
            covered += block.words();
        }

        if !slots.iter().any(|b| b.is_live() && b.start == 0) {
            return Err(InvariantViolation::Gap { word: 0 });
        }
        if covered != arena_words {
            return Err(InvariantViolation::CoverageMismatch {
                covered,
                arena_words,
            });
        }
        Ok(())
    }
}
