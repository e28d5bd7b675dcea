//! Block descriptors.
//!
//! A [`Block`] governs one contiguous word range of the arena. Its
//! [`BlockState`] replaces a pair of independent `valid`/`free` flags:
//! an unused slot can never also be allocated, because there is no value
//! that says so.

use std::fmt;

use crate::word::{words_in, WORD_SIZE};

/// Lifecycle state of a block table slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockState {
    /// Slot holds no range. It may be recycled for a split remainder.
    #[default]
    Unused,
    /// Range is available to `allocate`.
    Free,
    /// Range has been handed out and not yet released.
    Allocated,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unused => "unused",
            Self::Free => "free",
            Self::Allocated => "allocated",
        };
        f.write_str(s)
    }
}

/// Descriptor for one contiguous range of the arena.
///
/// `start` is measured in words, `length` in bytes (always a whole number
/// of words). The block's address is never stored: it is recomputed from
/// `start` against the arena base whenever it is needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Current lifecycle state.
    pub state: BlockState,
    /// Offset of the first word governed by this block.
    pub start: usize,
    /// Size of the governed range in bytes.
    pub length: usize,
}

impl Block {
    /// An empty, recyclable slot.
    pub const UNUSED: Block = Block {
        state: BlockState::Unused,
        start: 0,
        length: 0,
    };

    /// A free block covering `length` bytes from word `start`.
    pub fn free(start: usize, length: usize) -> Self {
        Self {
            state: BlockState::Free,
            start,
            length,
        }
    }

    /// Whether the slot currently governs a range (free or allocated).
    pub fn is_live(&self) -> bool {
        self.state != BlockState::Unused
    }

    /// Whether the block is available for allocation.
    pub fn is_free(&self) -> bool {
        self.state == BlockState::Free
    }

    /// Whether the block has been handed out.
    pub fn is_allocated(&self) -> bool {
        self.state == BlockState::Allocated
    }

    /// Number of words covered by the block.
    pub fn words(&self) -> usize {
        words_in(self.length)
    }

    /// One past the last word covered by the block.
    pub fn end(&self) -> usize {
        self.start + self.words()
    }

    /// Byte offset of the block from the arena base.
    pub fn byte_offset(&self) -> usize {
        self.start * WORD_SIZE
    }

    /// Whether `next` begins exactly where `self` ends.
    pub fn precedes(&self, next: &Block) -> bool {
        self.end() == next.start
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::UNUSED
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}) {} bytes",
            self.state,
            self.start,
            self.end(),
            self.length
        )
    }
}
