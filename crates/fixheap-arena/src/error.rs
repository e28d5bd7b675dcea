//! Allocator-specific error types.
//!
//! [`AllocFailure`] explains why a single allocation attempt produced no
//! block. [`StaticHeap::malloc`](crate::StaticHeap::malloc) folds every
//! variant into `None`; the distinction exists for counters and logs.

use std::error::Error;
use std::fmt;

/// Why one `allocate` attempt did not produce a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocFailure {
    /// A zero-byte request. Never an error from the caller's point of view.
    ZeroSize,
    /// Rounding the request up to a whole word overflowed `usize`.
    SizeOverflow {
        /// Number of bytes requested.
        requested: usize,
    },
    /// No free block in the table is large enough.
    NoFit {
        /// Word-rounded number of bytes searched for.
        rounded: usize,
        /// Size of the largest free block seen during the scan.
        largest_free: usize,
    },
}

impl fmt::Display for AllocFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize => write!(f, "zero-size request"),
            Self::SizeOverflow { requested } => {
                write!(f, "request of {requested} bytes overflows word rounding")
            }
            Self::NoFit {
                rounded,
                largest_free,
            } => write!(
                f,
                "no free block fits {rounded} bytes (largest free block {largest_free} bytes)"
            ),
        }
    }
}

impl Error for AllocFailure {}

/// A broken bookkeeping invariant found by
/// [`StaticHeap::check_invariants`](crate::StaticHeap::check_invariants).
///
/// Live (free or allocated) blocks must tile the arena exactly. Any of
/// these means the table no longer describes the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The live count has run past the table capacity.
    LiveCountExceedsCapacity {
        /// Recorded live count.
        live: usize,
        /// Table capacity.
        capacity: usize,
    },
    /// A live block governs no bytes.
    ZeroLength {
        /// Offending slot.
        slot: usize,
    },
    /// A live block's length is not a whole number of words.
    UnalignedLength {
        /// Offending slot.
        slot: usize,
        /// Recorded length in bytes.
        length: usize,
    },
    /// A live block extends past the end of the arena.
    OutOfBounds {
        /// Offending slot.
        slot: usize,
        /// One past the block's last word.
        end: usize,
        /// Arena size in words.
        arena_words: usize,
    },
    /// Two live blocks start on the same word.
    DuplicateStart {
        /// First slot.
        slot: usize,
        /// Second slot.
        other: usize,
        /// Shared start word.
        start: usize,
    },
    /// No live block starts at this word, yet the arena is not covered there.
    Gap {
        /// First uncovered word.
        word: usize,
    },
    /// Live blocks cover a different number of words than the arena holds.
    CoverageMismatch {
        /// Sum of live block sizes in words.
        covered: usize,
        /// Arena size in words.
        arena_words: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiveCountExceedsCapacity { live, capacity } => {
                write!(f, "live count {live} exceeds table capacity {capacity}")
            }
            Self::ZeroLength { slot } => write!(f, "slot {slot} is live with zero length"),
            Self::UnalignedLength { slot, length } => {
                write!(f, "slot {slot} length {length} is not word-aligned")
            }
            Self::OutOfBounds {
                slot,
                end,
                arena_words,
            } => write!(
                f,
                "slot {slot} ends at word {end}, past arena end {arena_words}"
            ),
            Self::DuplicateStart { slot, other, start } => {
                write!(f, "slots {slot} and {other} both start at word {start}")
            }
            Self::Gap { word } => write!(f, "no block covers word {word}"),
            Self::CoverageMismatch {
                covered,
                arena_words,
            } => write!(
                f,
                "live blocks cover {covered} words, arena holds {arena_words}"
            ),
        }
    }
}

impl Error for InvariantViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fit_display_reports_sizes() {
        let e = AllocFailure::NoFit {
            rounded: 1024,
            largest_free: 924,
        };
        let msg = e.to_string();
        assert!(msg.contains("1024"));
        assert!(msg.contains("924"));
    }

    #[test]
    fn violation_display_names_slots() {
        let e = InvariantViolation::DuplicateStart {
            slot: 1,
            other: 3,
            start: 25,
        };
        assert_eq!(e.to_string(), "slots 1 and 3 both start at word 25");
    }
}
