//! Fixheap: a first-fit allocator over one fixed, word-aligned arena.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the fixheap sub-crates. The C interface lives separately in
//! `fixheap-ffi`.
//!
//! # Quick start
//!
//! ```rust
//! use fixheap::prelude::*;
//!
//! // 1 KiB arena described by at most 4 blocks.
//! let mut heap = StaticHeap::new(HeapConfig::new(1024, 4)).unwrap();
//!
//! let a = heap.malloc(100).unwrap();
//! let b = heap.malloc(200).unwrap();
//! assert_eq!(heap.allocation_len(a), Some(100));
//!
//! heap.free(Some(a));
//! heap.free(Some(b));
//!
//! // Neighbouring free blocks only merge when collected.
//! assert_eq!(heap.stats().free_blocks, 3);
//! heap.collect();
//! assert_eq!(heap.stats().free_blocks, 1);
//! assert!(heap.check_invariants().is_ok());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fixheap-core` | Word size, rounding, block records, config errors |
//! | [`heap`] | `fixheap-arena` | Arena, block table, allocator, collector, `StaticHeap` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Word arithmetic and block records (`fixheap-core`).
///
/// Contains [`types::Block`], [`types::BlockState`], [`types::round_to_word`]
/// and [`types::ConfigError`].
pub use fixheap_core as types;

/// Arena storage, block table and allocation (`fixheap-arena`).
///
/// Most users only need [`heap::StaticHeap`]; the lower layers
/// ([`heap::Allocator`], [`heap::BlockTable`], [`heap::collector`]) are
/// available for tooling that drives them directly.
pub use fixheap_arena as heap;

/// Common imports for typical fixheap usage.
///
/// ```rust
/// use fixheap::prelude::*;
/// ```
pub mod prelude {
    pub use fixheap_arena::{HeapConfig, HeapCounters, HeapStats, InvariantViolation, StaticHeap};
    pub use fixheap_core::{Block, BlockState, ConfigError, WORD_SIZE};
}
