//! Core types for the fixheap static allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the storage word, size rounding, block descriptors, and the
//! configuration error type used throughout the fixheap workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod word;

pub use block::{Block, BlockState};
pub use error::ConfigError;
pub use word::{round_to_word, words_in, Word, WORD_SIZE};
