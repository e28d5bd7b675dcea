//! Static first-fit allocation over a single fixed arena.
//!
//! The heap never asks the host for memory after construction. All
//! bookkeeping lives in a fixed-capacity block table; allocation carves
//! ranges out of one pre-sized arena of words.
//!
//! # Architecture
//!
//! ```text
//! StaticHeap (malloc / free, counters)
//! ├── Allocator (first-fit + split, exact-start release)
//! │   ├── Arena (Box<[Cell<Word>]>, sized once)
//! │   └── BlockTable (fixed slots, monotonic live count)
//! └── collector (coalesces address-adjacent free blocks, retry path only)
//! ```
//!
//! # Failure model
//!
//! Construction fails with a [`ConfigError`](fixheap_core::ConfigError)
//! for invalid sizes or when the host refuses the storage. Nothing here
//! panics or returns an error once the heap exists. A
//! request that cannot be met yields `None`; releasing an address the
//! table does not know is ignored. See [`StaticHeap::malloc`].
//!
//! # Threading
//!
//! [`StaticHeap`] is `Send` but not `Sync`. Callers that share one heap
//! across threads must serialise every `malloc`/`free` behind a lock.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod allocator;
pub mod arena;
pub mod collector;
pub mod config;
pub mod error;
pub mod heap;
pub mod stats;
pub mod table;

// Public re-exports for the primary API surface.
pub use allocator::{Allocator, Grant};
pub use arena::Arena;
pub use collector::CollectReport;
pub use config::HeapConfig;
pub use error::{AllocFailure, InvariantViolation};
pub use heap::StaticHeap;
pub use stats::{HeapCounters, HeapStats};
pub use table::BlockTable;
