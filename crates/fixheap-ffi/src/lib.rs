//! C FFI bindings for the fixheap static allocator.
//!
//! Two surfaces are exported:
//!
//! - **Handle-based heaps** ([`heap`]): `fixheap_create` returns a `u64`
//!   handle; every other call takes it. Stale or destroyed handles are
//!   detected and reported as [`FixheapStatus::InvalidHandle`].
//! - **The default heap** ([`default_heap`]): a single process-wide
//!   16 MiB heap behind `fixheap_default_malloc` / `fixheap_default_free`,
//!   built on first use.
//!
//! The core heap is single-threaded. Here every heap sits behind its own
//! `Mutex`, so each exported call is atomic with respect to the others,
//! including the collect-and-retry inside `malloc`.
//!
//! This is the only crate in the workspace that contains `unsafe` code.
//! Each use is a write through a caller-supplied out-pointer, plus the
//! `#[no_mangle]` exports themselves.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into [`FixheapStatus::Panicked`].
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(status) => status,
            Err(_) => {
                log::error!("panic caught at fixheap FFI boundary");
                $crate::status::FixheapStatus::Panicked as i32
            }
        }
    };
}

/// Run a pointer-returning FFI body, converting a panic into null.
macro_rules! ffi_guard_ptr {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(ptr) => ptr,
            Err(_) => {
                log::error!("panic caught at fixheap FFI boundary");
                std::ptr::null_mut()
            }
        }
    };
}

/// Lock a mutex, returning [`FixheapStatus::InternalError`] if it is poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::FixheapStatus::InternalError as i32,
        }
    };
}

pub mod default_heap;
mod handle;
pub mod heap;
pub mod stats;
pub mod status;

pub use stats::FixheapStats;
pub use status::FixheapStatus;
