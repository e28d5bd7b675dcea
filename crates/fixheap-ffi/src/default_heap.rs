//! The process-wide default heap.
//!
//! A single 16 MiB heap with a 1024-entry table, built on the first
//! `fixheap_default_malloc`. There is no create/destroy pair: the heap
//! lives until the process exits.

use std::ffi::c_void;
use std::ptr::{self, NonNull};
use std::sync::{Mutex, MutexGuard};

use fixheap_arena::{HeapConfig, StaticHeap};

static DEFAULT_HEAP: Mutex<Option<StaticHeap>> = Mutex::new(None);

/// Lock the default heap, building it on first use.
///
/// Returns `None` if the mutex is poisoned.
fn lock_default() -> Option<MutexGuard<'static, Option<StaticHeap>>> {
    let mut guard = DEFAULT_HEAP.lock().ok()?;
    if guard.is_none() {
        // The default config always validates.
        *guard = StaticHeap::new(HeapConfig::default()).ok();
    }
    Some(guard)
}

/// Allocate at least `size` bytes, 4-byte aligned, from the default heap.
///
/// Returns null when `size` is zero or no block fits even after coalescing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_default_malloc(size: usize) -> *mut c_void {
    ffi_guard_ptr!({
        let Some(mut guard) = lock_default() else {
            return ptr::null_mut();
        };
        guard
            .as_mut()
            .and_then(|heap| heap.malloc(size))
            .map_or(ptr::null_mut(), |p| p.as_ptr().cast::<c_void>())
    })
}

/// Release a block returned by [`fixheap_default_malloc`].
///
/// Null and unknown pointers are ignored.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_default_free(ptr: *mut c_void) {
    let Some(ptr) = NonNull::new(ptr.cast::<u8>()) else {
        return;
    };
    let outcome = std::panic::catch_unwind(|| {
        let Some(mut guard) = lock_default() else {
            return;
        };
        if let Some(heap) = guard.as_mut() {
            heap.free(Some(ptr));
        }
    });
    if outcome.is_err() {
        log::error!("panic caught at fixheap FFI boundary");
    }
}

/// Run `f` against the default heap. For tests only.
#[cfg(test)]
pub(crate) fn with_default<R>(f: impl FnOnce(&StaticHeap) -> R) -> Option<R> {
    let guard = lock_default()?;
    guard.as_ref().map(f)
}
