//! Handle-based heap lifecycle FFI: create, malloc, free, collect, stats, destroy.
//!
//! Each heap lives in its own `Arc<Mutex<StaticHeap>>`. The global `HEAPS`
//! table lock is held only long enough to resolve a handle, so calls on
//! different heaps never contend.

use std::ffi::c_void;
use std::ptr::{self, NonNull};
use std::sync::{Arc, Mutex};

use fixheap_arena::{HeapConfig, StaticHeap};

use crate::handle::HandleTable;
use crate::stats::FixheapStats;
use crate::status::FixheapStatus;

type HeapArc = Arc<Mutex<StaticHeap>>;

static HEAPS: Mutex<HandleTable<HeapArc>> = Mutex::new(HandleTable::new());

/// Clone the Arc for a heap handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
fn get_heap(handle: u64) -> Option<HeapArc> {
    HEAPS.lock().ok()?.get(handle).cloned()
}

/// Create a heap with an arena of `capacity_bytes` and a block table of
/// `table_entries` slots.
///
/// On success, writes the heap handle to `heap_out` and returns `FIXHEAP_STATUS_OK`.
/// `capacity_bytes` must be a non-zero multiple of 4; `table_entries`
/// must be non-zero. Returns `FIXHEAP_STATUS_OUT_OF_MEMORY` when the host
/// cannot supply that much storage.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_create(
    capacity_bytes: usize,
    table_entries: usize,
    heap_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if heap_out.is_null() {
            return FixheapStatus::InvalidArgument as i32;
        }
        let heap = match StaticHeap::new(HeapConfig::new(capacity_bytes, table_entries)) {
            Ok(h) => h,
            Err(e) => {
                log::warn!("fixheap_create rejected: {e}");
                return FixheapStatus::from(&e) as i32;
            }
        };
        let handle = ffi_lock!(HEAPS).insert(Arc::new(Mutex::new(heap)));
        // SAFETY: heap_out is non-null and valid per caller contract.
        unsafe { *heap_out = handle };
        FixheapStatus::Ok as i32
    })
}

/// Destroy a heap and release its arena.
///
/// Every pointer obtained from the heap becomes dangling.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_destroy(heap: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(HEAPS).remove(heap) {
            Some(_) => FixheapStatus::Ok as i32,
            None => FixheapStatus::InvalidHandle as i32,
        }
    })
}

/// Allocate at least `size` bytes, 4-byte aligned, from `heap`.
///
/// Returns null when `size` is zero, when no block fits even after
/// coalescing, or when the handle is invalid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_malloc(heap: u64, size: usize) -> *mut c_void {
    ffi_guard_ptr!({
        let Some(arc) = get_heap(heap) else {
            return ptr::null_mut();
        };
        let Ok(mut heap) = arc.lock() else {
            return ptr::null_mut();
        };
        heap.malloc(size)
            .map_or(ptr::null_mut(), |p| p.as_ptr().cast::<c_void>())
    })
}

/// Release a block previously returned by [`fixheap_malloc`] on the same heap.
///
/// Null and unknown pointers are ignored; the call still returns
/// `FIXHEAP_STATUS_OK`. Only an invalid handle is reported.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_free(heap: u64, ptr: *mut c_void) -> i32 {
    ffi_guard!({
        let Some(arc) = get_heap(heap) else {
            return FixheapStatus::InvalidHandle as i32;
        };
        ffi_lock!(arc).free(NonNull::new(ptr.cast::<u8>()));
        FixheapStatus::Ok as i32
    })
}

/// Coalesce adjacent free blocks. Writes the merge count to `merges_out`
/// when it is non-null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_collect(heap: u64, merges_out: *mut u64) -> i32 {
    ffi_guard!({
        let Some(arc) = get_heap(heap) else {
            return FixheapStatus::InvalidHandle as i32;
        };
        let merges = ffi_lock!(arc).collect();
        if !merges_out.is_null() {
            // SAFETY: merges_out is non-null and valid per caller contract.
            unsafe { *merges_out = merges as u64 };
        }
        FixheapStatus::Ok as i32
    })
}

/// Write an occupancy snapshot of `heap` to `stats_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fixheap_stats(heap: u64, stats_out: *mut FixheapStats) -> i32 {
    ffi_guard!({
        if stats_out.is_null() {
            return FixheapStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_heap(heap) else {
            return FixheapStatus::InvalidHandle as i32;
        };
        let stats = FixheapStats::from(&ffi_lock!(arc).stats());
        // SAFETY: stats_out is non-null and valid per caller contract.
        unsafe { *stats_out = stats };
        FixheapStatus::Ok as i32
    })
}
