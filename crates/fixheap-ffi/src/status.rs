//! C-compatible status codes.
//!
//! [`FixheapStatus`] is a `repr(i32)` enum. `Ok` is zero and every error
//! is negative. Allocation failure is not a status: `malloc` entry points
//! return a null pointer, as a C allocator would.

use fixheap_core::ConfigError;

/// Status code returned by every FFI function that does not return a pointer.
///
/// Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixheapStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// A required out-pointer is null.
    InvalidArgument = -2,
    /// Arena size or table size rejected at creation.
    ConfigError = -3,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -4,
    /// The host could not supply the arena or the block table.
    OutOfMemory = -5,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&ConfigError> for FixheapStatus {
    fn from(e: &ConfigError) -> Self {
        match e {
            ConfigError::OutOfMemory { .. } => FixheapStatus::OutOfMemory,
            _ => FixheapStatus::ConfigError,
        }
    }
}
