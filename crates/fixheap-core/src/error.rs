//! Configuration error type.

use std::error::Error;
use std::fmt;

/// Errors detected while validating a heap configuration.
///
/// Only construction can fail. Once a heap exists, every operation
/// reports failure through its return value (null pointer or no-op).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The arena would hold no storage.
    ZeroCapacity,
    /// The arena size is not a whole number of words.
    UnalignedCapacity {
        /// Requested arena size in bytes.
        capacity_bytes: usize,
        /// Required granularity in bytes.
        word_size: usize,
    },
    /// The block table would have no slots, not even for the initial block.
    ZeroTableEntries,
    /// The host could not supply storage for the arena or the table.
    OutOfMemory {
        /// Size of the reservation that failed, saturated at `usize::MAX`.
        bytes: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "arena capacity must be non-zero"),
            Self::UnalignedCapacity {
                capacity_bytes,
                word_size,
            } => write!(
                f,
                "arena capacity {capacity_bytes} bytes is not a multiple of the {word_size}-byte word"
            ),
            Self::ZeroTableEntries => write!(f, "block table must have at least one entry"),
            Self::OutOfMemory { bytes } => {
                write!(f, "could not reserve {bytes} bytes of heap storage")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_sizes() {
        let e = ConfigError::UnalignedCapacity {
            capacity_bytes: 1023,
            word_size: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("1023"));
        assert!(msg.contains("4-byte"));
    }

    #[test]
    fn out_of_memory_names_the_reservation() {
        let e = ConfigError::OutOfMemory { bytes: 4096 };
        assert_eq!(e.to_string(), "could not reserve 4096 bytes of heap storage");
    }

    #[test]
    fn is_std_error() {
        let e: Box<dyn Error> = Box::new(ConfigError::ZeroCapacity);
        assert_eq!(e.to_string(), "arena capacity must be non-zero");
    }
}
