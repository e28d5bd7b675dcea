//! Fixed word storage.
//!
//! An [`Arena`] is a boxed slice of [`Cell<Word>`] sized once at
//! construction and never resized. Cells give callers write access to
//! handed-out ranges through shared references, so addresses computed
//! from the arena stay valid while the table is mutated.

use std::cell::Cell;
use std::ptr::NonNull;

use fixheap_core::{ConfigError, Word, WORD_SIZE};

/// Contiguous, word-aligned backing storage for a heap.
pub struct Arena {
    words: Box<[Cell<Word>]>,
}

impl Arena {
    /// Create a zeroed arena of `word_count` words.
    ///
    /// This is the only point at which memory is obtained from the host.
    /// Fails with [`ConfigError::OutOfMemory`] if the host refuses.
    pub fn new(word_count: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            words: try_boxed_slice(word_count, Cell::new(0))?,
        })
    }

    /// Arena size in words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Arena size in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.words.len() * WORD_SIZE
    }

    /// Address of word `start`: the arena base plus `start * WORD_SIZE`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is past the end of the arena.
    pub fn address(&self, start: usize) -> NonNull<u8> {
        NonNull::from(&self.words[start..]).cast::<u8>()
    }

    /// Whether `ptr` points anywhere inside the arena.
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.byte_offset(ptr).is_some()
    }

    /// Byte offset of `ptr` from the arena base, if it lies inside the arena.
    pub fn byte_offset(&self, ptr: NonNull<u8>) -> Option<usize> {
        let base = self.words.as_ptr().addr();
        let offset = ptr.as_ptr().addr().checked_sub(base)?;
        (offset < self.capacity_bytes()).then_some(offset)
    }

    /// Shared view of `len` words starting at word `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range runs past the end of the arena.
    pub fn words(&self, start: usize, len: usize) -> &[Cell<Word>] {
        &self.words[start..start + len]
    }

    /// Zero every word.
    pub fn clear(&self) {
        self.words.iter().for_each(|w| w.set(0));
    }
}

/// `len` copies of `fill` in a boxed slice, reporting a refused
/// reservation instead of aborting.
pub(crate) fn try_boxed_slice<T: Clone>(len: usize, fill: T) -> Result<Box<[T]>, ConfigError> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| ConfigError::OutOfMemory {
            bytes: len.saturating_mul(size_of::<T>()),
        })?;
    items.resize(len, fill);
    Ok(items.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_zeroed() {
        let arena = Arena::new(16).unwrap();
        assert_eq!(arena.word_count(), 16);
        assert_eq!(arena.capacity_bytes(), 64);
        assert!(arena.words(0, 16).iter().all(|w| w.get() == 0));
    }

    #[test]
    fn address_is_base_plus_word_offset() {
        let arena = Arena::new(256).unwrap();
        let base = arena.address(0).as_ptr().addr();
        let at = arena.address(25).as_ptr().addr();
        assert_eq!(at - base, 100);
        assert_eq!(arena.byte_offset(arena.address(25)), Some(100));
    }

    #[test]
    fn addresses_are_word_aligned() {
        let arena = Arena::new(8).unwrap();
        for start in 0..8 {
            assert_eq!(arena.address(start).as_ptr().addr() % WORD_SIZE, 0);
        }
    }

    #[test]
    fn foreign_pointer_is_outside() {
        let arena = Arena::new(8).unwrap();
        let mut local = 0u8;
        assert!(!arena.contains(NonNull::from(&mut local)));
        assert!(arena.contains(arena.address(7)));
        assert!(!arena.contains(arena.address(8)), "one-past-end is outside");
    }

    #[test]
    fn oversized_arena_is_refused() {
        let err = Arena::new(usize::MAX / WORD_SIZE).err();
        assert_eq!(
            err,
            Some(ConfigError::OutOfMemory {
                bytes: (usize::MAX / WORD_SIZE) * WORD_SIZE
            })
        );
    }

    #[test]
    fn words_view_writes_through() {
        let arena = Arena::new(8).unwrap();
        arena.words(2, 3)[1].set(0xDEAD_BEEF);
        assert_eq!(arena.words(3, 1)[0].get(), 0xDEAD_BEEF);
        arena.clear();
        assert_eq!(arena.words(3, 1)[0].get(), 0);
    }
}
