//! Storage word and size rounding.
//!
//! The arena is an array of [`Word`]s. Every block starts on a word
//! boundary and every block length is a whole number of words, so all
//! handed-out addresses share the word's alignment.

/// Unit of arena storage.
pub type Word = u32;

/// Size of one [`Word`] in bytes. Also the only alignment the heap guarantees.
pub const WORD_SIZE: usize = std::mem::size_of::<Word>();

/// Round a byte count up to the next multiple of [`WORD_SIZE`].
///
/// Returns `None` if the rounded value does not fit in `usize`, so a
/// caller can never end up with less space than requested.
pub fn round_to_word(bytes: usize) -> Option<usize> {
    match bytes % WORD_SIZE {
        0 => Some(bytes),
        rem => bytes.checked_add(WORD_SIZE - rem),
    }
}

/// Number of words covered by `bytes`. `bytes` must already be word-rounded.
pub fn words_in(bytes: usize) -> usize {
    debug_assert_eq!(bytes % WORD_SIZE, 0, "{bytes} is not word-rounded");
    bytes / WORD_SIZE
}
