//! Positional hashing of fixed-length nucleotide words

/// Digit assigned to bytes outside {A, C, T, G}
pub const DEFAULT_DIGIT: u64 = 0;

/// Map a nucleotide to its base-4 digit (A=0, C=1, T=2, G=3), case-insensitive.
///
/// Anything else maps to [`DEFAULT_DIGIT`].
#[inline]
pub fn nucleotide_digit(nucleotide: u8) -> u64 {
    match nucleotide.to_ascii_uppercase() {
        b'A' => 0,
        b'C' => 1,
        b'T' => 2,
        b'G' => 3,
        _ => DEFAULT_DIGIT,
    }
}

/// Hash function used to place words into buckets
pub trait WordHasher {
    fn hash_word(&self, word: &[u8]) -> u64;
}

/// Reads a word of length `r` as a base-`r` numeral of its digits.
///
/// Only meaningful for the fixed word length an index is built with; words of
/// different lengths may collide freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolymerHash;

impl WordHasher for PolymerHash {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u64 {
        let radix = word.len() as u64;
        word.iter().fold(0u64, |acc, &nucleotide| {
            acc.wrapping_mul(radix).wrapping_add(nucleotide_digit(nucleotide))
        })
    }
}
