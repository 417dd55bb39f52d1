//! K-mer indexing for seed lookup
//!
//! [`hash`] turns fixed-length nucleotide words into integers, [`map`] is the
//! chained hash table built on that hash, and [`builder`] fills a table with
//! the first occurrence of every word of a genome.

pub mod builder;
pub mod hash;
pub mod map;

pub use builder::{build_index, lookup, IndexParams, KmerIndex, KmerIndexBuilder};
pub use hash::{nucleotide_digit, PolymerHash, WordHasher};
pub use map::{Iter, IterMut, KmerMap, DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD_FACTOR};
