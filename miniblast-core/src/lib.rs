//! miniblast core library
//!
//! K-mer index, global aligner, seed search and FASTA input for miniblast.

pub mod alignment;
pub mod error;
pub mod index;
pub mod io;
pub mod report;
pub mod seed;
pub mod types;

// Re-export commonly used types and functions
pub use alignment::{align, Alignment, AlignmentMatrix, Direction, GlobalAligner, ScoringScheme};
pub use error::{CoreError, CoreResult};
pub use index::{build_index, lookup, IndexParams, KmerIndex, KmerIndexBuilder, KmerMap, PolymerHash, WordHasher};
pub use seed::{SearchHit, SearchParams, SearchReport, SearchSummary, SeedHit, SeedSearcher};
pub use types::{Position, Sequence, DEFAULT_WINDOW, DEFAULT_WORD_SIZE};

/// Version information for the miniblast core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
