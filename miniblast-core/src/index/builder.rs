//! Genome k-mer index: first occurrence of every fixed-length word

use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::map::{KmerMap, DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD_FACTOR};
use crate::error::{CoreError, CoreResult};
use crate::types::{words, Position, DEFAULT_WORD_SIZE};

/// Parameters for building a [`KmerIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexParams {
    /// Fixed word length
    pub word_size: usize,
    /// Bucket count before any growth
    pub initial_buckets: usize,
    /// Entries per bucket before the table doubles
    pub max_load_factor: f32,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            word_size: DEFAULT_WORD_SIZE,
            initial_buckets: DEFAULT_BUCKET_COUNT,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl IndexParams {
    pub fn validate(&self) -> CoreResult<()> {
        if self.word_size == 0 {
            return Err(CoreError::InvalidParams("word size must be positive".to_string()));
        }
        if self.initial_buckets == 0 {
            return Err(CoreError::InvalidParams(
                "initial bucket count must be positive".to_string(),
            ));
        }
        if !(self.max_load_factor.is_finite() && self.max_load_factor > 0.0) {
            return Err(CoreError::InvalidParams(format!(
                "max load factor must be positive, got {}",
                self.max_load_factor
            )));
        }
        Ok(())
    }
}

/// Word → recorded position table for one genome.
///
/// The recorded position of a word is its first start offset minus the word
/// size. Seed extension subtracts the query offset from that value as is.
#[derive(Debug, Clone, PartialEq)]
pub struct KmerIndex {
    table: KmerMap<Position>,
    word_size: usize,
}

impl KmerIndex {
    pub fn new(params: &IndexParams) -> CoreResult<Self> {
        params.validate()?;
        let mut table = KmerMap::with_buckets(params.initial_buckets);
        table.set_max_load_factor(params.max_load_factor)?;
        Ok(Self {
            table,
            word_size: params.word_size,
        })
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &KmerMap<Position> {
        &self.table
    }

    /// Record `word` at `position` unless it is already present
    pub fn insert(&mut self, word: &[u8], position: Position) -> CoreResult<bool> {
        self.check_word(word)?;
        Ok(self.table.insert(word, position).1)
    }

    /// Recorded position of `word`; words of the wrong length are never present
    pub fn lookup(&self, word: &[u8]) -> Option<Position> {
        if word.len() != self.word_size {
            return None;
        }
        self.table.get(word).copied()
    }

    fn check_word(&self, word: &[u8]) -> CoreResult<()> {
        if word.len() != self.word_size {
            return Err(CoreError::InvalidWordLength {
                expected: self.word_size,
                actual: word.len(),
            });
        }
        Ok(())
    }
}

/// Scans a genome and fills a [`KmerIndex`]
#[derive(Debug, Clone, Default)]
pub struct KmerIndexBuilder {
    params: IndexParams,
}

impl KmerIndexBuilder {
    pub fn new(params: IndexParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IndexParams {
        &self.params
    }

    /// Index every distinct word of `genome`, first occurrence wins
    pub fn build(&self, genome: &[u8]) -> CoreResult<KmerIndex> {
        let start = Instant::now();
        let mut index = KmerIndex::new(&self.params)?;
        let word_size = self.params.word_size;

        // Words already handled in this pass
        let mut seen: KmerMap<u8> = KmerMap::with_buckets(self.params.initial_buckets);
        let mut duplicates = 0usize;

        for (offset, word) in words(genome, word_size) {
            let flag = seen.get_or_insert_default(word);
            if *flag != 0 {
                duplicates += 1;
                continue;
            }
            *flag = 1;
            index.insert(word, offset as Position - word_size as Position)?;
        }

        debug!(
            "Indexed {} distinct {}-mers ({} duplicates skipped), {} buckets",
            index.len(),
            word_size,
            duplicates,
            index.table.bucket_count()
        );
        info!(
            "Built k-mer index over {} bp in {:.3}s",
            genome.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(index)
    }
}

/// Build an index of `genome` with the default table parameters
pub fn build_index(genome: &[u8], word_size: usize) -> CoreResult<KmerIndex> {
    KmerIndexBuilder::new(IndexParams {
        word_size,
        ..IndexParams::default()
    })
    .build(genome)
}

/// Recorded position of `word` in `index`
pub fn lookup(index: &KmerIndex, word: &[u8]) -> Option<Position> {
    index.lookup(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_genome() {
        let index = build_index(b"AAAAAAAAAAA", 11).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(b"AAAAAAAAAAA"), Some(-11));
    }

    #[test]
    fn test_short_genome_is_empty() {
        let index = build_index(b"ACGTACGTAC", 11).unwrap();
        assert!(index.is_empty());

        let index = build_index(b"", 11).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_first_occurrence_wins() {
        // ACG appears at 0 and 4
        let index = build_index(b"ACGTACGA", 3).unwrap();
        assert_eq!(index.lookup(b"ACG"), Some(-3));
        assert_eq!(index.lookup(b"CGT"), Some(-2));
        assert_eq!(index.lookup(b"GTA"), Some(-1));
        assert_eq!(index.lookup(b"TAC"), Some(0));
        assert_eq!(index.lookup(b"CGA"), Some(2));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_repeated_genome_collapses() {
        let genome = b"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let index = build_index(genome, 11).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(b"AAAAAAAAAAA"), Some(-11));
    }

    #[test]
    fn test_lookup_wrong_length() {
        let index = build_index(b"ACGTACGTACGTACGT", 11).unwrap();
        assert_eq!(index.lookup(b"ACGT"), None);
        assert_eq!(lookup(&index, b"ACGTACGTACG"), Some(-11));
        assert_eq!(lookup(&index, b"TTTTTTTTTTT"), None);
    }

    #[test]
    fn test_insert_rejects_wrong_length() {
        let mut index = KmerIndex::new(&IndexParams::default()).unwrap();
        let err = index.insert(b"ACGT", 0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidWordLength { expected: 11, actual: 4 }
        ));
        assert!(index.is_empty());

        assert!(index.insert(b"ACGTACGTACG", 5).unwrap());
        assert!(!index.insert(b"ACGTACGTACG", 9).unwrap());
        assert_eq!(index.lookup(b"ACGTACGTACG"), Some(5));
    }

    #[test]
    fn test_invalid_params() {
        let zero_word = IndexParams { word_size: 0, ..IndexParams::default() };
        assert!(KmerIndexBuilder::new(zero_word).build(b"ACGT").is_err());

        let zero_buckets = IndexParams { initial_buckets: 0, ..IndexParams::default() };
        assert!(KmerIndex::new(&zero_buckets).is_err());

        let bad_load = IndexParams { max_load_factor: 0.0, ..IndexParams::default() };
        assert!(bad_load.validate().is_err());
    }

    #[test]
    fn test_index_grows_from_small_table() {
        let params = IndexParams {
            word_size: 4,
            initial_buckets: 1,
            max_load_factor: 1.0,
        };
        let genome = b"ACGTTGCAAGCTTCGAGGATCCA";
        let index = KmerIndexBuilder::new(params).build(genome).unwrap();
        assert!(index.table().bucket_count() >= index.len());
        for (offset, word) in words(genome, 4) {
            let recorded = index.lookup(word).unwrap();
            // Recorded position points at the first occurrence
            let first = genome.windows(4).position(|w| w == word).unwrap();
            assert!(first <= offset);
            assert_eq!(recorded, first as Position - 4);
        }
    }
}
