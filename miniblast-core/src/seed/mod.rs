//! Seed discovery for miniblast
//!
//! A seed is a query word that is present in the genome index. Scanning keeps
//! a presence table of every word already looked at, so each distinct word
//! yields at most one seed per scanner no matter how many queries contain it.

use serde::{Deserialize, Serialize};

use crate::index::{KmerIndex, KmerMap};
use crate::types::{words, Position};

pub mod search;
pub mod workload;

pub use search::{SearchHit, SearchParams, SearchReport, SearchSummary, SeedSearcher};
pub use workload::{random_scan, self_scan, GeometricSteps, ScanKind, ScanStats};

/// A query word found in the genome index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedHit {
    pub word: String,
    /// Start offset of the word in the query
    pub query_offset: usize,
    /// Position recorded for the word in the index
    pub index_position: Position,
}

impl SeedHit {
    /// Genome offset implied by the seed, `index_position - query_offset`
    pub fn genome_offset(&self) -> Position {
        self.index_position - self.query_offset as Position
    }
}

/// Looks up query words in an index, reporting each distinct word once
#[derive(Debug, Clone, Default)]
pub struct SeedScanner {
    seen: KmerMap<u8>,
    words_scanned: usize,
}

impl SeedScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buckets(bucket_count: usize) -> Self {
        Self {
            seen: KmerMap::with_buckets(bucket_count),
            words_scanned: 0,
        }
    }

    /// Distinct words looked at so far, found or not
    pub fn distinct_words(&self) -> usize {
        self.seen.len()
    }

    pub fn words_scanned(&self) -> usize {
        self.words_scanned
    }

    /// Scan every full word of `query`, calling `on_seed` for each new seed
    pub fn scan_with<F>(&mut self, index: &KmerIndex, query: &[u8], mut on_seed: F) -> usize
    where
        F: FnMut(SeedHit),
    {
        let mut found = 0;
        for (offset, word) in words(query, index.word_size()) {
            self.words_scanned += 1;
            let flag = self.seen.get_or_insert_default(word);
            if *flag != 0 {
                continue;
            }
            *flag = 1;
            if let Some(index_position) = index.lookup(word) {
                found += 1;
                on_seed(SeedHit {
                    word: String::from_utf8_lossy(word).into_owned(),
                    query_offset: offset,
                    index_position,
                });
            }
        }
        found
    }

    /// Collect the new seeds of `query`
    pub fn scan(&mut self, index: &KmerIndex, query: &[u8]) -> Vec<SeedHit> {
        let mut seeds = Vec::new();
        self.scan_with(index, query, |seed| seeds.push(seed));
        seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;

    #[test]
    fn test_seed_genome_offset() {
        let seed = SeedHit {
            word: "ACG".to_string(),
            query_offset: 4,
            index_position: 2,
        };
        assert_eq!(seed.genome_offset(), -2);
    }

    #[test]
    fn test_scan_reports_each_word_once() {
        let index = build_index(b"ACGTACGTTT", 3).unwrap();
        let mut scanner = SeedScanner::new();

        let seeds = scanner.scan(&index, b"ACGTA");
        let found: Vec<&str> = seeds.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(found, vec!["ACG", "CGT", "GTA"]);
        assert_eq!(seeds[0].index_position, -3);
        assert_eq!(seeds[2].query_offset, 2);

        // Same words again from another query produce nothing new
        assert!(scanner.scan(&index, b"TACGT").iter().all(|s| s.word == "TAC"));
        assert!(scanner.scan(&index, b"ACGTA").is_empty());
        assert_eq!(scanner.words_scanned(), 9);
    }

    #[test]
    fn test_scan_counts_missing_words_as_seen() {
        let index = build_index(b"AAAAAA", 3).unwrap();
        let mut scanner = SeedScanner::new();
        assert_eq!(scanner.scan_with(&index, b"CCCAAA", |_| {}), 1);
        assert_eq!(scanner.distinct_words(), 4);
    }

    #[test]
    fn test_scan_short_query() {
        let index = build_index(b"ACGTACGT", 3).unwrap();
        let mut scanner = SeedScanner::new();
        assert!(scanner.scan(&index, b"AC").is_empty());
        assert_eq!(scanner.words_scanned(), 0);
    }
}
