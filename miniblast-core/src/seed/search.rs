//! Seed-and-extend search of query sequences against one genome

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{SeedHit, SeedScanner};
use crate::alignment::{Alignment, GlobalAligner, ScoringScheme};
use crate::error::{CoreError, CoreResult};
use crate::index::{IndexParams, KmerIndex, KmerIndexBuilder};
use crate::types::{Sequence, DEFAULT_WINDOW};

/// Search parameters beyond the index and the scoring scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Length of the genome window aligned against each query
    pub window: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl SearchParams {
    pub fn validate(&self, word_size: usize) -> CoreResult<()> {
        if self.window < word_size {
            return Err(CoreError::InvalidParams(format!(
                "window ({}) must be at least the word size ({})",
                self.window, word_size
            )));
        }
        Ok(())
    }
}

/// Score a window must reach to count as a perfect hit
pub fn perfect_score(scoring: &ScoringScheme, window: usize) -> i32 {
    scoring.match_bonus.saturating_mul(window as i32)
}

/// One seed extended into a global alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub query_id: String,
    pub seed: SeedHit,
    /// Start of the aligned genome window
    pub genome_offset: usize,
    pub genome_window: String,
    pub query: String,
    pub alignment: Alignment,
    pub perfect: bool,
}

/// Counters for one search run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub queries: usize,
    pub words_scanned: usize,
    pub seeds: usize,
    pub alignments: usize,
    /// Seeds whose genome offset came out negative
    pub skipped_seeds: usize,
    pub perfect_hits: usize,
    pub elapsed: Duration,
}

/// Hits plus counters, as written by `--json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchReport {
    pub hits: Vec<SearchHit>,
    pub summary: SearchSummary,
}

/// Finds seeds of each query in the genome index and aligns around them.
///
/// The presence table of looked-at words is shared by every query searched
/// with the same searcher, so a word seeds at most once per run.
pub struct SeedSearcher<'g> {
    genome: &'g [u8],
    index: KmerIndex,
    aligner: GlobalAligner,
    params: SearchParams,
    scanner: SeedScanner,
    summary: SearchSummary,
}

impl<'g> SeedSearcher<'g> {
    pub fn new(
        genome: &'g [u8],
        index: KmerIndex,
        aligner: GlobalAligner,
        params: SearchParams,
    ) -> CoreResult<Self> {
        params.validate(index.word_size())?;
        Ok(Self {
            genome,
            index,
            aligner,
            params,
            scanner: SeedScanner::new(),
            summary: SearchSummary::default(),
        })
    }

    /// Index `genome` and wrap it in a searcher
    pub fn build(
        genome: &'g [u8],
        index_params: IndexParams,
        scoring: ScoringScheme,
        params: SearchParams,
    ) -> CoreResult<Self> {
        let index = KmerIndexBuilder::new(index_params).build(genome)?;
        Self::new(genome, index, GlobalAligner::new(scoring), params)
    }

    pub fn index(&self) -> &KmerIndex {
        &self.index
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn summary(&self) -> &SearchSummary {
        &self.summary
    }

    pub fn perfect_score(&self) -> i32 {
        perfect_score(self.aligner.scoring(), self.params.window)
    }

    /// Search one query, returning the hits of its new seeds in query order
    pub fn search(&mut self, query: &Sequence) -> CoreResult<Vec<SearchHit>> {
        let start = Instant::now();
        let scanned_before = self.scanner.words_scanned();
        let seeds = self.scanner.scan(&self.index, query.as_bytes());

        self.summary.queries += 1;
        self.summary.words_scanned += self.scanner.words_scanned() - scanned_before;
        self.summary.seeds += seeds.len();

        let mut hits = Vec::new();
        for seed in seeds {
            let offset = seed.genome_offset();
            if offset < 0 {
                trace!(
                    "Seed {} of {} maps before the genome start ({})",
                    seed.word,
                    query.id,
                    offset
                );
                self.summary.skipped_seeds += 1;
                continue;
            }
            hits.push(self.extend(query, seed, offset as usize)?);
        }

        self.summary.elapsed += start.elapsed();
        Ok(hits)
    }

    /// Search every query in order and collect a report
    pub fn search_all(&mut self, queries: &[Sequence]) -> CoreResult<SearchReport> {
        let mut hits = Vec::new();
        for query in queries {
            let query_hits = self.search(query)?;
            debug!("Query {}: {} hits", query.id, query_hits.len());
            hits.extend(query_hits);
        }
        info!(
            "Searched {} queries: {} seeds, {} alignments, {} perfect hits",
            self.summary.queries,
            self.summary.seeds,
            self.summary.alignments,
            self.summary.perfect_hits
        );
        Ok(SearchReport {
            hits,
            summary: self.summary.clone(),
        })
    }

    fn extend(&mut self, query: &Sequence, seed: SeedHit, offset: usize) -> CoreResult<SearchHit> {
        let start = offset.min(self.genome.len());
        let end = offset.saturating_add(self.params.window).min(self.genome.len());
        let window = &self.genome[start..end];

        let alignment = self.aligner.align(window, query.as_bytes())?;
        let perfect = alignment.score == self.perfect_score();

        self.summary.alignments += 1;
        if perfect {
            self.summary.perfect_hits += 1;
        }

        Ok(SearchHit {
            query_id: query.id.clone(),
            seed,
            genome_offset: offset,
            genome_window: String::from_utf8_lossy(window).into_owned(),
            query: String::from_utf8_lossy(query.as_bytes()).into_owned(),
            alignment,
            perfect,
        })
    }
}
