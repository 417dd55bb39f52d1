//! Query workloads used to time index lookups
//!
//! Both scans index a prefix of the genome and then look words up in it with
//! a fresh [`SeedScanner`], counting the distinct words that were found.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SeedScanner;
use crate::error::{CoreError, CoreResult};
use crate::index::{IndexParams, KmerIndexBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    /// Every word of the indexed prefix
    #[serde(rename = "self")]
    SelfScan,
    /// Windows at geometric random offsets
    Random,
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanKind::SelfScan => write!(f, "self"),
            ScanKind::Random => write!(f, "random"),
        }
    }
}

/// Outcome of one timed scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    pub kind: ScanKind,
    /// Requested prefix length
    pub size: usize,
    pub genome_len: usize,
    pub word_size: usize,
    /// Full words in the whole genome
    pub possible_words: usize,
    pub words_matched: usize,
    pub queries_used: usize,
    /// Time spent in the lookup loop only
    pub elapsed: Duration,
}

/// Number of failures before the first success in Bernoulli(p) trials
#[derive(Debug, Clone, Copy)]
pub struct GeometricSteps {
    p: f64,
    ln_q: f64,
}

impl GeometricSteps {
    pub fn new(p: f64) -> CoreResult<Self> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(CoreError::InvalidParams(format!(
                "geometric probability must be in (0, 1], got {}",
                p
            )));
        }
        Ok(Self {
            p,
            ln_q: (1.0 - p).ln(),
        })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    /// Draw one step by inverse transform
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        // gen::<f64>() is in [0, 1); flip it so ln never sees zero
        let u: f64 = 1.0 - rng.gen::<f64>();
        let steps = (u.ln() / self.ln_q).floor();
        if steps.is_finite() && steps > 0.0 {
            steps as u64
        } else {
            0
        }
    }
}

fn check_size(size: usize) -> CoreResult<()> {
    if size == 0 {
        return Err(CoreError::InvalidParams("scan size must be positive".to_string()));
    }
    Ok(())
}

fn possible_words(genome_len: usize, word_size: usize) -> usize {
    (genome_len + 1).saturating_sub(word_size)
}

/// Index `genome[..size]` and look up every word of that same prefix
pub fn self_scan(genome: &[u8], size: usize, params: IndexParams) -> CoreResult<ScanStats> {
    check_size(size)?;
    let prefix = &genome[..size.min(genome.len())];
    let index = KmerIndexBuilder::new(params).build(prefix)?;
    debug!("Self scan over {} bp, {} indexed words", prefix.len(), index.len());

    let mut scanner = SeedScanner::new();
    let start = Instant::now();
    let words_matched = scanner.scan_with(&index, prefix, |_| {});
    let elapsed = start.elapsed();

    info!(
        "Self scan of {} bp matched {} words in {:.6}s",
        size,
        words_matched,
        elapsed.as_secs_f64()
    );
    Ok(ScanStats {
        kind: ScanKind::SelfScan,
        size,
        genome_len: genome.len(),
        word_size: params.word_size,
        possible_words: possible_words(genome.len(), params.word_size),
        words_matched,
        queries_used: size,
        elapsed,
    })
}

/// Index `genome[..size]` and scan `size` windows at geometric random offsets.
///
/// Offsets accumulate the drawn steps, wrap modulo `size` and round down to a
/// multiple of `window`. Windows that run past the genome end are skipped.
pub fn random_scan<R: Rng + ?Sized>(
    genome: &[u8],
    size: usize,
    params: IndexParams,
    window: usize,
    steps: GeometricSteps,
    rng: &mut R,
) -> CoreResult<ScanStats> {
    check_size(size)?;
    if window == 0 {
        return Err(CoreError::InvalidParams("window must be positive".to_string()));
    }
    let prefix = &genome[..size.min(genome.len())];
    let index = KmerIndexBuilder::new(params).build(prefix)?;

    let draws: Vec<u64> = (0..size)
        .map(|_| steps.sample(&mut *rng) % size as u64)
        .collect();
    debug!(
        "Random scan over {} bp: {} draws with p = {}",
        prefix.len(),
        draws.len(),
        steps.p()
    );

    let mut scanner = SeedScanner::new();
    let mut words_matched = 0;
    let mut skipped = 0usize;
    let mut cumulative = 0u64;
    let start = Instant::now();
    for step in &draws {
        cumulative = cumulative.wrapping_add(*step);
        let offset = (cumulative % size as u64) as usize / window * window;
        match genome.get(offset..offset + window) {
            Some(sentence) => words_matched += scanner.scan_with(&index, sentence, |_| {}),
            None => skipped += 1,
        }
    }
    let elapsed = start.elapsed();

    info!(
        "Random scan of {} bp matched {} words in {:.6}s ({} short windows skipped)",
        size,
        words_matched,
        elapsed.as_secs_f64(),
        skipped
    );
    Ok(ScanStats {
        kind: ScanKind::Random,
        size,
        genome_len: genome.len(),
        word_size: params.word_size,
        possible_words: possible_words(genome.len(), params.word_size),
        words_matched,
        queries_used: draws.len(),
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const GENOME: &[u8] = b"TTACGATCCA";

    fn params() -> IndexParams {
        IndexParams {
            word_size: 3,
            ..IndexParams::default()
        }
    }

    #[test]
    fn test_self_scan_counts_distinct_words() {
        let stats = self_scan(GENOME, 10, params()).unwrap();
        assert_eq!(stats.kind, ScanKind::SelfScan);
        assert_eq!(stats.words_matched, 8);
        assert_eq!(stats.queries_used, 10);
        assert_eq!(stats.possible_words, 8);

        let stats = self_scan(b"AAAAAAAA", 8, params()).unwrap();
        assert_eq!(stats.words_matched, 1);
    }

    #[test]
    fn test_self_scan_prefix() {
        let stats = self_scan(GENOME, 5, params()).unwrap();
        assert_eq!(stats.words_matched, 3);
        assert_eq!(stats.genome_len, 10);

        // Sizes past the genome end use the whole genome
        let stats = self_scan(GENOME, 1000, params()).unwrap();
        assert_eq!(stats.words_matched, 8);
        assert_eq!(stats.queries_used, 1000);
    }

    #[test]
    fn test_random_scan_certain_steps() {
        // p = 1 never advances, so only the first window is scanned
        let mut rng = StdRng::seed_from_u64(7);
        let steps = GeometricSteps::new(1.0).unwrap();
        let stats = random_scan(GENOME, 10, params(), 6, steps, &mut rng).unwrap();
        assert_eq!(stats.kind, ScanKind::Random);
        assert_eq!(stats.words_matched, 4);
        assert_eq!(stats.queries_used, 10);
    }

    #[test]
    fn test_random_scan_is_reproducible() {
        let genome: Vec<u8> = b"ACGTTGCAAGCTTCGAGGATCCATGCA".repeat(20);
        let steps = GeometricSteps::new(0.05).unwrap();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            random_scan(&genome, 400, params(), 50, steps, &mut rng).unwrap()
        };
        let first = run(42);
        let second = run(42);
        assert_eq!(first.words_matched, second.words_matched);
        assert!(first.words_matched <= 64);
        assert_eq!(first.queries_used, 400);
    }

    #[test]
    fn test_geometric_steps() {
        assert!(GeometricSteps::new(0.0).is_err());
        assert!(GeometricSteps::new(1.5).is_err());
        assert!(GeometricSteps::new(f64::NAN).is_err());

        let steps = GeometricSteps::new(0.05).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let draws: Vec<u64> = (0..2000).map(|_| steps.sample(&mut rng)).collect();
        let mean = draws.iter().sum::<u64>() as f64 / draws.len() as f64;
        // Expected (1 - p) / p = 19
        assert!(mean > 15.0 && mean < 23.0, "mean was {}", mean);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(self_scan(GENOME, 0, params()).is_err());
        let mut rng = StdRng::seed_from_u64(0);
        let steps = GeometricSteps::new(0.5).unwrap();
        assert!(random_scan(GENOME, 0, params(), 6, steps, &mut rng).is_err());
        assert!(random_scan(GENOME, 10, params(), 0, steps, &mut rng).is_err());
    }
}
