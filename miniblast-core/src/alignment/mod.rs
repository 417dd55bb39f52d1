//! Global (Needleman-Wunsch) alignment of seed windows
//!
//! Scores use a linear gap penalty. When several moves reach the same best
//! score the recorded direction is chosen in the fixed order left, up,
//! diagonal, which keeps the traceback path deterministic.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

pub mod traceback;

pub use traceback::{AlignmentMatrix, Direction, TracebackPath, GAP};

/// Linear scoring scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringScheme {
    pub match_bonus: i32,
    pub mismatch_penalty: i32,
    pub gap_penalty: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_bonus: 2,
            mismatch_penalty: -1,
            gap_penalty: -1,
        }
    }
}

impl ScoringScheme {
    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_bonus
        } else {
            self.mismatch_penalty
        }
    }
}

/// Result of aligning two sequences end to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub score: i32,
    pub aligned_seq1: String,
    pub aligned_seq2: String,
    /// Traceback marks: `|` for a matching diagonal step, space otherwise
    pub indicator: String,
}

impl Alignment {
    fn from_path(score: i32, path: TracebackPath) -> Self {
        Self {
            score,
            aligned_seq1: String::from_utf8_lossy(&path.aligned_seq1).into_owned(),
            aligned_seq2: String::from_utf8_lossy(&path.aligned_seq2).into_owned(),
            indicator: String::from_utf8_lossy(&path.indicator).into_owned(),
        }
    }

    /// Number of alignment columns
    pub fn len(&self) -> usize {
        self.aligned_seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_seq1.is_empty()
    }

    /// Column-by-column comparison: `|` match, `x` mismatch, space for a gap
    pub fn midline(&self) -> String {
        self.aligned_seq1
            .bytes()
            .zip(self.aligned_seq2.bytes())
            .map(|(a, b)| match (a, b) {
                (GAP, _) | (_, GAP) => ' ',
                (a, b) if a == b => '|',
                _ => 'x',
            })
            .collect()
    }

    /// First input sequence with gaps removed
    pub fn ungapped_seq1(&self) -> String {
        self.aligned_seq1.chars().filter(|&c| c != GAP as char).collect()
    }

    pub fn ungapped_seq2(&self) -> String {
        self.aligned_seq2.chars().filter(|&c| c != GAP as char).collect()
    }

    pub fn matches(&self) -> usize {
        self.midline().chars().filter(|&c| c == '|').count()
    }

    /// Fraction of columns that are matches
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.matches() as f64 / self.len() as f64
    }
}

/// Stateless global aligner
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalAligner {
    scoring: ScoringScheme,
}

impl GlobalAligner {
    pub fn new(scoring: ScoringScheme) -> Self {
        Self { scoring }
    }

    pub fn scoring(&self) -> &ScoringScheme {
        &self.scoring
    }

    /// Fill the score and direction grids for `seq1` (rows) against `seq2` (columns)
    pub fn fill(&self, seq1: &[u8], seq2: &[u8]) -> AlignmentMatrix {
        let rows = seq1.len() + 1;
        let cols = seq2.len() + 1;
        let gap = self.scoring.gap_penalty;
        let mut matrix = AlignmentMatrix::new(rows, cols);

        for row in 0..rows {
            for col in 0..cols {
                let (score, direction) = if row == 0 && col == 0 {
                    (0, Direction::Start)
                } else if row == 0 {
                    (matrix.score(row, col - 1) + gap, Direction::Left)
                } else if col == 0 {
                    (matrix.score(row - 1, col) + gap, Direction::Up)
                } else {
                    let from_left = matrix.score(row, col - 1) + gap;
                    let from_above = matrix.score(row - 1, col) + gap;
                    let from_diagonal = matrix.score(row - 1, col - 1)
                        + self.scoring.substitution(seq1[row - 1], seq2[col - 1]);
                    let best = from_left.max(from_above).max(from_diagonal);

                    let direction = if best == from_left {
                        Direction::Left
                    } else if best == from_above {
                        Direction::Up
                    } else {
                        Direction::Diagonal
                    };
                    (best, direction)
                };
                matrix.set(row, col, score, direction);
            }
        }

        matrix
    }

    pub fn align(&self, seq1: &[u8], seq2: &[u8]) -> CoreResult<Alignment> {
        let matrix = self.fill(seq1, seq2);
        let path = matrix.traceback(seq1, seq2)?;
        let alignment = Alignment::from_path(matrix.final_score(), path);
        trace!(
            "Aligned {}x{} bp, score {}",
            seq1.len(),
            seq2.len(),
            alignment.score
        );
        Ok(alignment)
    }

    /// Align and also hand back the filled matrix
    pub fn align_with_matrix(
        &self,
        seq1: &[u8],
        seq2: &[u8],
    ) -> CoreResult<(Alignment, AlignmentMatrix)> {
        let matrix = self.fill(seq1, seq2);
        let path = matrix.traceback(seq1, seq2)?;
        Ok((Alignment::from_path(matrix.final_score(), path), matrix))
    }
}

/// Align with the default scoring scheme (+2 match, -1 mismatch, -1 gap)
pub fn align(seq1: &[u8], seq2: &[u8]) -> CoreResult<Alignment> {
    GlobalAligner::default().align(seq1, seq2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction_codes(matrix: &AlignmentMatrix) -> Vec<String> {
        matrix
            .direction_rows()
            .map(|row| {
                row.iter()
                    .map(|d| match d {
                        Direction::Diagonal => 'D',
                        Direction::Up => 'U',
                        Direction::Left => 'L',
                        Direction::Start => '-',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_golden_alignment() {
        let alignment = align(b"GCTGATTC", b"GATCTGATTA").unwrap();
        assert_eq!(alignment.score, 11);
        assert_eq!(alignment.aligned_seq1, "G--CTGATTC");
        assert_eq!(alignment.aligned_seq2, "GATCTGATTA");
        assert_eq!(alignment.indicator, "|  |||||| ");
        assert_eq!(alignment.midline(), "|  ||||||x");
        assert_eq!(alignment.matches(), 7);
    }

    #[test]
    fn test_golden_traceback_matrix() {
        let (_, matrix) = GlobalAligner::default()
            .align_with_matrix(b"GCTGATTC", b"GATCTGATTA")
            .unwrap();
        assert_eq!(matrix.rows(), 9);
        assert_eq!(matrix.cols(), 11);
        assert_eq!(
            direction_codes(&matrix),
            vec![
                "-LLLLLLLLLL",
                "UDLLLLLLLLL",
                "UUDLDLLLLLL",
                "UUUDLDLLLLL",
                "UUUUDUDLLLL",
                "UUDUUUUDLLL",
                "UUUDLDUUDLL",
                "UUUUDDLUUDL",
                "UUUUDLDUUUD",
            ]
        );
        let last: Vec<i32> = matrix.score_rows().last().unwrap().to_vec();
        assert_eq!(last, vec![-8, -5, -2, 1, 4, 3, 3, 5, 8, 11, 11]);
    }

    #[test]
    fn test_swapped_golden_alignment() {
        let alignment = align(b"GATCTGATTA", b"GCTGATTC").unwrap();
        assert_eq!(alignment.score, 11);
        assert_eq!(alignment.aligned_seq1, "GATCTGATTA");
        assert_eq!(alignment.aligned_seq2, "G--CTGATTC");
    }

    #[test]
    fn test_demo_pair() {
        let alignment = align(
            b"AGCGTATCGCATGCATTCGCGCATAAGCTAG",
            b"TCTCTGGAGCGGGCTTCGTATATGCTAAAGC",
        )
        .unwrap();
        assert_eq!(alignment.score, 21);
        assert_eq!(alignment.aligned_seq1, "AG-C-GTATCGCATGCATTCGCGCATAAGCTA--G-");
        assert_eq!(alignment.aligned_seq2, "TCTCTGGAGCGG--GC-TTCGT--ATATGCTAAAGC");
        assert_eq!(alignment.midline(), "xx | |x|x||x  || ||||x  |||x||||  | ");
        assert_eq!(alignment.ungapped_seq1(), "AGCGTATCGCATGCATTCGCGCATAAGCTAG");
        assert_eq!(alignment.ungapped_seq2(), "TCTCTGGAGCGGGCTTCGTATATGCTAAAGC");
    }

    #[test]
    fn test_left_wins_ties() {
        let alignment = align(b"ATGGT", b"ATGGAT").unwrap();
        assert_eq!(alignment.score, 9);
        assert_eq!(alignment.aligned_seq1, "ATGG-T");
        assert_eq!(alignment.aligned_seq2, "ATGGAT");
    }

    #[test]
    fn test_identical_sequences() {
        let alignment = align(b"ACGT", b"ACGT").unwrap();
        assert_eq!(alignment.score, 8);
        assert_eq!(alignment.midline(), "||||");
        assert_eq!(alignment.identity(), 1.0);
    }

    #[test]
    fn test_empty_sequences() {
        let alignment = align(b"", b"ACG").unwrap();
        assert_eq!(alignment.score, -3);
        assert_eq!(alignment.aligned_seq1, "---");
        assert_eq!(alignment.aligned_seq2, "ACG");
        assert_eq!(alignment.midline(), "   ");

        let alignment = align(b"AC", b"").unwrap();
        assert_eq!(alignment.score, -2);
        assert_eq!(alignment.aligned_seq1, "AC");
        assert_eq!(alignment.aligned_seq2, "--");

        let alignment = align(b"", b"").unwrap();
        assert_eq!(alignment.score, 0);
        assert!(alignment.is_empty());
        assert_eq!(alignment.identity(), 0.0);
    }

    #[test]
    fn test_custom_scoring() {
        let aligner = GlobalAligner::new(ScoringScheme {
            match_bonus: 1,
            mismatch_penalty: -3,
            gap_penalty: -1,
        });
        // A mismatch costs more than a pair of gaps
        let alignment = aligner.align(b"A", b"C").unwrap();
        assert_eq!(alignment.score, -2);
        assert_eq!(alignment.aligned_seq1, "A-");
        assert_eq!(alignment.aligned_seq2, "-C");
        assert_eq!(aligner.scoring().match_bonus, 1);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let alignment = align(b"acgt", b"ACGT").unwrap();
        assert_eq!(alignment.matches(), 0);
    }
}
