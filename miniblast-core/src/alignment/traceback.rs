//! Score/traceback matrices and alignment reconstruction

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Gap character in aligned output
pub const GAP: u8 = b'-';

/// Origin of the best score in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Match or mismatch, from (row-1, col-1)
    Diagonal,
    /// Gap in the second sequence, from (row-1, col)
    Up,
    /// Gap in the first sequence, from (row, col-1)
    Left,
    /// Origin cell
    Start,
}

impl Direction {
    pub fn arrow(self) -> char {
        match self {
            Direction::Diagonal => '↖',
            Direction::Up => '↑',
            Direction::Left => '←',
            Direction::Start => '-',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arrow())
    }
}

/// Row-major grid of scores with a parallel grid of directions.
///
/// Row 0 and column 0 are the all-gap boundary, so a matrix for sequences of
/// lengths `n` and `m` has `n + 1` rows and `m + 1` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    rows: usize,
    cols: usize,
    scores: Vec<i32>,
    directions: Vec<Direction>,
}

/// Aligned sequences read back from a traceback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracebackPath {
    pub aligned_seq1: Vec<u8>,
    pub aligned_seq2: Vec<u8>,
    /// `|` where the diagonal step matched, space otherwise
    pub indicator: Vec<u8>,
}

impl AlignmentMatrix {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            scores: vec![0; rows * cols],
            directions: vec![Direction::Start; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn score(&self, row: usize, col: usize) -> i32 {
        self.scores[row * self.cols + col]
    }

    #[inline]
    pub fn direction(&self, row: usize, col: usize) -> Direction {
        self.directions[row * self.cols + col]
    }

    /// Score of the bottom-right cell
    pub fn final_score(&self) -> i32 {
        self.score(self.rows - 1, self.cols - 1)
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, score: i32, direction: Direction) {
        let idx = row * self.cols + col;
        self.scores[idx] = score;
        self.directions[idx] = direction;
    }

    pub fn score_rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.scores.chunks(self.cols)
    }

    pub fn direction_rows(&self) -> impl Iterator<Item = &[Direction]> + '_ {
        self.directions.chunks(self.cols)
    }

    /// Follow directions from the bottom-right cell back to the origin.
    ///
    /// Fails when the matrix does not belong to these sequences or when a
    /// direction points outside the grid.
    pub fn traceback(&self, seq1: &[u8], seq2: &[u8]) -> CoreResult<TracebackPath> {
        if seq1.len() + 1 != self.rows || seq2.len() + 1 != self.cols {
            return Err(CoreError::malformed(
                self.rows,
                self.cols,
                format!(
                    "matrix is {}x{} but sequences of lengths {} and {} need {}x{}",
                    self.rows,
                    self.cols,
                    seq1.len(),
                    seq2.len(),
                    seq1.len() + 1,
                    seq2.len() + 1
                ),
            ));
        }

        let mut row = seq1.len();
        let mut col = seq2.len();
        let capacity = row + col;
        let mut aligned_seq1 = Vec::with_capacity(capacity);
        let mut aligned_seq2 = Vec::with_capacity(capacity);
        let mut indicator = Vec::with_capacity(capacity);

        loop {
            match self.direction(row, col) {
                Direction::Start => {
                    if row == 0 && col == 0 {
                        break;
                    }
                    return Err(CoreError::malformed(row, col, "start marker away from the origin"));
                }
                Direction::Up => {
                    if row == 0 {
                        return Err(CoreError::malformed(row, col, "up marker in the first row"));
                    }
                    aligned_seq1.push(seq1[row - 1]);
                    aligned_seq2.push(GAP);
                    indicator.push(b' ');
                    row -= 1;
                }
                Direction::Left => {
                    if col == 0 {
                        return Err(CoreError::malformed(row, col, "left marker in the first column"));
                    }
                    aligned_seq1.push(GAP);
                    aligned_seq2.push(seq2[col - 1]);
                    indicator.push(b' ');
                    col -= 1;
                }
                Direction::Diagonal => {
                    if row == 0 || col == 0 {
                        return Err(CoreError::malformed(row, col, "diagonal marker on the boundary"));
                    }
                    let a = seq1[row - 1];
                    let b = seq2[col - 1];
                    aligned_seq1.push(a);
                    aligned_seq2.push(b);
                    indicator.push(if a == b { b'|' } else { b' ' });
                    row -= 1;
                    col -= 1;
                }
            }
        }

        aligned_seq1.reverse();
        aligned_seq2.reverse();
        indicator.reverse();

        Ok(TracebackPath {
            aligned_seq1,
            aligned_seq2,
            indicator,
        })
    }
}
