//! Plain-text rendering of alignments, search hits and scan results

use std::fmt::Write;

use crate::alignment::{Alignment, AlignmentMatrix};
use crate::seed::{ScanStats, SearchHit, SearchSummary};

/// Three-line alignment block: first sequence, midline, second sequence
pub fn format_alignment(alignment: &Alignment) -> String {
    format!(
        "{}\n{}\n{}\n",
        alignment.aligned_seq1,
        alignment.midline(),
        alignment.aligned_seq2
    )
}

/// Report block for one extended seed
pub fn format_hit(hit: &SearchHit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", hit.genome_window, hit.query);
    let _ = writeln!(out, "Genome location for best hit: {}", hit.genome_offset);
    let _ = writeln!(out, "Score: {}", hit.alignment.score);
    out.push_str(&format_alignment(&hit.alignment));
    out
}

pub fn format_search_summary(summary: &SearchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Queries searched: {}", summary.queries);
    let _ = writeln!(out, "Seeds found: {}", summary.seeds);
    let _ = writeln!(out, "Alignments: {}", summary.alignments);
    let _ = writeln!(out, "Perfect hits: {}", summary.perfect_hits);
    out
}

fn format_rows<T, I, F>(rows: I, mut cell: F) -> String
where
    I: Iterator<Item = T>,
    F: FnMut(T) -> Vec<String>,
{
    let mut out = String::from("[\n");
    for row in rows {
        let _ = writeln!(out, "  [{}]", cell(row).join(", "));
    }
    out.push_str("]\n");
    out
}

/// Score grid, one bracketed row per line
pub fn format_score_matrix(matrix: &AlignmentMatrix) -> String {
    format_rows(matrix.score_rows(), |row| {
        row.iter().map(|score| score.to_string()).collect()
    })
}

/// Direction grid drawn with arrows, `-` at the origin
pub fn format_traceback_matrix(matrix: &AlignmentMatrix) -> String {
    format_rows(matrix.direction_rows(), |row| {
        row.iter().map(|direction| direction.to_string()).collect()
    })
}

pub fn format_scan(stats: &ScanStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Number of characters in the genome: {}", stats.genome_len);
    let _ = writeln!(
        out,
        "Number of {} character fragments possible: {}",
        stats.word_size, stats.possible_words
    );
    let _ = writeln!(out, "Time taken: {:.6} sec", stats.elapsed.as_secs_f64());
    let _ = writeln!(
        out,
        "Total {} fragments matched: {}",
        stats.word_size, stats.words_matched
    );
    let _ = writeln!(out, "Total queries used: {}", stats.queries_used);
    out
}

/// Human label for a scan size: 10K, 100K, 1M, or the plain number
pub fn size_label(size: usize) -> String {
    if size >= 1_000_000 && size % 1_000_000 == 0 {
        format!("{}M", size / 1_000_000)
    } else if size >= 1_000 && size % 1_000 == 0 {
        format!("{}K", size / 1_000)
    } else {
        size.to_string()
    }
}
