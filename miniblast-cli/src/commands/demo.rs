//! Demo command: align two sequences and dump both matrices

use anyhow::{Context, Result};
use miniblast_core::report::{format_alignment, format_score_matrix, format_traceback_matrix};
use miniblast_core::GlobalAligner;

use crate::config::Config;

pub const DEFAULT_SEQ1: &str = "AGCGTATCGCATGCATTCGCGCATAAGCTAG";
pub const DEFAULT_SEQ2: &str = "TCTCTGGAGCGGGCTTCGTATATGCTAAAGC";

pub fn execute(config: &Config, seq1: &str, seq2: &str) -> Result<()> {
    print!("{}", render(config, seq1, seq2)?);
    Ok(())
}

fn render(config: &Config, seq1: &str, seq2: &str) -> Result<String> {
    let aligner = GlobalAligner::new(config.scoring());
    let (alignment, matrix) = aligner
        .align_with_matrix(seq1.as_bytes(), seq2.as_bytes())
        .context("Alignment failed")?;

    let mut out = format!("Score: {}\n", alignment.score);
    out.push_str(&format_alignment(&alignment));
    out.push_str("\nScoring array:\n");
    out.push_str(&format_score_matrix(&matrix));
    out.push_str("Traceback array:\n");
    out.push_str(&format_traceback_matrix(&matrix));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_pair() {
        let text = render(&Config::default(), DEFAULT_SEQ1, DEFAULT_SEQ2).unwrap();
        assert!(text.starts_with(
            "Score: 21\n\
             AG-C-GTATCGCATGCATTCGCGCATAAGCTA--G-\n\
             xx | |x|x||x  || ||||x  |||x||||  | \n\
             TCTCTGGAGCGG--GC-TTCGT--ATATGCTAAAGC\n"
        ));
        assert!(text.contains("Scoring array:\n[\n  [0, -1,"));
        assert!(text.contains("Traceback array:\n[\n  [-, ←,"));
    }

    #[test]
    fn test_custom_scoring_from_config() {
        let mut config = Config::default();
        config.align.match_bonus = 1;
        let text = render(&config, "ACGT", "ACGT").unwrap();
        assert!(text.starts_with("Score: 4\n"));
    }
}
