//! Search command: seed queries against a genome and align around each seed

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use miniblast_core::report::{format_hit, format_search_summary};
use miniblast_core::{SearchReport, SeedSearcher};

use super::{read_genome, read_queries};
use crate::config::Config;

pub fn execute(config: &Config, genome: PathBuf, queries: PathBuf, json: bool, quiet: bool) -> Result<()> {
    log::info!("Genome: {}", genome.display());
    log::info!("Queries: {}", queries.display());

    let genome_seq = read_genome(&genome)?;
    let query_seqs = read_queries(&queries)?;

    let mut searcher = SeedSearcher::build(
        &genome_seq,
        config.index_params(),
        config.scoring(),
        config.search_params(),
    )
    .context("Failed to build the genome index")?;
    log::info!(
        "Indexed {} distinct {}-mers",
        searcher.index().len(),
        searcher.index().word_size()
    );

    let bar = if json || quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(query_seqs.len() as u64)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries")?,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut report = SearchReport::default();
    for query in &query_seqs {
        let hits = searcher
            .search(query)
            .with_context(|| format!("Failed to search query {}", query.id))?;
        if !json {
            for hit in &hits {
                bar.suspend(|| writeln!(out, "{}", format_hit(hit)))?;
            }
        }
        report.hits.extend(hits);
        bar.inc(1);
    }
    bar.finish_and_clear();
    report.summary = searcher.summary().clone();

    if json {
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to write JSON report")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", format_search_summary(&report.summary))?;
    }

    log::info!(
        "Search finished in {:.3}s: {} hits, {} perfect",
        report.summary.elapsed.as_secs_f64(),
        report.hits.len(),
        report.summary.perfect_hits
    );
    Ok(())
}
