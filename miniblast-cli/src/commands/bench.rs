//! Bench commands: time index lookups over genome prefixes

use std::path::PathBuf;

use anyhow::{Context, Result};
use miniblast_core::report::{format_scan, size_label};
use miniblast_core::seed::{random_scan, self_scan, GeometricSteps, ScanStats};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::read_genome;
use crate::config::Config;
use crate::error::CliError;

fn resolve_sizes(config: &Config, sizes: Option<Vec<usize>>) -> Result<Vec<usize>> {
    let sizes = sizes.unwrap_or_else(|| config.bench.sizes.clone());
    if sizes.is_empty() || sizes.contains(&0) {
        return Err(CliError::validation("bench sizes must be a non-empty list of positive lengths").into());
    }
    Ok(sizes)
}

fn print_run(title: &str, stats: &ScanStats) {
    println!("\n{} {}", title, size_label(stats.size));
    print!("{}", format_scan(stats));
}

/// Index each prefix and look up all of its own words
pub fn execute_self(config: &Config, genome: PathBuf, sizes: Option<Vec<usize>>) -> Result<()> {
    let sizes = resolve_sizes(config, sizes)?;
    let genome_seq = read_genome(&genome)?;

    for size in sizes {
        let stats = self_scan(&genome_seq, size, config.index_params())
            .with_context(|| format!("Self scan of {} bp failed", size))?;
        print_run("Self scan", &stats);
    }
    Ok(())
}

/// Index each prefix and look up windows at geometric random offsets
pub fn execute_random(
    config: &Config,
    genome: PathBuf,
    sizes: Option<Vec<usize>>,
    seed: Option<u64>,
) -> Result<()> {
    let sizes = resolve_sizes(config, sizes)?;
    let genome_seq = read_genome(&genome)?;
    let steps = GeometricSteps::new(config.bench.geometric_p)?;

    let mut rng = match seed.or(config.bench.seed) {
        Some(s) => {
            log::info!("Using RNG seed {}", s);
            StdRng::seed_from_u64(s)
        }
        None => StdRng::from_entropy(),
    };

    for size in sizes {
        let stats = random_scan(
            &genome_seq,
            size,
            config.index_params(),
            config.search.window,
            steps,
            &mut rng,
        )
        .with_context(|| format!("Random scan of {} bp failed", size))?;
        print_run("Random scan", &stats);
    }
    Ok(())
}
