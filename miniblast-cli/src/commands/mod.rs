//! Command implementations for the miniblast CLI

pub mod bench;
pub mod demo;
pub mod search;

use std::path::Path;

use anyhow::{Context, Result};
use miniblast_core::io::{load_genome, load_queries};
use miniblast_core::{CoreError, Sequence};

use crate::error::{require_file, CliError};

fn input_error(path: &Path, err: CoreError) -> anyhow::Error {
    match err {
        CoreError::Parse(message) => CliError::invalid_format(path.display().to_string(), message).into(),
        other => anyhow::Error::new(other),
    }
}

/// Read a genome file, joining all records
pub fn read_genome(path: &Path) -> Result<Vec<u8>> {
    require_file(path)?;
    let genome = load_genome(path)
        .map_err(|err| input_error(path, err))
        .with_context(|| format!("Failed to load genome from {}", path.display()))?;
    if genome.is_empty() {
        return Err(CliError::validation(format!("genome {} has no sequence data", path.display())).into());
    }
    log::info!("Loaded genome: {} bp from {}", genome.len(), path.display());
    Ok(genome)
}

/// Read a query file, one query per record
pub fn read_queries(path: &Path) -> Result<Vec<Sequence>> {
    require_file(path)?;
    let queries = load_queries(path)
        .map_err(|err| input_error(path, err))
        .with_context(|| format!("Failed to load queries from {}", path.display()))?;
    log::info!("Loaded {} queries from {}", queries.len(), path.display());
    Ok(queries)
}
