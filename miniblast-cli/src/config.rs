//! Configuration handling for the miniblast CLI
//!
//! Settings come from `miniblast.toml` (or `--config`), every field defaulted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use miniblast_core::{IndexParams, ScoringScheme, SearchParams};

use crate::error::{CliError, CliResult};

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "miniblast.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub align: AlignConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub bench: BenchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Fixed word length used for indexing and seeding
    #[serde(default = "default_word_size")]
    pub word_size: usize,

    /// Buckets allocated before the first growth
    #[serde(default = "default_initial_buckets")]
    pub initial_buckets: usize,

    /// Entries per bucket before the table doubles
    #[serde(default = "default_max_load_factor")]
    pub max_load_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    #[serde(default = "default_match_bonus")]
    pub match_bonus: i32,

    #[serde(default = "default_mismatch_penalty")]
    pub mismatch_penalty: i32,

    #[serde(default = "default_gap_penalty")]
    pub gap_penalty: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Genome window aligned around each seed
    #[serde(default = "default_window")]
    pub window: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Prefix lengths timed by the bench commands
    #[serde(default = "default_sizes")]
    pub sizes: Vec<usize>,

    /// Success probability of the geometric step distribution
    #[serde(default = "default_geometric_p")]
    pub geometric_p: f64,

    /// Fixed RNG seed; entropy when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

// Default value functions
fn default_word_size() -> usize { miniblast_core::DEFAULT_WORD_SIZE }
fn default_initial_buckets() -> usize { 1 << 20 }
fn default_max_load_factor() -> f32 { 1.0 }
fn default_match_bonus() -> i32 { 2 }
fn default_mismatch_penalty() -> i32 { -1 }
fn default_gap_penalty() -> i32 { -1 }
fn default_window() -> usize { miniblast_core::DEFAULT_WINDOW }
fn default_sizes() -> Vec<usize> { vec![10_000, 100_000, 1_000_000] }
fn default_geometric_p() -> f64 { 0.05 }

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            word_size: default_word_size(),
            initial_buckets: default_initial_buckets(),
            max_load_factor: default_max_load_factor(),
        }
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            match_bonus: default_match_bonus(),
            mismatch_penalty: default_mismatch_penalty(),
            gap_penalty: default_gap_penalty(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            geometric_p: default_geometric_p(),
            seed: None,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).map_err(CliError::from)?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.index.word_size == 0 {
            return Err(CliError::config("index.word_size must be positive"));
        }
        if self.index.initial_buckets == 0 {
            return Err(CliError::config("index.initial_buckets must be positive"));
        }
        if !(self.index.max_load_factor.is_finite() && self.index.max_load_factor > 0.0) {
            return Err(CliError::config(format!(
                "index.max_load_factor must be positive, got {}",
                self.index.max_load_factor
            )));
        }
        if self.search.window < self.index.word_size {
            return Err(CliError::config(format!(
                "search.window ({}) must be at least index.word_size ({})",
                self.search.window, self.index.word_size
            )));
        }
        if !(self.bench.geometric_p > 0.0 && self.bench.geometric_p <= 1.0) {
            return Err(CliError::config(format!(
                "bench.geometric_p must be in (0, 1], got {}",
                self.bench.geometric_p
            )));
        }
        if self.bench.sizes.iter().any(|&size| size == 0) {
            return Err(CliError::config("bench.sizes must all be positive"));
        }
        Ok(())
    }

    pub fn index_params(&self) -> IndexParams {
        IndexParams {
            word_size: self.index.word_size,
            initial_buckets: self.index.initial_buckets,
            max_load_factor: self.index.max_load_factor,
        }
    }

    pub fn scoring(&self) -> ScoringScheme {
        ScoringScheme {
            match_bonus: self.align.match_bonus,
            mismatch_penalty: self.align.mismatch_penalty,
            gap_penalty: self.align.gap_penalty,
        }
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            window: self.search.window,
        }
    }
}
