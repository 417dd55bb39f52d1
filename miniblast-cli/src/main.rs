use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "miniblast")]
#[command(about = "miniblast - k-mer seed search with global alignment")]
#[command(version)]
#[command(long_about = "
miniblast indexes every fixed-length word of a genome, finds query words in
that index and extends each seed into a Needleman-Wunsch global alignment.

Examples:
  miniblast search --genome genome.fa --queries reads.fa
  miniblast search --genome genome.fa.gz --queries reads.fa --json > hits.json
  miniblast bench self --genome genome.fa --sizes 10000,100000
  miniblast bench random --genome genome.fa --seed 42
  miniblast demo --seq1 GCTGATTC --seq2 GATCTGATTA
  miniblast config --example --out miniblast.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed queries against a genome and align around every seed
    Search {
        /// Genome sequence file (FASTA/FASTQ, optionally .gz)
        #[arg(long, required = true)]
        genome: PathBuf,

        /// Query sequence file, one query per record
        #[arg(long, required = true)]
        queries: PathBuf,

        /// Write hits and counters as JSON instead of text blocks
        #[arg(long)]
        json: bool,
    },

    /// Time index lookups over genome prefixes
    Bench {
        #[command(subcommand)]
        mode: BenchMode,
    },

    /// Align two sequences and print the score and traceback matrices
    Demo {
        /// First sequence (matrix rows)
        #[arg(long, default_value = commands::demo::DEFAULT_SEQ1)]
        seq1: String,

        /// Second sequence (matrix columns)
        #[arg(long, default_value = commands::demo::DEFAULT_SEQ2)]
        seq2: String,
    },

    /// Show configuration
    Config {
        /// Print an example miniblast.toml with default values
        #[arg(long)]
        example: bool,

        /// Write the configuration to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum BenchMode {
    /// Look up every word of each indexed prefix
    #[command(name = "self")]
    SelfScan {
        /// Genome sequence file
        #[arg(long, required = true)]
        genome: PathBuf,

        /// Prefix lengths to time (defaults to bench.sizes)
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,
    },

    /// Look up windows at geometric random offsets
    Random {
        /// Genome sequence file
        #[arg(long, required = true)]
        genome: PathBuf,

        /// Prefix lengths to time (defaults to bench.sizes)
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,

        /// RNG seed for reproducible offsets
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Search { genome, queries, json } => {
            commands::search::execute(&config, genome, queries, json, cli.quiet)?;
        }

        Commands::Bench { mode } => match mode {
            BenchMode::SelfScan { genome, sizes } => {
                commands::bench::execute_self(&config, genome, sizes)?;
            }
            BenchMode::Random { genome, sizes, seed } => {
                commands::bench::execute_random(&config, genome, sizes, seed)?;
            }
        },

        Commands::Demo { seq1, seq2 } => {
            commands::demo::execute(&config, &seq1, &seq2)?;
        }

        Commands::Config { example, out } => {
            let shown = if example { Config::default() } else { config };
            match out {
                Some(path) => {
                    shown.save_to_file(&path)?;
                    log::info!("Wrote configuration to {}", path.display());
                }
                None if example => print!("{}", Config::example_toml()?),
                None => print!("{}", toml::to_string_pretty(&shown).map_err(CliError::from)?),
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
