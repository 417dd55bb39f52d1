//! Sequence input for miniblast

pub mod fasta;

pub use fasta::{concatenate, load_genome, load_queries, FastaParser, SequenceStatistics};
