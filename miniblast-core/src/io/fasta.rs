//! FASTA/FASTQ loading for genomes and query sets
//!
//! Parsing is done by needletail; `.gz` inputs are decompressed with flate2
//! before they reach the parser.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;
use needletail::parse_fastx_reader;
use needletail::parser::SequenceRecord;

use crate::error::{CoreError, CoreResult};
use crate::types::Sequence;

/// FASTA/FASTQ parser producing one [`Sequence`] per record
pub struct FastaParser;

impl FastaParser {
    /// Parse a FASTA/FASTQ file, gzipped when the name ends in `.gz`
    pub fn parse_file<P: AsRef<Path>>(path: P) -> CoreResult<Vec<Sequence>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let sequences = if path.to_string_lossy().ends_with(".gz") {
            Self::parse_reader(BufReader::new(GzDecoder::new(file)))?
        } else {
            Self::parse_reader(BufReader::new(file))?
        };
        debug!("Read {} records from {}", sequences.len(), path.display());
        Ok(sequences)
    }

    /// Parse FASTA/FASTQ data from any readable source
    pub fn parse_reader<R: Read + Send>(reader: R) -> CoreResult<Vec<Sequence>> {
        let mut fastx_reader =
            parse_fastx_reader(reader).map_err(|e| CoreError::Parse(e.to_string()))?;

        let mut sequences = Vec::new();
        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| CoreError::Parse(e.to_string()))?;
            sequences.push(Self::record_to_sequence(&record));
        }

        if sequences.is_empty() {
            return Err(CoreError::Parse("no sequences found".to_string()));
        }
        Ok(sequences)
    }

    /// Record id is the header up to the first whitespace
    fn record_to_sequence(record: &SequenceRecord) -> Sequence {
        let header = String::from_utf8_lossy(record.id());
        let id = header.split_whitespace().next().unwrap_or_default().to_string();
        Sequence::new(id, record.seq().to_vec())
    }
}

/// Load a genome: the bodies of all records joined end to end
pub fn load_genome<P: AsRef<Path>>(path: P) -> CoreResult<Vec<u8>> {
    let sequences = FastaParser::parse_file(path)?;
    Ok(concatenate(&sequences))
}

/// Load a query set, one query per record
pub fn load_queries<P: AsRef<Path>>(path: P) -> CoreResult<Vec<Sequence>> {
    FastaParser::parse_file(path)
}

pub fn concatenate(sequences: &[Sequence]) -> Vec<u8> {
    let total = sequences.iter().map(Sequence::len).sum();
    let mut genome = Vec::with_capacity(total);
    for sequence in sequences {
        genome.extend_from_slice(sequence.as_bytes());
    }
    genome
}

/// Basic composition of a set of sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceStatistics {
    pub total_sequences: usize,
    pub total_length: usize,
    pub min_length: usize,
    pub max_length: usize,
    /// Percentage of G/C among unambiguous bases
    pub gc_content: f64,
}

impl SequenceStatistics {
    pub fn from_sequences(sequences: &[Sequence]) -> Self {
        let mut stats = Self::default();
        if sequences.is_empty() {
            return stats;
        }

        let mut gc = 0u64;
        let mut at = 0u64;
        stats.min_length = usize::MAX;
        for sequence in sequences {
            stats.total_sequences += 1;
            stats.total_length += sequence.len();
            stats.min_length = stats.min_length.min(sequence.len());
            stats.max_length = stats.max_length.max(sequence.len());
            for &base in sequence.as_bytes() {
                match base.to_ascii_uppercase() {
                    b'G' | b'C' => gc += 1,
                    b'A' | b'T' | b'U' => at += 1,
                    _ => {}
                }
            }
        }
        if gc + at > 0 {
            stats.gc_content = gc as f64 / (gc + at) as f64 * 100.0;
        }
        stats
    }
}
