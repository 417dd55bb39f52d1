use serde::{Deserialize, Serialize};

/// Genome coordinate as recorded in the k-mer index.
///
/// Signed because the index stores `start - word_size` for every word, which
/// is negative for the first few offsets of a genome.
pub type Position = i64;

/// Word length used for seeding unless configured otherwise
pub const DEFAULT_WORD_SIZE: usize = 11;

/// Length of the genome window aligned around a seed
pub const DEFAULT_WINDOW: usize = 50;

/// A named nucleotide sequence loaded from FASTA/FASTQ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub data: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Iterate over every full-length word of `sequence` with its start offset.
///
/// Trailing substrings shorter than `word_size` are never produced.
pub fn words(sequence: &[u8], word_size: usize) -> impl Iterator<Item = (usize, &[u8])> {
    let count = if word_size == 0 || sequence.len() < word_size {
        0
    } else {
        sequence.len() - word_size + 1
    };
    sequence.windows(word_size.max(1)).take(count).enumerate()
}
