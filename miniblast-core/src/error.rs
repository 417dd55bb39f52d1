//! Error types shared by the index, the aligner and the IO helpers

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while indexing, searching or aligning
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Malformed alignment state at ({row}, {col}): {reason}")]
    MalformedAlignmentState {
        row: usize,
        col: usize,
        reason: String,
    },

    #[error("Invalid word length: expected {expected}, got {actual}")]
    InvalidWordLength { expected: usize, actual: usize },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CoreError {
    pub fn key_not_found(word: &[u8]) -> Self {
        Self::KeyNotFound(String::from_utf8_lossy(word).into_owned())
    }

    pub fn malformed<S: Into<String>>(row: usize, col: usize, reason: S) -> Self {
        Self::MalformedAlignmentState {
            row,
            col,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::key_not_found(b"ACGT");
        assert_eq!(err.to_string(), "Key not found: ACGT");

        let err = CoreError::malformed(3, 4, "start marker away from origin");
        assert_eq!(
            err.to_string(),
            "Malformed alignment state at (3, 4): start marker away from origin"
        );

        let err = CoreError::InvalidWordLength { expected: 11, actual: 7 };
        assert!(err.to_string().contains("expected 11"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
