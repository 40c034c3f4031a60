//! Error types for the diff crate.

/// Errors that can occur while applying a patch.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// The text a delta expects at its position is not there.
    #[error("incorrect chunk at line {line}: expected {expected:?}, found {found:?}")]
    ChunkMismatch {
        line: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A delta points past the end of the text it is applied to.
    #[error("delta at line {line} is out of bounds for a text of {len} lines")]
    OutOfBounds { line: usize, len: usize },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
