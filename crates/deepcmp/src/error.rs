use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeepCmpError {
    /// The compared values are not equivalent. Holds the full report.
    #[error("{0}")]
    NotEquivalent(String),

    #[error("comparison error: {0}")]
    Compare(#[from] deepcmp_compare::CompareError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DeepCmpResult<T> = Result<T, DeepCmpError>;
