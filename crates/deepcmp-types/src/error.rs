use thiserror::Error;

/// Errors produced by value model operations.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("field '{field}' does not exist on {type_name}")]
    FieldNotFound { type_name: String, field: String },

    #[error("{0} values have no fields")]
    NotAnObject(String),

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Convenience result alias for value model operations.
pub type TypeResult<T> = Result<T, TypeError>;
