use std::fmt;

use deepcmp_types::TypeError;

/// Errors raised by a misused configuration or a failing introspection.
///
/// Data mismatches are never errors; they are reported as
/// [`ComparisonDifference`](crate::ComparisonDifference)s.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Compare-only fields name fields the actual value does not have.
    #[error("The following fields don't exist: {0}")]
    UnknownComparedFields(String),

    /// A field could not be read by the introspection strategy.
    #[error("introspection error: {0}")]
    Introspection(String),

    /// Value model error (invalid pattern, missing field).
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl CompareError {
    pub fn introspection(message: impl Into<String>) -> Self {
        Self::Introspection(message.into())
    }
}

impl PartialEq for CompareError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

/// Convenience result alias for comparison operations.
pub type CompareResult<T> = Result<T, CompareError>;
