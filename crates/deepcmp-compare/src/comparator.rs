//! Custom equivalence rules registered on fields and types.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use deepcmp_types::Value;

/// Failure of a custom comparator, typically handed values it cannot handle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComparatorError {
    #[error("cannot compare {actual} with {expected}")]
    Incompatible { actual: String, expected: String },

    #[error("{0}")]
    Failed(String),
}

impl ComparatorError {
    /// The comparator does not support the types of the given values.
    pub fn incompatible(actual: &Value, expected: &Value) -> Self {
        Self::Incompatible {
            actual: actual.type_name().unwrap_or("null").to_string(),
            expected: expected.type_name().unwrap_or("null").to_string(),
        }
    }
}

type CompareFn = dyn Fn(&Value, &Value) -> Result<Ordering, ComparatorError> + Send + Sync;

/// A named comparison function. `Ordering::Equal` means the values are
/// equivalent, any other ordering means they differ.
#[derive(Clone)]
pub struct Comparator {
    compare: Arc<CompareFn>,
    description: String,
}

impl Comparator {
    pub fn new<F>(description: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Ordering, ComparatorError> + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(compare),
            description: description.into(),
        }
    }

    /// Adapt an equality predicate: `true` maps to `Equal`, `false` to
    /// `Greater`.
    pub fn from_equals<P>(description: impl Into<String>, equals: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self::new(description, move |actual, expected| {
            Ok(if equals(actual, expected) {
                Ordering::Equal
            } else {
                Ordering::Greater
            })
        })
    }

    pub fn compare(&self, actual: &Value, expected: &Value) -> Result<Ordering, ComparatorError> {
        (self.compare)(actual, expected)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Comparator").field(&self.description).finish()
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}
