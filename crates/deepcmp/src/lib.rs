//! Recursive field-by-field comparison of object graphs.
//!
//! Provides a single entry point over the deepcmp crates: build a
//! [`RecursiveComparisonConfig`], hand it to a [`RecursiveComparison`] and
//! compare values. The resulting [`ComparisonReport`] tells whether the
//! values are equivalent and explains every difference.

pub mod comparison;
pub mod error;
pub mod report;

pub use comparison::RecursiveComparison;
pub use error::{DeepCmpError, DeepCmpResult};
pub use report::{ComparisonReport, ReportSummary};

// Re-export key types
pub use deepcmp_compare::{
    determine_differences, Comparator, ComparatorError, CompareError, CompareResult, ComparingFields,
    ComparingNormalizedFields, ComparingProperties, ComparingSnakeOrCamelCaseFields, ComparisonDifference,
    DifferenceCalculator, DifferenceSummary, DualValue, IntrospectionStrategy, RecursiveComparisonConfig,
    RecursiveComparisonConfigBuilder,
};
pub use deepcmp_diff::{DiffRow, DiffRowGenerator, Patch};
pub use deepcmp_types::{
    FieldLocation, Object, PathPattern, Representation, StandardRepresentation, TypeInfo, Value, ValueKind,
};
