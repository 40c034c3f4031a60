//! Recursive comparison engine.
//!
//! Compares two [`Value`](deepcmp_types::Value) graphs field by field under a
//! [`RecursiveComparisonConfig`] and reports every place where they diverge
//! as a path-tagged [`ComparisonDifference`]. Graphs may be cyclic and may
//! mix unrelated types; the walk always terminates.
//!
//! # Key Types
//!
//! - [`DifferenceCalculator`] -- Worklist-driven walk producing sorted differences
//! - [`RecursiveComparisonConfig`] -- Policy: ignores, compare-only rules, ordering, comparators, messages
//! - [`DualValue`] -- An actual/expected pair at one location
//! - [`ComparisonDifference`] -- One reported divergence and its rendering
//! - [`IntrospectionStrategy`] -- How children of composite values are discovered and read
//! - [`Comparator`] -- Custom equivalence for fields and types

pub mod calculator;
pub mod comparator;
pub mod config;
pub mod difference;
pub mod dual_value;
pub mod error;
pub mod introspection;
pub mod queue;
pub mod visited;

pub use calculator::{determine_differences, DifferenceCalculator};
pub use comparator::{Comparator, ComparatorError};
pub use config::{
    FieldComparators, FieldHolder, FieldMessages, RecursiveComparisonConfig, RecursiveComparisonConfigBuilder,
    TypeComparators, TypeMessages,
};
pub use difference::{ComparisonDifference, DifferenceSummary, KeyMismatch};
pub use dual_value::DualValue;
pub use error::{CompareError, CompareResult};
pub use introspection::{
    ComparingFields, ComparingNormalizedFields, ComparingProperties, ComparingSnakeOrCamelCaseFields,
    FieldNameNormalizer, IntrospectionStrategy, SnakeToCamelCase,
};
pub use queue::DualValueQueue;
pub use visited::VisitedDualValues;
