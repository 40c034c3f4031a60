//! Entry point for running recursive comparisons.

use deepcmp_compare::{CompareResult, DifferenceCalculator, RecursiveComparisonConfig};
use deepcmp_types::Value;
use tracing::{debug, info};

use crate::error::{DeepCmpError, DeepCmpResult};
use crate::report::ComparisonReport;

/// Runs comparisons under one configuration.
///
/// The configuration is only read while comparing, so a single
/// `RecursiveComparison` can be shared by reference across threads.
#[derive(Clone, Debug, Default)]
pub struct RecursiveComparison {
    config: RecursiveComparisonConfig,
}

impl RecursiveComparison {
    pub fn new(config: RecursiveComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecursiveComparisonConfig {
        &self.config
    }

    /// Compare `actual` against `expected`.
    ///
    /// Differences are part of the report; an error means the comparison
    /// could not run (unknown compare-only fields, unreadable fields).
    pub fn compare(&self, actual: &Value, expected: &Value) -> CompareResult<ComparisonReport<'_>> {
        let differences = DifferenceCalculator::new(&self.config).determine_differences(actual, expected)?;
        debug!(differences = differences.len(), "comparison report ready");
        Ok(ComparisonReport::new(
            actual.clone(),
            expected.clone(),
            differences,
            &self.config,
        ))
    }

    /// Like [`compare`](Self::compare), failing with the rendered report
    /// when the values are not equivalent.
    pub fn assert_equivalent(&self, actual: &Value, expected: &Value) -> DeepCmpResult<()> {
        let report = self.compare(actual, expected)?;
        if report.is_equivalent() {
            return Ok(());
        }
        info!(
            differences = report.differences().len(),
            "values are not recursively equivalent"
        );
        Err(DeepCmpError::NotEquivalent(report.describe()))
    }
}
