//! Outcome of one recursive comparison.

use deepcmp_compare::{ComparisonDifference, DifferenceSummary, RecursiveComparisonConfig};
use deepcmp_diff::Patch;
use deepcmp_types::Value;
use serde::Serialize;

use crate::error::DeepCmpResult;

/// The differences found between two values, with everything needed to
/// explain them.
#[derive(Debug)]
pub struct ComparisonReport<'c> {
    actual: Value,
    expected: Value,
    differences: Vec<ComparisonDifference>,
    config: &'c RecursiveComparisonConfig,
}

/// Serializable view of a [`ComparisonReport`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub equivalent: bool,
    pub differences: Vec<DifferenceSummary>,
}

impl<'c> ComparisonReport<'c> {
    pub(crate) fn new(
        actual: Value,
        expected: Value,
        differences: Vec<ComparisonDifference>,
        config: &'c RecursiveComparisonConfig,
    ) -> Self {
        Self {
            actual,
            expected,
            differences,
            config,
        }
    }

    pub fn is_equivalent(&self) -> bool {
        self.differences.is_empty()
    }

    /// Sorted by path.
    pub fn differences(&self) -> &[ComparisonDifference] {
        &self.differences
    }

    pub fn actual(&self) -> &Value {
        &self.actual
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// The line diff of a difference between two multi-line strings.
    ///
    /// The expected text is the original and the actual text the revision,
    /// so deltas read "expecting ... but was ...".
    pub fn line_diff(difference: &ComparisonDifference) -> Option<Patch> {
        let (Some(actual), Some(expected)) = (difference.actual().as_str(), difference.expected().as_str()) else {
            return None;
        };
        if !actual.contains('\n') && !expected.contains('\n') {
            return None;
        }
        Some(deepcmp_diff::diff(expected, actual))
    }

    fn describe_difference(&self, difference: &ComparisonDifference) -> String {
        let mut description = difference.multi_line_description(self.config.representation());
        if let Some(patch) = Self::line_diff(difference).filter(|patch| !patch.is_empty()) {
            description.push('\n');
            description.push_str(&patch.render());
        }
        description
    }

    /// The failure message: both values, every difference, then the
    /// configuration the comparison ran with.
    pub fn describe(&self) -> String {
        let representation = self.config.representation();
        if self.is_equivalent() {
            return format!(
                "actual:\n  {}\nand expected:\n  {}\nare equivalent when recursively compared field by field",
                representation.to_string_of(&self.actual),
                representation.to_string_of(&self.expected)
            );
        }
        let count = self.differences.len();
        let plural = if count == 1 { "" } else { "s" };
        let differences: Vec<String> = self
            .differences
            .iter()
            .map(|difference| self.describe_difference(difference))
            .collect();
        format!(
            "Expecting actual:\n  {}\nto be equal to:\n  {}\nwhen recursively comparing field by field, but found the following {count} difference{plural}:\n\n{}\n\nThe recursive comparison was performed with this configuration:\n{}",
            representation.to_string_of(&self.actual),
            representation.to_string_of(&self.expected),
            differences.join("\n\n"),
            self.config.multi_line_description()
        )
    }

    pub fn summarize(&self) -> ReportSummary {
        let representation = self.config.representation();
        ReportSummary {
            equivalent: self.is_equivalent(),
            differences: self
                .differences
                .iter()
                .map(|difference| difference.summarize(representation))
                .collect(),
        }
    }

    pub fn to_json(&self) -> DeepCmpResult<String> {
        Ok(serde_json::to_string_pretty(&self.summarize())?)
    }
}
