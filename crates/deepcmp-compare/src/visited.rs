//! Ledger of the dual values already compared in a comparison run.
//!
//! Reaching a pair of instances a second time, by any path, means the graph
//! cycles or shares nodes. The ledger stops the traversal there and keeps the
//! differences found under the first visit so they can be reported again.

use tracing::trace;

use crate::difference::ComparisonDifference;
use crate::dual_value::DualValue;

#[derive(Debug)]
struct VisitedDualValue {
    dual_value: DualValue,
    differences: Vec<ComparisonDifference>,
}

/// Visited pairs, keyed by instance identity regardless of location.
#[derive(Debug, Default)]
pub struct VisitedDualValues {
    visited: Vec<VisitedDualValue>,
}

impl VisitedDualValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_visited(&mut self, dual_value: &DualValue) {
        trace!(location = %dual_value.location(), "registering visited dual value");
        self.visited.push(VisitedDualValue {
            dual_value: dual_value.clone(),
            differences: Vec::new(),
        });
    }

    /// The differences recorded under the first visit of the same pair of
    /// instances, or `None` if the pair was never visited.
    pub fn registered_differences_of(&self, dual_value: &DualValue) -> Option<&[ComparisonDifference]> {
        self.visited
            .iter()
            .find(|v| v.dual_value.same_values(dual_value))
            .map(|v| v.differences.as_slice())
    }

    /// Record a difference found on `dual_value` against every visited pair
    /// it belongs to: the same pair of instances, and every pair located
    /// above it.
    pub fn register_difference(&mut self, dual_value: &DualValue, difference: &ComparisonDifference) {
        for visited in &mut self.visited {
            if visited.dual_value.same_values(dual_value)
                || dual_value.location().has_parent(visited.dual_value.location())
            {
                visited.differences.push(difference.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
