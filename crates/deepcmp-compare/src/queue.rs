//! The worklist of dual values waiting to be compared.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::RecursiveComparisonConfig;
use crate::dual_value::DualValue;

/// Pending dual values, taken last-in first-out.
///
/// Every insertion goes through the configuration: values it says must not
/// be evaluated never enter the queue.
#[derive(Debug, Default)]
pub struct DualValueQueue {
    pending: VecDeque<DualValue>,
}

impl DualValueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `dual` unless `config` rules it out. Returns whether it was
    /// queued.
    pub fn push_if_evaluated(&mut self, dual: DualValue, config: &RecursiveComparisonConfig) -> bool {
        if config.should_not_evaluate(&dual) {
            trace!(location = %dual.location(), "dropping ignored dual value");
            return false;
        }
        self.pending.push_front(dual);
        true
    }

    pub fn pop(&mut self) -> Option<DualValue> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
