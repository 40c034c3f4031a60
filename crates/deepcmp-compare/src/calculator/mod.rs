//! The recursive comparison engine.
//!
//! [`DifferenceCalculator`] walks the actual and expected graphs side by side
//! with an explicit worklist instead of recursion. Each popped
//! [`DualValue`] is classified by its [`ValueKind`] and either settled on the
//! spot (custom comparator, built-in equality, overridden equality, type
//! mismatch) or split into child dual values pushed back on the worklist.
//!
//! # Invariants
//!
//! - A pair of instances is compared once per run; reaching it again only
//!   replays whether differences were found under it, so cyclic graphs
//!   terminate.
//! - Differences are returned sorted by [`ComparisonDifference::path_order`].
//! - Data mismatches are differences. Only configuration misuse and failing
//!   actual-side introspection are errors.

mod containers;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::collections::BTreeSet;

use deepcmp_types::{FieldLocation, Value, ValueKind};
use tracing::{debug, warn};

use crate::comparator::Comparator;
use crate::config::RecursiveComparisonConfig;
use crate::difference::ComparisonDifference;
use crate::dual_value::DualValue;
use crate::error::CompareResult;
use crate::queue::DualValueQueue;
use crate::visited::VisitedDualValues;

const DIFFERENT_ACTUAL_AND_EXPECTED_FIELD_TYPES: &str = "expected field is {expected} but actual field is not ({actual})";
const STRICT_TYPE_ERROR: &str = "the compared values are considered different since the recursive comparison enforces strict type checking and the actual value type {actual} is not equal to the expected value type {expected}";
const MISSING_ACTUAL_FIELDS: &str =
    "actual value had less fields to compare than expected value, it did not have these fields: ";
const EXTRA_ACTUAL_FIELDS: &str = "actual value had more fields to compare than expected value, these actual fields could not be found in expected: ";

/// Computes the differences between two values under a configuration.
///
/// The calculator holds no state of its own: every call to
/// [`determine_differences`](Self::determine_differences) starts a fresh
/// worklist and visited ledger, so one calculator (and its configuration)
/// can serve many threads at once.
#[derive(Clone, Copy, Debug)]
pub struct DifferenceCalculator<'c> {
    config: &'c RecursiveComparisonConfig,
}

impl<'c> DifferenceCalculator<'c> {
    pub fn new(config: &'c RecursiveComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecursiveComparisonConfig {
        self.config
    }

    /// The differences between `actual` and `expected`, sorted by path. An
    /// empty list means the values are equivalent.
    ///
    /// Fails when compare-only fields name fields `actual` does not have, or
    /// when a field of `actual` cannot be read.
    pub fn determine_differences(&self, actual: &Value, expected: &Value) -> CompareResult<Vec<ComparisonDifference>> {
        let config = self.config;
        let root = DualValue::root(actual.clone(), expected.clone());
        debug!(
            actual = ?actual.type_name(),
            expected = ?expected.type_name(),
            "starting recursive comparison"
        );

        if config.is_in_strict_type_checking_mode() && types_differ(&root) {
            debug!("root types differ under strict type checking");
            return Ok(vec![ComparisonDifference::with_description(&root, type_error(&root))]);
        }
        if config.has_compared_fields() {
            config.check_compared_fields_exist(actual)?;
        }

        let mut run = RunState::default();
        let differences = Traversal::new(config, &mut run).run(root, true)?;
        debug!(
            differences = differences.len(),
            visited = run.visited.len(),
            "recursive comparison finished"
        );
        Ok(differences)
    }
}

/// Shorthand for `DifferenceCalculator::new(config).determine_differences(..)`.
pub fn determine_differences(
    actual: &Value,
    expected: &Value,
    config: &RecursiveComparisonConfig,
) -> CompareResult<Vec<ComparisonDifference>> {
    DifferenceCalculator::new(config).determine_differences(actual, expected)
}

// ---------------------------------------------------------------------------
// Per-run state
// ---------------------------------------------------------------------------

/// State shared by a comparison and the nested comparisons it starts to
/// match unordered elements.
#[derive(Debug, Default)]
struct RunState {
    visited: VisitedDualValues,
    /// Locations holding a value of a compared type, or lying below one.
    compared_type_locations: BTreeSet<FieldLocation>,
}

/// One drain of a worklist. Nested traversals share the [`RunState`] of the
/// traversal that started them.
struct Traversal<'c, 'r> {
    config: &'c RecursiveComparisonConfig,
    run: &'r mut RunState,
    queue: DualValueQueue,
    differences: Vec<ComparisonDifference>,
}

impl<'c, 'r> Traversal<'c, 'r> {
    fn new(config: &'c RecursiveComparisonConfig, run: &'r mut RunState) -> Self {
        Self {
            config,
            run,
            queue: DualValueQueue::new(),
            differences: Vec::new(),
        }
    }

    fn run(mut self, dual: DualValue, top_level: bool) -> CompareResult<Vec<ComparisonDifference>> {
        if top_level {
            self.seed(dual)?;
        } else {
            self.enqueue(dual);
        }
        while let Some(dual) = self.queue.pop() {
            self.compare(dual)?;
        }
        self.differences.sort_by(ComparisonDifference::path_order);
        Ok(self.differences)
    }

    fn enqueue(&mut self, dual: DualValue) {
        self.queue.push_if_evaluated(dual, self.config);
    }

    /// Two plain objects at the root are split into their children right
    /// away, unless the children do not line up, in which case the root is
    /// compared as a whole to report the missing or extra fields.
    fn seed(&mut self, root: DualValue) -> CompareResult<()> {
        let config = self.config;
        let splittable = root.has_no_null_values()
            && root.actual_kind() == ValueKind::Composite
            && root.expected_kind() == ValueKind::Composite
            && !config.has_custom_comparator(&root);
        if !splittable {
            self.enqueue(root);
            return Ok(());
        }
        let names = config.actual_children_node_names_to_compare(&root)?;
        if names.is_empty() || self.fields_mismatch(&root, &names).is_some() {
            self.enqueue(root);
            return Ok(());
        }
        self.register_compared_type_location(&root);
        if self.should_track_visited(&root) {
            self.run.visited.register_visited(&root);
        }
        for name in &names {
            let child = config.dual_value_for_field(&root, name)?;
            self.enqueue(child);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    fn compare(&mut self, dual: DualValue) -> CompareResult<()> {
        let config = self.config;
        self.register_compared_type_location(&dual);

        if dual.has_potential_cycling_values() {
            let replay = self
                .run
                .visited
                .registered_differences_of(&dual)
                .map(|recorded| !recorded.is_empty());
            if let Some(had_differences) = replay {
                if had_differences {
                    debug!(location = %dual.location(), "pair already compared with differences");
                    let description = format!("already visited node but now location is: {}", dual.location());
                    self.add_difference(&dual, Some(description));
                }
                return Ok(());
            }
            if self.should_track_visited(&dual) {
                self.run.visited.register_visited(&dual);
            }
        }

        if let Some(comparator) = config.comparator_for(&dual) {
            if !equal_by_comparator(&dual, comparator) {
                self.add_difference(&dual, None);
            }
            return Ok(());
        }

        if dual.actual().same_instance(dual.expected()) {
            return Ok(());
        }

        if config.is_treating_null_and_empty_iterables_as_equal()
            && dual.is_actual_null_or_empty_iterable()
            && dual.is_expected_null_or_empty_iterable()
        {
            return Ok(());
        }

        if dual.actual().is_null() || dual.expected().is_null() {
            self.add_difference(&dual, None);
            return Ok(());
        }

        if dual.is_actual_an_enum() || dual.is_expected_an_enum() {
            self.compare_as_enums(&dual);
            return Ok(());
        }

        match dual.expected_kind() {
            ValueKind::Array => self.compare_arrays(&dual)?,
            ValueKind::OrderedCollection if !config.should_ignore_collection_order(dual.location()) => {
                self.compare_ordered_collections(&dual)
            }
            ValueKind::OrderedCollection | ValueKind::UnorderedIterable => self.compare_unordered_iterables(&dual)?,
            ValueKind::SortedMap => self.compare_sorted_maps(&dual),
            ValueKind::Map => self.compare_maps(&dual),
            ValueKind::Optional => self.compare_optionals(&dual),
            kind if kind.is_atomic() => self.compare_atomics(&dual),
            _ => self.compare_objects(&dual)?,
        }
        Ok(())
    }

    /// Visited pairs are only tracked inside compare-only fields: a root
    /// cycling back through `neighbour.neighbour` must still be walked when
    /// `neighbour.neighbour.name` is compared.
    fn should_track_visited(&self, dual: &DualValue) -> bool {
        dual.has_potential_cycling_values()
            && (!self.config.has_compared_fields()
                || self.config.is_or_is_child_of_any_compared_fields(dual.location()))
    }

    fn register_compared_type_location(&mut self, dual: &DualValue) {
        if !self.config.has_compared_types() {
            return;
        }
        let below_compared_type = self
            .run
            .compared_type_locations
            .iter()
            .any(|location| dual.location().has_parent(location));
        if below_compared_type || self.config.is_field_of_type_to_compare(dual) {
            self.run
                .compared_type_locations
                .insert(dual.location().clone());
        }
    }

    // -----------------------------------------------------------------------
    // Differences
    // -----------------------------------------------------------------------

    /// Record a difference on `dual`, unless compared types rule it out.
    ///
    /// With compared types the whole graph is walked, so differences are
    /// only kept on compared fields and on values of (or below values of) a
    /// compared type.
    fn add_difference(&mut self, dual: &DualValue, description: Option<String>) {
        let config = self.config;
        if config.has_compared_types() {
            let compared_field = config.is_or_is_child_of_any_compared_fields(dual.location());
            let compared_type = self.run.compared_type_locations.contains(dual.location());
            if (!compared_field && !compared_type) || config.should_ignore(dual) {
                return;
            }
        }
        let message = config.message_for(dual).map(str::to_string);
        let difference = ComparisonDifference::from_parts(dual, description, message);
        self.run.visited.register_difference(dual, &difference);
        self.differences.push(difference);
    }

    // -----------------------------------------------------------------------
    // Enums
    // -----------------------------------------------------------------------

    /// Enums compare by constant name, never field by field. Under strict
    /// typing the enum types must match too.
    fn compare_as_enums(&mut self, dual: &DualValue) {
        let config = self.config;
        let (actual, expected) = (dual.actual(), dual.expected());
        if config.is_in_strict_type_checking_mode() {
            if !actual.equals(expected) {
                self.add_difference(dual, None);
            }
            return;
        }
        if let (Some(a), Some(e)) = (actual.as_enum(), expected.as_enum()) {
            if a.name() != e.name() {
                self.add_difference(dual, None);
            }
            return;
        }
        if config.is_comparing_enum_against_string_allowed() {
            let same_name = match (actual.as_enum(), expected.as_enum()) {
                (None, Some(e)) => actual.as_str().map(|s| s == e.name()),
                (Some(a), None) => expected.as_str().map(|s| s == a.name()),
                _ => None,
            };
            if let Some(same_name) = same_name {
                if !same_name {
                    self.add_difference(dual, None);
                }
                return;
            }
        }
        let description = if dual.is_expected_an_enum() {
            different_type(dual, "an enum")
        } else {
            format!(
                "expected field is a {} but actual field is an enum",
                dual.expected_type_description()
            )
        };
        self.add_difference(dual, Some(description));
    }

    // -----------------------------------------------------------------------
    // Plain values and objects
    // -----------------------------------------------------------------------

    fn compare_objects(&mut self, dual: &DualValue) -> CompareResult<()> {
        let config = self.config;
        let (actual, expected) = (dual.actual(), dual.expected());
        let actual_builtin = dual.is_actual_builtin();
        let expected_builtin = dual.is_expected_builtin();

        if actual_builtin && expected_builtin {
            if !actual.equals(expected) {
                let actual_type = dual.actual_type_description();
                let expected_type = dual.expected_type_description();
                let description = if actual_type == expected_type {
                    format!(
                        "Actual and expected value are both built-in types ({actual_type}) and thus were compared to with equals"
                    )
                } else {
                    format!(
                        "Actual and expected value are both built-in types ({actual_type} and {expected_type}) and thus were compared to with actual equals method"
                    )
                };
                self.add_difference(dual, Some(description));
            }
            return Ok(());
        }
        if (actual_builtin || expected_builtin) && !actual.equals(expected) {
            let description = if actual_builtin {
                format!(
                    "Actual was compared to expected with equals because it is a built-in type ({}) and expected is not ({})",
                    dual.actual_type_description(),
                    dual.expected_type_description()
                )
            } else {
                format!(
                    "Actual was compared to expected with equals because expected is a built-in type ({}) and actual is not ({})",
                    dual.expected_type_description(),
                    dual.actual_type_description()
                )
            };
            self.add_difference(dual, Some(description));
            return Ok(());
        }

        if config.should_honor_overridden_equals(dual) && has_overridden_equals(actual) {
            if !actual.equals(expected) {
                self.add_difference(
                    dual,
                    Some("Actual was compared to expected with equals as the recursive comparison was configured to do so.".to_string()),
                );
            }
            return Ok(());
        }

        if config.is_in_strict_type_checking_mode() && types_differ(dual) {
            self.add_difference(dual, Some(type_error(dual)));
            return Ok(());
        }

        let names = config.actual_children_node_names_to_compare(dual)?;
        if let Some(description) = self.fields_mismatch(dual, &names) {
            self.add_difference(dual, Some(description));
            return Ok(());
        }
        for name in &names {
            let child = config.dual_value_for_field(dual, name)?;
            self.enqueue(child);
        }
        Ok(())
    }

    /// Describe the fields one side has to compare and the other lacks, or
    /// `None` when both sides line up.
    ///
    /// Fields actual ignores are ignored on expected too, and fields ignored
    /// by location are left out on both sides. With compare-only fields,
    /// expected's extra fields are irrelevant; only compared fields expected
    /// lacks are reported.
    fn fields_mismatch(&self, dual: &DualValue, to_compare: &BTreeSet<String>) -> Option<String> {
        let config = self.config;
        let not_ignored =
            |name: &String| !config.should_ignore_field_based_on_location(&dual.location().field(name.as_str()));
        let actual_names = config.children_node_names_of(dual.actual());
        let actual_ignored: BTreeSet<&String> = actual_names.difference(to_compare).collect();
        let to_compare: BTreeSet<String> = to_compare.iter().filter(|name| not_ignored(name)).cloned().collect();
        let mut expected_to_compare: BTreeSet<String> = config
            .children_node_names_of(dual.expected())
            .into_iter()
            .filter(|name| !actual_ignored.contains(name))
            .filter(|name| not_ignored(name))
            .collect();

        if config.has_compared_fields() {
            let not_in_expected: Vec<&str> = to_compare
                .difference(&expected_to_compare)
                .map(String::as_str)
                .collect();
            if !not_in_expected.is_empty() {
                return Some(format!("{EXTRA_ACTUAL_FIELDS}{}", name_list(not_in_expected)));
            }
            expected_to_compare = to_compare.clone();
        }

        if expected_to_compare == to_compare {
            return None;
        }
        let missing: Vec<&str> = expected_to_compare
            .difference(&to_compare)
            .map(String::as_str)
            .collect();
        let extra: Vec<&str> = to_compare
            .difference(&expected_to_compare)
            .map(String::as_str)
            .collect();
        let description = match (missing.is_empty(), extra.is_empty()) {
            (false, false) => format!(
                "actual value and expected value fields to compare differ:\n- {MISSING_ACTUAL_FIELDS}{}\n- {EXTRA_ACTUAL_FIELDS}{}",
                name_list(missing),
                name_list(extra)
            ),
            (false, true) => format!("{MISSING_ACTUAL_FIELDS}{}", name_list(missing)),
            _ => format!("{EXTRA_ACTUAL_FIELDS}{}", name_list(extra)),
        };
        Some(description)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn equal_by_comparator(dual: &DualValue, comparator: &Comparator) -> bool {
    match comparator.compare(dual.actual(), dual.expected()) {
        Ok(ordering) => ordering == Ordering::Equal,
        Err(err) => {
            warn!(
                field = dual.concatenated_path(),
                actual = %dual.actual(),
                expected = %dual.expected(),
                comparator = %comparator,
                error = %err,
                "comparator was not suited to compare field values, considering them different"
            );
            false
        }
    }
}

fn has_overridden_equals(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.type_info().has_overridden_equals())
}

/// Strict typing accepts an expected value of actual's type or of a
/// subtype of it.
fn types_differ(dual: &DualValue) -> bool {
    dual.has_no_null_values() && !dual.is_expected_type_compatible()
}

fn type_error(dual: &DualValue) -> String {
    STRICT_TYPE_ERROR
        .replace("{actual}", &dual.actual_type_description())
        .replace("{expected}", &dual.expected_type_description())
}

fn different_type(dual: &DualValue, expected_description: &str) -> String {
    DIFFERENT_ACTUAL_AND_EXPECTED_FIELD_TYPES
        .replace("{expected}", expected_description)
        .replace("{actual}", &dual.actual_type_description())
}

fn name_list(names: Vec<&str>) -> String {
    format!("[{}]", names.join(", "))
}
