//! Comparison of container values: arrays, collections, maps, optionals and
//! atomic wrappers.

use std::collections::BTreeMap;

use deepcmp_types::{CollectionKind, FieldLocation, MapValue, Value, ValueKind};

use super::{different_type, Traversal};
use crate::difference::ComparisonDifference;
use crate::dual_value::DualValue;
use crate::error::CompareResult;

const VALUE_FIELD_NAME: &str = "value";
const ARRAY_FIELD_NAME: &str = "array";

fn size_error(kind: &str, actual_size: usize, expected_size: usize) -> String {
    format!("actual and expected values are {kind} of different size, actual size={actual_size} when expected size={expected_size}")
}

fn element_location(parent: &FieldLocation, index: usize) -> FieldLocation {
    parent.field(format!("[{index}]"))
}

/// A null key stands for the map itself.
fn key_location(parent: &FieldLocation, key: &Value) -> FieldLocation {
    if key.is_null() {
        parent.clone()
    } else {
        parent.field(key.to_string())
    }
}

impl Traversal<'_, '_> {
    fn different_type(&mut self, dual: &DualValue, expected_description: &str) {
        self.add_difference(dual, Some(different_type(dual, expected_description)));
    }

    // -----------------------------------------------------------------------
    // Arrays and collections
    // -----------------------------------------------------------------------

    pub(super) fn compare_arrays(&mut self, dual: &DualValue) -> CompareResult<()> {
        if dual.actual_kind() != ValueKind::Array {
            self.different_type(dual, "an array");
            return Ok(());
        }
        let (Some(actual), Some(expected)) = (dual.actual().elements(), dual.expected().elements()) else {
            return Ok(());
        };
        if actual.len() != expected.len() {
            self.add_difference(dual, Some(size_error("arrays", actual.len(), expected.len())));
            return Ok(());
        }
        if self.config.should_ignore_array_order() {
            return self.compare_unordered_elements(dual, actual, expected);
        }
        self.enqueue_element_pairs(dual, actual, expected);
        Ok(())
    }

    /// Lists, sorted sets and linked sets, compared position by position.
    pub(super) fn compare_ordered_collections(&mut self, dual: &DualValue) {
        if dual.actual_kind() != ValueKind::OrderedCollection {
            let ordered: Vec<&str> = CollectionKind::ORDERED
                .iter()
                .map(|kind| kind.type_name())
                .collect();
            let description = format!(
                "expected field is an ordered collection but actual field is not ({}), ordered collections are: [{}]",
                dual.actual_type_description(),
                ordered.join(", ")
            );
            self.add_difference(dual, Some(description));
            return;
        }
        let (Some(actual), Some(expected)) = (dual.actual().elements(), dual.expected().elements()) else {
            return;
        };
        if actual.len() != expected.len() {
            self.add_difference(dual, Some(size_error("collections", actual.len(), expected.len())));
            return;
        }
        self.enqueue_element_pairs(dual, actual, expected);
    }

    pub(super) fn compare_unordered_iterables(&mut self, dual: &DualValue) -> CompareResult<()> {
        if !dual.actual_kind().is_iterable() {
            self.different_type(dual, "an iterable");
            return Ok(());
        }
        let (Some(actual), Some(expected)) = (dual.actual().elements(), dual.expected().elements()) else {
            return Ok(());
        };
        if actual.len() != expected.len() {
            self.add_difference(dual, Some(size_error("collections", actual.len(), expected.len())));
            return Ok(());
        }
        self.compare_unordered_elements(dual, actual, expected)
    }

    fn enqueue_element_pairs(&mut self, dual: &DualValue, actual: &[Value], expected: &[Value]) {
        for (index, (a, e)) in actual.iter().zip(expected).enumerate() {
            let element = DualValue::new(element_location(dual.location(), index), a.clone(), e.clone());
            self.enqueue(element);
        }
    }

    /// Multiset matching: every expected element must be matched by a
    /// distinct actual element with no difference between them.
    ///
    /// Candidates are grouped by hash code and the expected element's bucket
    /// is searched first. Hash codes are only a hint, since ignored fields or
    /// custom comparators can make elements with different hashes match, so
    /// the other buckets are searched next.
    fn compare_unordered_elements(&mut self, dual: &DualValue, actual: &[Value], expected: &[Value]) -> CompareResult<()> {
        let mut remaining: Vec<Value> = actual.to_vec();
        let mut not_matched = Vec::new();
        for expected_element in expected {
            let mut buckets: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
            for (index, element) in remaining.iter().enumerate() {
                buckets.entry(element.hash_code()).or_default().push(index);
            }
            let hash = expected_element.hash_code();
            let same_bucket = buckets.get(&hash).into_iter().flatten();
            let other_buckets = buckets
                .iter()
                .filter(|(bucket, _)| **bucket != hash)
                .flat_map(|(_, indices)| indices);

            let mut matched = None;
            for &index in same_bucket.chain(other_buckets) {
                if self.elements_match(dual, &remaining[index], expected_element)? {
                    matched = Some(index);
                    break;
                }
            }
            match matched {
                Some(index) => {
                    remaining.remove(index);
                }
                None => not_matched.push(expected_element.clone()),
            }
        }
        if !not_matched.is_empty() {
            let description = format!(
                "The following expected elements were not matched in the actual {}:\n  {}",
                dual.actual_type_description(),
                self.config.representation().to_string_of(&Value::list(not_matched))
            );
            self.add_difference(dual, Some(description));
        }
        Ok(())
    }

    /// A full comparison of two elements, sharing this run's visited pairs
    /// so cycles through the elements still terminate.
    fn elements_match(&mut self, dual: &DualValue, actual: &Value, expected: &Value) -> CompareResult<bool> {
        let element = DualValue::new(dual.location().clone(), actual.clone(), expected.clone());
        let differences = Traversal::new(self.config, &mut *self.run).run(element, false)?;
        Ok(differences.is_empty())
    }

    // -----------------------------------------------------------------------
    // Maps
    // -----------------------------------------------------------------------

    /// Entries whose key names an ignored field are left out. A null key is
    /// never ignored.
    fn entries_to_compare(&self, map: &MapValue, location: &FieldLocation) -> Vec<(Value, Value)> {
        let config = self.config;
        map.entries()
            .iter()
            .filter(|(key, _)| {
                key.is_null() || !config.should_ignore_field_based_on_location(&location.field(key.to_string()))
            })
            .cloned()
            .collect()
    }

    /// Sorted maps are walked in step: entries at the same position must
    /// have equal keys.
    pub(super) fn compare_sorted_maps(&mut self, dual: &DualValue) {
        let (Some(actual), Some(expected)) = (dual.actual().as_map(), dual.expected().as_map()) else {
            self.different_type(dual, "a sorted map");
            return;
        };
        if !actual.is_sorted() {
            self.different_type(dual, "a sorted map");
            return;
        }
        let actual = self.entries_to_compare(actual, dual.location());
        let expected = self.entries_to_compare(expected, dual.location());
        if actual.len() != expected.len() {
            self.add_difference(dual, Some(size_error("sorted maps", actual.len(), expected.len())));
            return;
        }
        for ((actual_key, actual_value), (expected_key, expected_value)) in actual.into_iter().zip(expected) {
            if actual_key.equals(&expected_key) {
                let location = key_location(dual.location(), &actual_key);
                self.enqueue(DualValue::new(location, actual_value, expected_value));
            } else {
                self.differences
                    .push(ComparisonDifference::key_difference(dual, actual_key, expected_key));
            }
        }
    }

    /// Maps must have the same keys; the values of each key are then
    /// compared.
    pub(super) fn compare_maps(&mut self, dual: &DualValue) {
        let (Some(actual), Some(expected)) = (dual.actual().as_map(), dual.expected().as_map()) else {
            self.different_type(dual, "a map");
            return;
        };
        let actual = self.entries_to_compare(actual, dual.location());
        let expected = self.entries_to_compare(expected, dual.location());
        let has_key = |entries: &[(Value, Value)], key: &Value| entries.iter().any(|(k, _)| k.equals(key));

        let expected_keys_not_in_actual: Vec<Value> = expected
            .iter()
            .filter(|(key, _)| !has_key(&actual, key))
            .map(|(key, _)| key.clone())
            .collect();
        let actual_keys_not_in_expected: Vec<Value> = actual
            .iter()
            .filter(|(key, _)| !has_key(&expected, key))
            .map(|(key, _)| key.clone())
            .collect();

        if !expected_keys_not_in_actual.is_empty() || !actual_keys_not_in_expected.is_empty() {
            let representation = self.config.representation();
            let mut description = String::new();
            if actual.len() != expected.len() {
                description.push_str(&size_error("maps", actual.len(), expected.len()));
                description.push('\n');
            }
            if !expected_keys_not_in_actual.is_empty() {
                description.push_str(&format!(
                    "The following keys were not found in the actual map value:\n  {}\n",
                    representation.to_string_of(&Value::list(expected_keys_not_in_actual))
                ));
            }
            if !actual_keys_not_in_expected.is_empty() {
                description.push_str(&format!(
                    "The following keys were present in the actual map value, but not in the expected map value:\n  {}",
                    representation.to_string_of(&Value::list(actual_keys_not_in_expected))
                ));
            }
            self.add_difference(dual, Some(description.trim_end().to_string()));
            return;
        }

        for (key, expected_value) in expected {
            let actual_value = actual
                .iter()
                .find(|(k, _)| k.equals(&key))
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            let location = key_location(dual.location(), &key);
            self.enqueue(DualValue::new(location, actual_value, expected_value));
        }
    }

    // -----------------------------------------------------------------------
    // Wrappers
    // -----------------------------------------------------------------------

    /// Both empty is equality, one empty is a difference, two contents are
    /// compared under `value`.
    pub(super) fn compare_optionals(&mut self, dual: &DualValue) {
        let (Value::Optional(actual), Value::Optional(expected)) = (dual.actual(), dual.expected()) else {
            self.different_type(dual, "an Optional");
            return;
        };
        match (actual, expected) {
            (None, None) => {}
            (Some(a), Some(e)) => {
                let content = dual.child(VALUE_FIELD_NAME, Value::clone(a), Value::clone(e));
                self.enqueue(content);
            }
            _ => self.add_difference(dual, None),
        }
    }

    /// Atomic wrappers are compared by their content, read now: the single
    /// value under `value`, array elements under `array[i]`.
    pub(super) fn compare_atomics(&mut self, dual: &DualValue) {
        if dual.actual_kind() != dual.expected_kind() {
            let description = format!("an {}", dual.expected_type_description());
            self.different_type(dual, &description);
            return;
        }
        if let (Some(actual), Some(expected)) = (dual.actual().atomic_value(), dual.expected().atomic_value()) {
            self.enqueue(dual.child(VALUE_FIELD_NAME, actual, expected));
            return;
        }
        let (Some(actual), Some(expected)) = (dual.actual().atomic_elements(), dual.expected().atomic_elements()) else {
            return;
        };
        if actual.len() != expected.len() {
            let kind = format!("{}s", dual.expected_type_description());
            self.add_difference(dual, Some(size_error(&kind, actual.len(), expected.len())));
            return;
        }
        for (index, (a, e)) in actual.into_iter().zip(expected).enumerate() {
            self.enqueue(dual.child(format!("{ARRAY_FIELD_NAME}[{index}]"), a, e));
        }
    }
}
