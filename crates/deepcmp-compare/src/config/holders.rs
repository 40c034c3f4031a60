//! Per-field and per-type registries of comparators and messages.

use std::collections::BTreeMap;

use deepcmp_types::{PathPattern, Value};

use crate::comparator::Comparator;

/// The type names a value answers to, most specific first.
///
/// Objects list their type and every supertype; other values only their own
/// type name. Null has no type.
pub(crate) fn type_hierarchy(value: &Value) -> Vec<String> {
    match value {
        Value::Object(object) => {
            let mut names = Vec::new();
            let mut current = Some(object.type_info());
            while let Some(info) = current {
                names.push(info.name().to_string());
                current = info.supertype();
            }
            names
        }
        other => other.type_name().map(str::to_string).into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// FieldHolder
// ---------------------------------------------------------------------------

/// Entities registered on rule paths, kept sorted by path.
#[derive(Clone, Debug)]
pub struct FieldHolder<T> {
    entities: BTreeMap<String, T>,
}

impl<T> Default for FieldHolder<T> {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }
}

impl<T> FieldHolder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, field: impl Into<String>, entity: T) {
        self.entities.insert(field.into(), entity);
    }

    pub fn remove(&mut self, field: &str) -> Option<T> {
        self.entities.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&T> {
        self.entities.get(field)
    }

    pub fn has_entity(&self, field: &str) -> bool {
        self.entities.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ---------------------------------------------------------------------------
// FieldComparators
// ---------------------------------------------------------------------------

/// Comparators registered on exact rule paths or on rule path regexes.
///
/// An exact registration wins over any regex. Among regexes, the last
/// registered one matching the path wins.
#[derive(Clone, Debug, Default)]
pub struct FieldComparators {
    exact: FieldHolder<Comparator>,
    by_regexes: Vec<(Vec<PathPattern>, Comparator)>,
}

impl FieldComparators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_comparator(&mut self, field: impl Into<String>, comparator: Comparator) {
        self.exact.put(field, comparator);
    }

    pub fn register_comparator_for_regexes(&mut self, regexes: Vec<PathPattern>, comparator: Comparator) {
        self.by_regexes.push((regexes, comparator));
    }

    pub fn comparator_for_field(&self, rule_path: &str) -> Option<&Comparator> {
        self.exact.get(rule_path).or_else(|| {
            self.by_regexes
                .iter()
                .rev()
                .find(|(regexes, _)| regexes.iter().any(|r| r.matches(rule_path)))
                .map(|(_, comparator)| comparator)
        })
    }

    pub fn has_comparator_for_field(&self, rule_path: &str) -> bool {
        self.comparator_for_field(rule_path).is_some()
    }

    pub fn has_regex_comparators(&self) -> bool {
        !self.by_regexes.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.by_regexes.is_empty()
    }

    pub fn field_comparators(&self) -> impl Iterator<Item = (&str, &Comparator)> {
        self.exact.entries()
    }

    pub fn regex_comparators(&self) -> impl Iterator<Item = (&[PathPattern], &Comparator)> {
        self.by_regexes.iter().map(|(r, c)| (r.as_slice(), c))
    }
}

/// Custom failure messages registered on rule paths.
pub type FieldMessages = FieldHolder<String>;

// ---------------------------------------------------------------------------
// Type registries
// ---------------------------------------------------------------------------

/// Comparators registered on a type, or on an (actual type, expected type)
/// pair. Pairs win over single types; a single type registration also
/// applies to its subtypes.
#[derive(Clone, Debug, Default)]
pub struct TypeComparators {
    by_pair: BTreeMap<(String, String), Comparator>,
    by_type: BTreeMap<String, Comparator>,
}

impl TypeComparators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_comparator(&mut self, type_name: impl Into<String>, comparator: Comparator) {
        self.by_type.insert(type_name.into(), comparator);
    }

    pub fn register_comparator_for_pair(
        &mut self,
        actual_type: impl Into<String>,
        expected_type: impl Into<String>,
        comparator: Comparator,
    ) {
        self.by_pair
            .insert((actual_type.into(), expected_type.into()), comparator);
    }

    pub fn comparator_for_type(&self, type_name: &str) -> Option<&Comparator> {
        self.by_type.get(type_name)
    }

    /// The comparator to use for `actual` and `expected`: a pair registration
    /// first, then actual's type hierarchy, then expected's when actual is
    /// null.
    pub fn comparator_for(&self, actual: &Value, expected: &Value) -> Option<&Comparator> {
        if let (Some(a), Some(e)) = (actual.type_name(), expected.type_name()) {
            if let Some(comparator) = self.by_pair.get(&(a.to_string(), e.to_string())) {
                return Some(comparator);
            }
        }
        let reference = if actual.is_null() { expected } else { actual };
        type_hierarchy(reference)
            .iter()
            .find_map(|name| self.by_type.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty() && self.by_type.is_empty()
    }

    pub fn type_comparators(&self) -> impl Iterator<Item = (&str, &Comparator)> {
        self.by_type.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn pair_comparators(&self) -> impl Iterator<Item = ((&str, &str), &Comparator)> {
        self.by_pair
            .iter()
            .map(|((a, e), c)| ((a.as_str(), e.as_str()), c))
    }
}

/// Custom failure messages registered on types, applying to subtypes too.
#[derive(Clone, Debug, Default)]
pub struct TypeMessages {
    messages: BTreeMap<String, String>,
}

impl TypeMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, type_name: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(type_name.into(), message.into());
    }

    pub fn remove(&mut self, type_name: &str) -> Option<String> {
        self.messages.remove(type_name)
    }

    pub fn message_for(&self, value: &Value) -> Option<&str> {
        type_hierarchy(value)
            .iter()
            .find_map(|name| self.messages.get(name))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
