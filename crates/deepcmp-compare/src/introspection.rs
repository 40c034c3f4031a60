//! Introspection strategies: how the children of a composite value are found.
//!
//! The engine never looks inside an [`Object`] on its own. It asks the
//! configured [`IntrospectionStrategy`] for the names of a node's children and
//! for the value behind each name.

use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use deepcmp_types::{Object, TypeError, Value};

use crate::error::{CompareError, CompareResult};

/// Enumerates and reads the comparable children of a node.
///
/// Implementations are shared by every comparison using a configuration, so
/// any cache they keep must tolerate concurrent use.
pub trait IntrospectionStrategy: Send + Sync {
    /// Names of the children of `node`; empty for null and non-composite values.
    fn children_node_names_of(&self, node: &Value) -> BTreeSet<String>;

    /// The value of the child `name` of `node`.
    fn child_node_value(&self, name: &str, node: &Value) -> CompareResult<Value>;

    /// Describes the strategy in configuration reports.
    fn description(&self) -> String;

    fn should_ignore_transient_fields(&self) -> bool {
        false
    }
}

fn object_of(node: &Value) -> CompareResult<&Object> {
    node.as_object().ok_or_else(|| {
        CompareError::Type(TypeError::NotAnObject(
            node.type_name().unwrap_or("null").to_string(),
        ))
    })
}

// ---------------------------------------------------------------------------
// ComparingFields
// ---------------------------------------------------------------------------

/// Compares objects field by field. The default strategy.
#[derive(Clone, Debug, Default)]
pub struct ComparingFields {
    ignore_transient_fields: bool,
}

impl ComparingFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave out fields their type declares transient.
    pub fn ignoring_transient_fields() -> Self {
        Self {
            ignore_transient_fields: true,
        }
    }
}

impl IntrospectionStrategy for ComparingFields {
    fn children_node_names_of(&self, node: &Value) -> BTreeSet<String> {
        let Some(object) = node.as_object() else {
            return BTreeSet::new();
        };
        let info = object.type_info();
        object
            .field_names()
            .into_iter()
            .filter(|name| !(self.ignore_transient_fields && info.is_transient(name)))
            .collect()
    }

    fn child_node_value(&self, name: &str, node: &Value) -> CompareResult<Value> {
        Ok(object_of(node)?.field(name)?)
    }

    fn description(&self) -> String {
        if self.ignore_transient_fields {
            "comparing fields but not transient fields".to_string()
        } else {
            "comparing fields".to_string()
        }
    }

    fn should_ignore_transient_fields(&self) -> bool {
        self.ignore_transient_fields
    }
}

// ---------------------------------------------------------------------------
// ComparingProperties
// ---------------------------------------------------------------------------

/// Compares objects through the properties registered on their type.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComparingProperties;

impl IntrospectionStrategy for ComparingProperties {
    fn children_node_names_of(&self, node: &Value) -> BTreeSet<String> {
        let Some(object) = node.as_object() else {
            return BTreeSet::new();
        };
        object
            .type_info()
            .properties()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    fn child_node_value(&self, name: &str, node: &Value) -> CompareResult<Value> {
        let object = object_of(node)?;
        let property = object.type_info().property(name).ok_or_else(|| {
            CompareError::introspection(format!(
                "no property '{name}' on {}",
                object.type_name()
            ))
        })?;
        Ok(property.read(object))
    }

    fn description(&self) -> String {
        "comparing properties".to_string()
    }
}

// ---------------------------------------------------------------------------
// ComparingNormalizedFields
// ---------------------------------------------------------------------------

/// Maps field names to a canonical form so that differently named fields
/// (`first_name`, `firstName`) are compared with each other.
pub trait FieldNameNormalizer: Send + Sync {
    fn normalize(&self, name: &str) -> String;

    fn description(&self) -> String;
}

/// Compares fields by normalized name.
///
/// The original name behind each normalized name is cached per type so that
/// values can be read back; the cache is safe to share between threads.
pub struct ComparingNormalizedFields<N> {
    normalizer: N,
    original_names: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl<N: FieldNameNormalizer> ComparingNormalizedFields<N> {
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            original_names: RwLock::new(HashMap::new()),
        }
    }

    fn remember(&self, type_name: &str, normalized: &str, original: &str) {
        let mut cache = self
            .original_names
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(type_name.to_string())
            .or_default()
            .entry(normalized.to_string())
            .or_insert_with(|| original.to_string());
    }

    fn original_name(&self, type_name: &str, normalized: &str) -> Option<String> {
        let cache = self
            .original_names
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        cache.get(type_name).and_then(|names| names.get(normalized)).cloned()
    }
}

impl<N: FieldNameNormalizer> IntrospectionStrategy for ComparingNormalizedFields<N> {
    fn children_node_names_of(&self, node: &Value) -> BTreeSet<String> {
        let Some(object) = node.as_object() else {
            return BTreeSet::new();
        };
        object
            .field_names()
            .into_iter()
            .map(|original| {
                let normalized = self.normalizer.normalize(&original);
                self.remember(object.type_name(), &normalized, &original);
                normalized
            })
            .collect()
    }

    fn child_node_value(&self, name: &str, node: &Value) -> CompareResult<Value> {
        let object = object_of(node)?;
        if let Some(value) = object.get(name) {
            return Ok(value);
        }
        let type_name = object.type_name();
        let original = match self.original_name(type_name, name) {
            Some(original) => Some(original),
            None => {
                self.children_node_names_of(node);
                self.original_name(type_name, name)
            }
        };
        original
            .and_then(|original| object.get(&original))
            .ok_or_else(|| {
                CompareError::introspection(format!(
                    "unable to find field '{name}' in {type_name}, normalized with {}",
                    self.normalizer.description()
                ))
            })
    }

    fn description(&self) -> String {
        format!("comparing fields normalizing {}", self.normalizer.description())
    }
}

/// Turns `snake_case` names into `camelCase`; camel case names are kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnakeToCamelCase;

impl FieldNameNormalizer for SnakeToCamelCase {
    fn normalize(&self, name: &str) -> String {
        if !name.contains('_') {
            return name.to_string();
        }
        let mut normalized = String::with_capacity(name.len());
        for (i, part) in name.split('_').filter(|p| !p.is_empty()).enumerate() {
            if i == 0 {
                normalized.push_str(part);
                continue;
            }
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                normalized.extend(first.to_uppercase());
                normalized.push_str(chars.as_str());
            }
        }
        normalized
    }

    fn description(&self) -> String {
        "snake case to camel case".to_string()
    }
}

/// Compares `first_name` with `firstName`.
pub type ComparingSnakeOrCamelCaseFields = ComparingNormalizedFields<SnakeToCamelCase>;

impl Default for ComparingSnakeOrCamelCaseFields {
    fn default() -> Self {
        Self::new(SnakeToCamelCase)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use deepcmp_types::TypeInfo;

    use super::*;

    fn names(set: BTreeSet<String>) -> Vec<String> {
        set.into_iter().collect()
    }

    #[test]
    fn fields_of_objects_only() {
        let person = TypeInfo::new("Person");
        let jack = Value::from(Object::new(&person).with("name", "Jack").with("age", 10));
        let strategy = ComparingFields::new();

        assert_eq!(names(strategy.children_node_names_of(&jack)), vec!["age", "name"]);
        assert!(strategy.children_node_names_of(&Value::Null).is_empty());
        assert!(strategy.children_node_names_of(&Value::from(1)).is_empty());
        assert!(strategy
            .child_node_value("name", &jack)
            .unwrap()
            .equals(&Value::from("Jack")));
        assert!(strategy.child_node_value("nope", &jack).is_err());
        assert!(strategy.child_node_value("name", &Value::from(1)).is_err());
    }

    #[test]
    fn transient_fields_can_be_left_out() {
        let cached = TypeInfo::builder("Cached").transient_field("cache").build();
        let value = Value::from(Object::new(&cached).with("id", 1).with("cache", "x"));

        assert_eq!(
            names(ComparingFields::new().children_node_names_of(&value)),
            vec!["cache", "id"]
        );
        let strategy = ComparingFields::ignoring_transient_fields();
        assert_eq!(names(strategy.children_node_names_of(&value)), vec!["id"]);
        assert!(strategy.should_ignore_transient_fields());
    }

    #[test]
    fn properties_come_from_the_type() {
        let person = TypeInfo::builder("Person")
            .property("fullName", |o| {
                let first = o.get("first").unwrap_or_default();
                let last = o.get("last").unwrap_or_default();
                Value::from(format!("{first} {last}"))
            })
            .build();
        let value = Value::from(Object::new(&person).with("first", "Jack").with("last", "Doe"));

        assert_eq!(
            names(ComparingProperties.children_node_names_of(&value)),
            vec!["fullName"]
        );
        let full_name = ComparingProperties.child_node_value("fullName", &value).unwrap();
        assert!(full_name.equals(&Value::from("Jack Doe")));
        assert!(ComparingProperties.child_node_value("first", &value).is_err());
    }

    #[test]
    fn snake_case_is_normalized() {
        let normalizer = SnakeToCamelCase;
        assert_eq!(normalizer.normalize("first_name"), "firstName");
        assert_eq!(normalizer.normalize("firstName"), "firstName");
        assert_eq!(normalizer.normalize("_id"), "id");
        assert_eq!(normalizer.normalize("a__b"), "aB");
    }

    #[test]
    fn normalized_names_read_back_original_fields() {
        let row = TypeInfo::new("Row");
        let value = Value::from(Object::new(&row).with("first_name", "Jack"));
        let strategy = ComparingSnakeOrCamelCaseFields::default();

        // value lookup works before and after the names were listed
        assert!(strategy
            .child_node_value("firstName", &value)
            .unwrap()
            .equals(&Value::from("Jack")));
        assert_eq!(names(strategy.children_node_names_of(&value)), vec!["firstName"]);
        assert!(strategy.child_node_value("lastName", &value).is_err());
    }

    #[test]
    fn normalized_cache_is_shared_across_threads() {
        let row = TypeInfo::new("Row");
        let strategy = Arc::new(ComparingSnakeOrCamelCaseFields::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let strategy = Arc::clone(&strategy);
                let row = Arc::clone(&row);
                thread::spawn(move || {
                    let value = Value::from(Object::new(&row).with("row_id", i));
                    strategy
                        .child_node_value("rowId", &value)
                        .map(|v| v.equals(&Value::from(i)))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(true));
        }
    }
}
