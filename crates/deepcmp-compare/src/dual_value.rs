//! The unit of comparison work: an actual and an expected value at a location.

use deepcmp_types::{FieldLocation, Value, ValueKind};

/// A pair of values found at the same location of the actual and expected
/// graphs.
///
/// Two relations are defined on dual values. `==` requires the same location
/// and the same instances on both sides; [`DualValue::same_values`] ignores
/// the location and is what cycle detection uses.
#[derive(Clone, Debug)]
pub struct DualValue {
    location: FieldLocation,
    actual: Value,
    expected: Value,
}

impl DualValue {
    pub fn new(location: FieldLocation, actual: Value, expected: Value) -> Self {
        Self {
            location,
            actual,
            expected,
        }
    }

    pub fn root(actual: Value, expected: Value) -> Self {
        Self::new(FieldLocation::root(), actual, expected)
    }

    /// The pair found under the child `name` of this location.
    pub fn child(&self, name: impl Into<String>, actual: Value, expected: Value) -> Self {
        Self::new(self.location.field(name), actual, expected)
    }

    pub fn location(&self) -> &FieldLocation {
        &self.location
    }

    pub fn actual(&self) -> &Value {
        &self.actual
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// The rule path of the location.
    pub fn concatenated_path(&self) -> &str {
        self.location.rule_path()
    }

    pub fn decomposed_path(&self) -> &[String] {
        self.location.decomposed_path()
    }

    pub fn is_root(&self) -> bool {
        self.location.is_root()
    }

    /// Whether both sides hold the same instances as `other`'s, wherever
    /// they were found.
    pub fn same_values(&self, other: &DualValue) -> bool {
        self.actual.same_instance(&other.actual) && self.expected.same_instance(&other.expected)
    }

    // -- classification ------------------------------------------------------

    pub fn actual_kind(&self) -> ValueKind {
        self.actual.kind()
    }

    pub fn expected_kind(&self) -> ValueKind {
        self.expected.kind()
    }

    pub fn has_no_null_values(&self) -> bool {
        !self.actual.is_null() && !self.expected.is_null()
    }

    pub fn has_no_container_values(&self) -> bool {
        !self.actual_kind().is_container() && !self.expected_kind().is_container()
    }

    /// Only heap-backed values can lead back to themselves. Scalars, enums,
    /// empty optionals and null never cycle.
    pub fn has_potential_cycling_values(&self) -> bool {
        self.actual.identity().is_some() && self.expected.identity().is_some()
    }

    pub fn is_actual_builtin(&self) -> bool {
        self.actual_kind().is_builtin()
    }

    pub fn is_expected_builtin(&self) -> bool {
        self.expected_kind().is_builtin()
    }

    pub fn is_actual_an_enum(&self) -> bool {
        self.actual_kind() == ValueKind::Enum
    }

    pub fn is_expected_an_enum(&self) -> bool {
        self.expected_kind() == ValueKind::Enum
    }

    pub fn is_actual_an_empty_optional(&self) -> bool {
        self.actual.is_empty_optional()
    }

    pub fn is_actual_null_or_empty_iterable(&self) -> bool {
        is_null_or_empty_iterable(&self.actual)
    }

    pub fn is_expected_null_or_empty_iterable(&self) -> bool {
        is_null_or_empty_iterable(&self.expected)
    }

    /// Whether expected's type is actual's type or a subtype of it.
    pub fn is_expected_type_compatible(&self) -> bool {
        self.expected.is_same_or_subtype_of(&self.actual)
    }

    pub fn actual_type_description(&self) -> String {
        type_description(&self.actual)
    }

    pub fn expected_type_description(&self) -> String {
        type_description(&self.expected)
    }
}

impl PartialEq for DualValue {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location && self.same_values(other)
    }
}

fn is_null_or_empty_iterable(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Collection(c) => c.is_empty(),
        _ => false,
    }
}

fn type_description(value: &Value) -> String {
    value.type_name().unwrap_or("null").to_string()
}
