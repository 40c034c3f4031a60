//! The comparison policy.
//!
//! [`RecursiveComparisonConfig`] holds every rule of a comparison (what is
//! ignored, what alone is compared, which custom comparators and messages
//! apply, how collections and types are treated) and answers the decision
//! predicates the engine asks while walking the graphs. A configuration is
//! immutable during a comparison and can be shared by threads running
//! independent comparisons.

mod builder;
mod description;
mod holders;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use deepcmp_types::{FieldLocation, PathPattern, Representation, StandardRepresentation, Value};

use crate::comparator::Comparator;
use crate::dual_value::DualValue;
use crate::error::{CompareError, CompareResult};
use crate::introspection::{ComparingFields, IntrospectionStrategy};

pub use builder::RecursiveComparisonConfigBuilder;
pub use holders::{FieldComparators, FieldHolder, FieldMessages, TypeComparators, TypeMessages};

/// Description given to comparators adapted from equality predicates.
const EQUALS_PREDICATE: &str = "equals predicate";

/// Policy of a recursive comparison.
#[derive(Clone)]
pub struct RecursiveComparisonConfig {
    introspection_strategy: Arc<dyn IntrospectionStrategy>,
    representation: Arc<dyn Representation>,

    strict_type_checking: bool,
    compare_enum_against_string: bool,
    treat_null_and_empty_iterables_as_equal: bool,

    // ignoring
    ignore_all_actual_null_fields: bool,
    ignore_all_expected_null_fields: bool,
    ignore_all_actual_empty_optional_fields: bool,
    ignored_fields: BTreeSet<String>,
    ignored_fields_regexes: Vec<PathPattern>,
    ignored_types: BTreeSet<String>,
    ignored_types_regexes: Vec<PathPattern>,

    // compare only
    compared_fields: BTreeSet<FieldLocation>,
    compared_types: BTreeSet<String>,

    // overridden equals
    ignore_all_overridden_equals: bool,
    ignored_overridden_equals_for_fields: BTreeSet<String>,
    ignored_overridden_equals_for_types: BTreeSet<String>,
    ignored_overridden_equals_for_fields_regexes: Vec<PathPattern>,

    // ordering
    ignore_collection_order: bool,
    ignored_collection_order_in_fields: BTreeSet<String>,
    ignored_collection_order_in_fields_regexes: Vec<PathPattern>,
    ignore_array_order: bool,

    // custom rules
    field_comparators: FieldComparators,
    type_comparators: TypeComparators,
    field_messages: FieldMessages,
    type_messages: TypeMessages,
}

impl Default for RecursiveComparisonConfig {
    fn default() -> Self {
        Self {
            introspection_strategy: Arc::new(ComparingFields::new()),
            representation: Arc::new(StandardRepresentation::default()),
            strict_type_checking: false,
            compare_enum_against_string: false,
            treat_null_and_empty_iterables_as_equal: false,
            ignore_all_actual_null_fields: false,
            ignore_all_expected_null_fields: false,
            ignore_all_actual_empty_optional_fields: false,
            ignored_fields: BTreeSet::new(),
            ignored_fields_regexes: Vec::new(),
            ignored_types: BTreeSet::new(),
            ignored_types_regexes: Vec::new(),
            compared_fields: BTreeSet::new(),
            compared_types: BTreeSet::new(),
            ignore_all_overridden_equals: true,
            ignored_overridden_equals_for_fields: BTreeSet::new(),
            ignored_overridden_equals_for_types: BTreeSet::new(),
            ignored_overridden_equals_for_fields_regexes: Vec::new(),
            ignore_collection_order: false,
            ignored_collection_order_in_fields: BTreeSet::new(),
            ignored_collection_order_in_fields_regexes: Vec::new(),
            ignore_array_order: false,
            field_comparators: FieldComparators::new(),
            type_comparators: TypeComparators::new(),
            field_messages: FieldMessages::new(),
            type_messages: TypeMessages::new(),
        }
    }
}

fn strings<I, S>(items: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items.into_iter().map(|s| s.as_ref().to_string())
}

/// The element a path through a container continues into: the content of an
/// optional or atomic, else the first non-null element. Maps have none.
fn sample_element(container: &Value) -> Option<Value> {
    if let Value::Optional(content) = container {
        return content.as_deref().cloned();
    }
    if let Some(value) = container.atomic_value() {
        return Some(value);
    }
    if let Some(elements) = container.atomic_elements() {
        return elements.into_iter().find(|element| !element.is_null());
    }
    container
        .elements()?
        .iter()
        .find(|element| !element.is_null())
        .cloned()
}

impl RecursiveComparisonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RecursiveComparisonConfigBuilder {
        RecursiveComparisonConfigBuilder::new()
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    pub fn set_introspection_strategy(&mut self, strategy: impl IntrospectionStrategy + 'static) -> &mut Self {
        self.introspection_strategy = Arc::new(strategy);
        self
    }

    pub fn set_shared_introspection_strategy(&mut self, strategy: Arc<dyn IntrospectionStrategy>) -> &mut Self {
        self.introspection_strategy = strategy;
        self
    }

    pub fn set_representation(&mut self, representation: impl Representation + 'static) -> &mut Self {
        self.representation = Arc::new(representation);
        self
    }

    /// Report values whose expected type is not actual's type (or a subtype
    /// of it) as different instead of comparing their fields.
    pub fn strict_type_checking(&mut self, strict: bool) -> &mut Self {
        self.strict_type_checking = strict;
        self
    }

    /// Let an enum constant match a string holding its name, both ways.
    pub fn allow_comparing_enum_against_string(&mut self, allow: bool) -> &mut Self {
        self.compare_enum_against_string = allow;
        self
    }

    /// Consider null and an empty collection equal.
    pub fn treat_null_and_empty_iterables_as_equal(&mut self, enabled: bool) -> &mut Self {
        self.treat_null_and_empty_iterables_as_equal = enabled;
        self
    }

    pub fn ignore_all_actual_null_fields(&mut self, ignore: bool) -> &mut Self {
        self.ignore_all_actual_null_fields = ignore;
        self
    }

    pub fn ignore_all_expected_null_fields(&mut self, ignore: bool) -> &mut Self {
        self.ignore_all_expected_null_fields = ignore;
        self
    }

    pub fn ignore_all_actual_empty_optional_fields(&mut self, ignore: bool) -> &mut Self {
        self.ignore_all_actual_empty_optional_fields = ignore;
        self
    }

    /// Ignore the given rule paths (and so everything below them).
    pub fn ignore_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_fields.extend(strings(fields));
        self
    }

    pub fn ignore_fields_matching_regexes<I, S>(&mut self, regexes: I) -> CompareResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_fields_regexes
            .extend(PathPattern::compile_all(regexes)?);
        Ok(self)
    }

    /// Ignore every field holding a value of one of the given types.
    pub fn ignore_fields_of_types<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_types.extend(strings(types));
        self
    }

    pub fn ignore_fields_of_types_matching_regexes<I, S>(&mut self, regexes: I) -> CompareResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_types_regexes
            .extend(PathPattern::compile_all(regexes)?);
        Ok(self)
    }

    /// Restrict the comparison to the given fields, their parents and their
    /// children.
    pub fn compare_only_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.compared_fields
            .extend(fields.into_iter().map(|f| FieldLocation::from_dotted(f.as_ref())));
        self
    }

    /// Restrict the reported differences to values of the given types and
    /// their fields.
    pub fn compare_only_fields_of_types<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.compared_types.extend(strings(types));
        self
    }

    /// Never use overridden equality below the root. The default.
    pub fn ignore_all_overridden_equals(&mut self) -> &mut Self {
        self.ignore_all_overridden_equals = true;
        self
    }

    /// Honor overridden equality below the root, except where explicitly
    /// ignored.
    pub fn use_overridden_equals(&mut self) -> &mut Self {
        self.ignore_all_overridden_equals = false;
        self
    }

    pub fn ignore_overridden_equals_for_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_overridden_equals_for_fields.extend(strings(fields));
        self
    }

    pub fn ignore_overridden_equals_for_types<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_overridden_equals_for_types.extend(strings(types));
        self
    }

    pub fn ignore_overridden_equals_for_fields_matching_regexes<I, S>(
        &mut self,
        regexes: I,
    ) -> CompareResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_overridden_equals_for_fields_regexes
            .extend(PathPattern::compile_all(regexes)?);
        Ok(self)
    }

    /// Compare every collection as an unordered multiset.
    pub fn ignore_collection_order(&mut self, ignore: bool) -> &mut Self {
        self.ignore_collection_order = ignore;
        self
    }

    pub fn ignore_collection_order_in_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_collection_order_in_fields.extend(strings(fields));
        self
    }

    pub fn ignore_collection_order_in_fields_matching_regexes<I, S>(
        &mut self,
        regexes: I,
    ) -> CompareResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored_collection_order_in_fields_regexes
            .extend(PathPattern::compile_all(regexes)?);
        Ok(self)
    }

    /// Compare every array as an unordered multiset.
    pub fn ignore_array_order(&mut self, ignore: bool) -> &mut Self {
        self.ignore_array_order = ignore;
        self
    }

    pub fn register_comparator_for_fields<I, S>(&mut self, comparator: Comparator, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in strings(fields) {
            self.field_comparators
                .register_comparator(field, comparator.clone());
        }
        self
    }

    pub fn register_comparator_for_fields_matching_regexes<I, S>(
        &mut self,
        comparator: Comparator,
        regexes: I,
    ) -> CompareResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = PathPattern::compile_all(regexes)?;
        self.field_comparators
            .register_comparator_for_regexes(patterns, comparator);
        Ok(self)
    }

    /// Use `comparator` for values of `type_name` and its subtypes.
    pub fn register_comparator_for_type(&mut self, comparator: Comparator, type_name: impl Into<String>) -> &mut Self {
        self.type_comparators
            .register_comparator(type_name, comparator);
        self
    }

    /// Use `comparator` when actual is a `actual_type` and expected an
    /// `expected_type`.
    pub fn register_comparator_for_types(
        &mut self,
        comparator: Comparator,
        actual_type: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> &mut Self {
        self.type_comparators
            .register_comparator_for_pair(actual_type, expected_type, comparator);
        self
    }

    pub fn register_equals_for_fields<P, I, S>(&mut self, equals: P, fields: I) -> &mut Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.register_comparator_for_fields(Comparator::from_equals(EQUALS_PREDICATE, equals), fields)
    }

    pub fn register_equals_for_fields_matching_regexes<P, I, S>(
        &mut self,
        equals: P,
        regexes: I,
    ) -> CompareResult<&mut Self>
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.register_comparator_for_fields_matching_regexes(
            Comparator::from_equals(EQUALS_PREDICATE, equals),
            regexes,
        )
    }

    pub fn register_equals_for_type<P>(&mut self, equals: P, type_name: impl Into<String>) -> &mut Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.register_comparator_for_type(Comparator::from_equals(EQUALS_PREDICATE, equals), type_name)
    }

    pub fn register_equals_for_types<P>(
        &mut self,
        equals: P,
        actual_type: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> &mut Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.register_comparator_for_types(
            Comparator::from_equals(EQUALS_PREDICATE, equals),
            actual_type,
            expected_type,
        )
    }

    /// Replace the difference message of the given fields. `None` restores
    /// the default message.
    pub fn register_error_message_for_fields<I, S>(&mut self, message: Option<&str>, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in strings(fields) {
            match message {
                Some(message) => self.field_messages.put(field, message.to_string()),
                None => {
                    self.field_messages.remove(&field);
                }
            }
        }
        self
    }

    /// Replace the difference message of values of `type_name`. `None`
    /// restores the default message.
    pub fn register_error_message_for_type(&mut self, message: Option<&str>, type_name: &str) -> &mut Self {
        match message {
            Some(message) => self.type_messages.set_message(type_name, message),
            None => {
                self.type_messages.remove(type_name);
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Getters
    // -----------------------------------------------------------------------

    pub fn introspection_strategy(&self) -> &dyn IntrospectionStrategy {
        self.introspection_strategy.as_ref()
    }

    pub fn representation(&self) -> &dyn Representation {
        self.representation.as_ref()
    }

    pub fn is_in_strict_type_checking_mode(&self) -> bool {
        self.strict_type_checking
    }

    pub fn is_comparing_enum_against_string_allowed(&self) -> bool {
        self.compare_enum_against_string
    }

    pub fn is_treating_null_and_empty_iterables_as_equal(&self) -> bool {
        self.treat_null_and_empty_iterables_as_equal
    }

    pub fn is_ignoring_all_actual_null_fields(&self) -> bool {
        self.ignore_all_actual_null_fields
    }

    pub fn is_ignoring_all_expected_null_fields(&self) -> bool {
        self.ignore_all_expected_null_fields
    }

    pub fn is_ignoring_all_actual_empty_optional_fields(&self) -> bool {
        self.ignore_all_actual_empty_optional_fields
    }

    pub fn ignored_fields(&self) -> &BTreeSet<String> {
        &self.ignored_fields
    }

    pub fn ignored_fields_regexes(&self) -> &[PathPattern] {
        &self.ignored_fields_regexes
    }

    pub fn ignored_types(&self) -> &BTreeSet<String> {
        &self.ignored_types
    }

    pub fn ignored_types_regexes(&self) -> &[PathPattern] {
        &self.ignored_types_regexes
    }

    pub fn compared_fields(&self) -> &BTreeSet<FieldLocation> {
        &self.compared_fields
    }

    pub fn compared_types(&self) -> &BTreeSet<String> {
        &self.compared_types
    }

    pub fn has_compared_fields(&self) -> bool {
        !self.compared_fields.is_empty()
    }

    pub fn has_compared_types(&self) -> bool {
        !self.compared_types.is_empty()
    }

    pub fn is_ignoring_all_overridden_equals(&self) -> bool {
        self.ignore_all_overridden_equals
    }

    pub fn is_ignoring_collection_order(&self) -> bool {
        self.ignore_collection_order
    }

    pub fn should_ignore_array_order(&self) -> bool {
        self.ignore_array_order
    }

    pub fn field_comparators(&self) -> &FieldComparators {
        &self.field_comparators
    }

    pub fn type_comparators(&self) -> &TypeComparators {
        &self.type_comparators
    }

    pub fn field_messages(&self) -> &FieldMessages {
        &self.field_messages
    }

    pub fn type_messages(&self) -> &TypeMessages {
        &self.type_messages
    }

    // -----------------------------------------------------------------------
    // Ignoring and compare-only decisions
    // -----------------------------------------------------------------------

    /// Whether a dual value must not even enter the worklist.
    ///
    /// With compared types nothing can be dropped up front: a value of a
    /// compared type may sit anywhere below.
    pub fn should_not_evaluate(&self, dual: &DualValue) -> bool {
        if self.has_compared_types() {
            return false;
        }
        self.should_ignore(dual)
    }

    pub fn should_ignore(&self, dual: &DualValue) -> bool {
        self.should_ignore_field_based_on_location(dual.location())
            || self.should_ignore_field_based_on_value(dual)
    }

    pub(crate) fn should_ignore_field_based_on_location(&self, location: &FieldLocation) -> bool {
        self.matches_an_ignored_field(location) || self.matches_an_ignored_field_regex(location)
    }

    pub(crate) fn should_ignore_field_based_on_value(&self, dual: &DualValue) -> bool {
        self.matches_an_ignored_null_field(dual)
            || self.matches_an_ignored_field_type(dual)
            || self.matches_an_ignored_empty_optional_field(dual)
    }

    pub fn matches_an_ignored_field(&self, location: &FieldLocation) -> bool {
        self.ignored_fields
            .iter()
            .any(|field| location.exactly_matches(field))
    }

    pub fn matches_an_ignored_field_regex(&self, location: &FieldLocation) -> bool {
        self.ignored_fields_regexes
            .iter()
            .any(|regex| location.matches_pattern(regex))
    }

    fn matches_an_ignored_null_field(&self, dual: &DualValue) -> bool {
        (self.ignore_all_actual_null_fields && dual.actual().is_null())
            || (self.ignore_all_expected_null_fields && dual.expected().is_null())
    }

    fn matches_an_ignored_empty_optional_field(&self, dual: &DualValue) -> bool {
        self.ignore_all_actual_empty_optional_fields && dual.is_actual_an_empty_optional()
    }

    /// Expected's type is only trusted when actual is null under strict
    /// typing; otherwise every null field would be ignored.
    fn matches_an_ignored_field_type(&self, dual: &DualValue) -> bool {
        if !dual.actual().is_null() {
            return self.matches_an_ignored_type(dual.actual());
        }
        self.strict_type_checking
            && !dual.expected().is_null()
            && self.matches_an_ignored_type(dual.expected())
    }

    fn matches_an_ignored_type(&self, value: &Value) -> bool {
        let Some(type_name) = value.type_name() else {
            return false;
        };
        self.ignored_types.contains(type_name)
            || self
                .ignored_types_regexes
                .iter()
                .any(|regex| regex.matches(type_name))
    }

    /// Whether the location takes part in a compare-only comparison: the
    /// root, a compared field, a parent of one or a child of one.
    pub(crate) fn should_be_compared(&self, dual: &DualValue) -> bool {
        if self.compared_fields.is_empty() || self.has_compared_types() {
            return true;
        }
        let location = dual.location();
        location.is_root()
            || self.compared_fields.iter().any(|compared| {
                location.exactly_matches_location(compared)
                    || location.has_parent(compared)
                    || location.has_child(compared)
            })
    }

    pub fn is_or_is_child_of_any_compared_fields(&self, location: &FieldLocation) -> bool {
        self.compared_fields
            .iter()
            .any(|compared| compared == location || compared.has_child(location))
    }

    pub fn exactly_matches_any_compared_fields(&self, dual: &DualValue) -> bool {
        self.compared_fields
            .iter()
            .any(|compared| compared.exactly_matches_location(dual.location()))
    }

    /// Whether either side's type is a compared type.
    pub fn is_field_of_type_to_compare(&self, dual: &DualValue) -> bool {
        [dual.actual(), dual.expected()].into_iter().any(|value| {
            value
                .type_name()
                .is_some_and(|type_name| self.compared_types.contains(type_name))
        })
    }

    // -----------------------------------------------------------------------
    // Ordering and equality decisions
    // -----------------------------------------------------------------------

    pub fn should_ignore_collection_order(&self, location: &FieldLocation) -> bool {
        self.ignore_collection_order
            || self
                .ignored_collection_order_in_fields
                .iter()
                .any(|field| location.exactly_matches(field))
            || self
                .ignored_collection_order_in_fields_regexes
                .iter()
                .any(|regex| location.matches_pattern(regex))
    }

    /// Whether overridden equality must not be used for `dual`.
    ///
    /// The root never uses it, built-in values and enums always do. With
    /// compare-only fields, only the compared fields themselves may use it.
    pub fn should_ignore_overridden_equals_of(&self, dual: &DualValue) -> bool {
        if dual.is_root() {
            return true;
        }
        if dual.is_actual_builtin() || dual.is_actual_an_enum() {
            return false;
        }
        if self.has_compared_fields() && !self.exactly_matches_any_compared_fields(dual) {
            return true;
        }
        self.ignore_all_overridden_equals
            || self.matches_an_ignored_overridden_equals_field(dual.location())
            || dual
                .actual()
                .type_name()
                .is_some_and(|t| self.ignored_overridden_equals_for_types.contains(t))
    }

    pub fn should_honor_overridden_equals(&self, dual: &DualValue) -> bool {
        !self.should_ignore_overridden_equals_of(dual)
    }

    fn matches_an_ignored_overridden_equals_field(&self, location: &FieldLocation) -> bool {
        self.ignored_overridden_equals_for_fields
            .iter()
            .any(|field| location.exactly_matches(field))
            || self
                .ignored_overridden_equals_for_fields_regexes
                .iter()
                .any(|regex| location.matches_pattern(regex))
    }

    pub(crate) fn is_configured_to_ignore_some_but_not_all_overridden_equals(&self) -> bool {
        let ignores_some = !self.ignored_overridden_equals_for_fields.is_empty()
            || !self.ignored_overridden_equals_for_types.is_empty()
            || !self.ignored_overridden_equals_for_fields_regexes.is_empty();
        !self.ignore_all_overridden_equals && ignores_some
    }

    // -----------------------------------------------------------------------
    // Custom comparators and messages
    // -----------------------------------------------------------------------

    /// The custom comparator applying to `dual`, by precedence: exact field,
    /// field regex, type pair, single type. Two nulls only ever use a field
    /// comparator.
    pub fn comparator_for(&self, dual: &DualValue) -> Option<&Comparator> {
        if let Some(comparator) = self
            .field_comparators
            .comparator_for_field(dual.concatenated_path())
        {
            return Some(comparator);
        }
        if dual.actual().is_null() && dual.expected().is_null() {
            return None;
        }
        self.type_comparators
            .comparator_for(dual.actual(), dual.expected())
    }

    pub fn has_custom_comparator(&self, dual: &DualValue) -> bool {
        self.comparator_for(dual).is_some()
    }

    /// The custom difference message for `dual`: the field message, else the
    /// message of actual's type (expected's when actual is null).
    pub fn message_for(&self, dual: &DualValue) -> Option<&str> {
        if let Some(message) = self.field_messages.get(dual.concatenated_path()) {
            return Some(message);
        }
        let value = if dual.actual().is_null() {
            dual.expected()
        } else {
            dual.actual()
        };
        self.type_messages.message_for(value)
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub fn children_node_names_of(&self, node: &Value) -> BTreeSet<String> {
        self.introspection_strategy.children_node_names_of(node)
    }

    pub fn child_node_value(&self, name: &str, node: &Value) -> CompareResult<Value> {
        self.introspection_strategy.child_node_value(name, node)
    }

    /// The child `name` of `dual`. Expected may lack the child, it is then
    /// null; actual may not.
    pub(crate) fn dual_value_for_field(&self, dual: &DualValue, name: &str) -> CompareResult<DualValue> {
        let actual = self.child_node_value(name, dual.actual())?;
        let expected = self
            .child_node_value(name, dual.expected())
            .unwrap_or_default();
        Ok(dual.child(name, actual, expected))
    }

    /// The names of actual's children that take part in the comparison.
    ///
    /// Location rules are applied on names alone, then value rules and
    /// compare-only rules on the child dual values.
    pub fn actual_children_node_names_to_compare(&self, dual: &DualValue) -> CompareResult<BTreeSet<String>> {
        let names = self.children_node_names_of(dual.actual());
        if self.has_compared_types() {
            return Ok(names);
        }
        let mut to_compare = BTreeSet::new();
        for name in names {
            if self.should_ignore_field_based_on_location(&dual.location().field(name.as_str())) {
                continue;
            }
            let child = self.dual_value_for_field(dual, &name)?;
            if self.should_ignore_field_based_on_value(&child) || !self.should_be_compared(&child) {
                continue;
            }
            if !name.is_empty() {
                to_compare.insert(name);
            }
        }
        Ok(to_compare)
    }

    /// Fails when a compare-only field names a field that `actual` does not
    /// have. Containers on the path are checked through their first non-null
    /// element. Paths through null values, maps and empty containers are
    /// accepted.
    pub fn check_compared_fields_exist(&self, actual: &Value) -> CompareResult<()> {
        let mut unknown: BTreeMap<&FieldLocation, String> = BTreeMap::new();
        for compared in &self.compared_fields {
            if let Some(name) = self.unknown_node_name(actual, compared)? {
                unknown.insert(compared, name);
            }
        }
        if unknown.is_empty() {
            return Ok(());
        }
        let listed: String = unknown
            .iter()
            .map(|(location, name)| {
                if location.is_top_level_field() {
                    format!("{{{name}}}")
                } else {
                    format!("{{{name} in {location}}}")
                }
            })
            .collect();
        Err(CompareError::UnknownComparedFields(listed))
    }

    fn unknown_node_name(&self, actual: &Value, compared: &FieldLocation) -> CompareResult<Option<String>> {
        let mut node = actual.clone();
        for segment in compared.decomposed_path() {
            while node.kind().is_container() {
                match sample_element(&node) {
                    Some(element) => node = element,
                    None => return Ok(None),
                }
            }
            if node.is_null() {
                return Ok(None);
            }
            if !self.children_node_names_of(&node).contains(segment) {
                return Ok(Some(segment.clone()));
            }
            node = self.child_node_value(segment, &node)?;
        }
        Ok(None)
    }
}

impl fmt::Debug for RecursiveComparisonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveComparisonConfig")
            .field("introspection_strategy", &self.introspection_strategy.description())
            .field("strict_type_checking", &self.strict_type_checking)
            .field("ignored_fields", &self.ignored_fields)
            .field("ignored_types", &self.ignored_types)
            .field("compared_fields", &self.compared_fields)
            .field("compared_types", &self.compared_types)
            .field("ignore_all_overridden_equals", &self.ignore_all_overridden_equals)
            .field("ignore_collection_order", &self.ignore_collection_order)
            .field("ignore_array_order", &self.ignore_array_order)
            .field("field_comparators", &self.field_comparators)
            .field("type_comparators", &self.type_comparators)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use deepcmp_types::{Object, TypeInfo};

    use super::*;

    fn dual(path: &str, actual: impl Into<Value>, expected: impl Into<Value>) -> DualValue {
        DualValue::new(FieldLocation::from_dotted(path), actual.into(), expected.into())
    }

    fn person() -> Value {
        let person = TypeInfo::new("Person");
        let name = TypeInfo::new("Name");
        Value::from(
            Object::new(&person)
                .with("name", Object::new(&name).with("first", "Jack").with("last", "Doe"))
                .with("age", 10)
                .with("nickname", Value::Null),
        )
    }

    #[test]
    fn default_policy() {
        let config = RecursiveComparisonConfig::default();
        assert!(!config.is_in_strict_type_checking_mode());
        assert!(config.is_ignoring_all_overridden_equals());
        assert!(!config.is_ignoring_collection_order());
        assert_eq!(config.introspection_strategy().description(), "comparing fields");
        assert!(!config.should_not_evaluate(&dual("age", 1, 2)));
    }

    #[test]
    fn ignored_fields_match_exact_rule_paths_and_regexes() {
        let mut config = RecursiveComparisonConfig::new();
        config.ignore_fields(["name.first"]);
        config.ignore_fields_matching_regexes([".*age"]).unwrap();

        assert!(config.should_ignore(&dual("name.first", 1, 2)));
        assert!(!config.should_ignore(&dual("children.[0].name.first", 1, 2)));
        assert!(config.should_ignore(&dual("name.[3].first", 1, 2)));
        assert!(!config.should_ignore(&dual("name", 1, 2)));
        assert!(config.should_ignore(&dual("person.age", 1, 2)));
        assert!(!config.should_ignore(&dual("ages", 1, 2)));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let mut config = RecursiveComparisonConfig::new();
        let err = config.ignore_fields_matching_regexes(["(unclosed"]).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn null_and_type_based_ignoring() {
        let mut config = RecursiveComparisonConfig::new();
        config.ignore_all_actual_null_fields(true);
        assert!(config.should_ignore(&dual("a", Value::Null, 1)));
        assert!(!config.should_ignore(&dual("a", 1, Value::Null)));

        let mut config = RecursiveComparisonConfig::new();
        config.ignore_fields_of_types(["String"]);
        assert!(config.should_ignore(&dual("a", "x", 1)));
        // expected's type is only trusted under strict typing
        assert!(!config.should_ignore(&dual("a", Value::Null, "x")));
        config.strict_type_checking(true);
        assert!(config.should_ignore(&dual("a", Value::Null, "x")));

        let mut config = RecursiveComparisonConfig::new();
        config.ignore_all_actual_empty_optional_fields(true);
        assert!(config.should_ignore(&dual("a", Value::empty_optional(), 1)));
        assert!(!config.should_ignore(&dual("a", Value::optional(Some(Value::from(1))), 1)));
    }

    #[test]
    fn compared_types_keep_everything_in_the_worklist() {
        let mut config = RecursiveComparisonConfig::new();
        config.ignore_fields(["age"]).compare_only_fields_of_types(["Name"]);
        assert!(config.should_ignore(&dual("age", 1, 2)));
        assert!(!config.should_not_evaluate(&dual("age", 1, 2)));
    }

    #[test]
    fn compare_only_fields_pull_parents_and_children() {
        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields(["name.first"]);

        assert!(config.should_be_compared(&dual("", 1, 1)));
        assert!(config.should_be_compared(&dual("name", 1, 1)));
        assert!(config.should_be_compared(&dual("name.first", 1, 1)));
        assert!(config.should_be_compared(&dual("name.first.initial", 1, 1)));
        assert!(!config.should_be_compared(&dual("name.last", 1, 1)));
        assert!(!config.should_be_compared(&dual("age", 1, 1)));

        assert!(config.is_or_is_child_of_any_compared_fields(&FieldLocation::from_dotted("name.first.x")));
        assert!(!config.is_or_is_child_of_any_compared_fields(&FieldLocation::from_dotted("name")));
    }

    #[test]
    fn children_to_compare_apply_every_rule() {
        let mut config = RecursiveComparisonConfig::new();
        config.ignore_fields(["age"]).ignore_all_actual_null_fields(true);
        let root = DualValue::root(person(), person());
        let names: Vec<_> = config
            .actual_children_node_names_to_compare(&root)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec!["name"]);

        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields(["age"]);
        let names: Vec<_> = config
            .actual_children_node_names_to_compare(&root)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec!["age"]);
    }

    #[test]
    fn unknown_compared_fields_are_reported_sorted() {
        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields(["name.middle", "age", "height", "name.first"]);
        let err = config.check_compared_fields_exist(&person()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The following fields don't exist: {height}{middle in <name.middle>}"
        );

        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields(["nickname.anything", "name.first"]);
        assert!(config.check_compared_fields_exist(&person()).is_ok());
    }

    #[test]
    fn compared_fields_are_checked_through_containers() {
        let friend = TypeInfo::new("Friend");
        let group = TypeInfo::new("Group");
        let member = |name: &str| Value::from(Object::new(&friend).with("name", name));
        let actual = Value::from(
            Object::new(&group)
                .with("friends", Value::list(vec![Value::Null, member("Jack")]))
                .with("leader", Value::optional(Some(member("Jim"))))
                .with("nobody", Value::list(Vec::new())),
        );

        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields(["friends.name", "leader.name", "nobody.anything"]);
        assert!(config.check_compared_fields_exist(&actual).is_ok());

        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields(["friends.nmae", "leader.nmae"]);
        let err = config.check_compared_fields_exist(&actual).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The following fields don't exist: {nmae in <friends.nmae>}{nmae in <leader.nmae>}"
        );
    }

    #[test]
    fn either_side_can_be_of_a_compared_type() {
        let name = TypeInfo::new("Name");
        let nickname = TypeInfo::new("Nickname");
        let mut config = RecursiveComparisonConfig::new();
        config.compare_only_fields_of_types(["Name"]);

        let named = || Value::from(Object::new(&name).with("first", "Jack"));
        let nicknamed = || Value::from(Object::new(&nickname).with("first", "Jack"));
        assert!(config.is_field_of_type_to_compare(&dual("name", named(), nicknamed())));
        assert!(config.is_field_of_type_to_compare(&dual("name", nicknamed(), named())));
        assert!(config.is_field_of_type_to_compare(&dual("name", Value::Null, named())));
        assert!(!config.is_field_of_type_to_compare(&dual("name", nicknamed(), nicknamed())));
    }

    #[test]
    fn comparator_precedence() {
        let equal = |d: &str| Comparator::new(d, |_, _| Ok(Ordering::Equal));
        let mut config = RecursiveComparisonConfig::new();
        config
            .register_comparator_for_type(equal("by type"), "i64")
            .register_comparator_for_types(equal("by pair"), "i64", "String")
            .register_comparator_for_fields(equal("by field"), ["age"]);
        config
            .register_comparator_for_fields_matching_regexes(equal("by regex"), ["a.*"])
            .unwrap();

        let pick = |d: DualValue| config.comparator_for(&d).map(|c| c.description().to_string());
        assert_eq!(pick(dual("age", 1, 2)).as_deref(), Some("by field"));
        assert_eq!(pick(dual("amount", 1, 2)).as_deref(), Some("by regex"));
        assert_eq!(pick(dual("size", 1, "2")).as_deref(), Some("by pair"));
        assert_eq!(pick(dual("size", 1, 2)).as_deref(), Some("by type"));
        assert_eq!(pick(dual("size", Value::Null, Value::Null)), None);
        assert_eq!(pick(dual("amount", Value::Null, Value::Null)).as_deref(), Some("by regex"));
    }

    #[test]
    fn field_messages_beat_type_messages() {
        let mut config = RecursiveComparisonConfig::new();
        config
            .register_error_message_for_type(Some("bad number"), "i64")
            .register_error_message_for_fields(Some("bad age"), ["age"]);

        assert_eq!(config.message_for(&dual("age", 1, 2)), Some("bad age"));
        assert_eq!(config.message_for(&dual("size", Value::Null, 2)), Some("bad number"));

        config.register_error_message_for_fields(None, ["age"]);
        assert_eq!(config.message_for(&dual("age", 1, 2)), Some("bad number"));
    }

    #[test]
    fn overridden_equals_rules() {
        let money = TypeInfo::builder("Money").equals(|_, _| true).build();
        let m = || Value::from(Object::new(&money));

        let mut config = RecursiveComparisonConfig::new();
        assert!(config.should_ignore_overridden_equals_of(&dual("price", m(), m())));
        config.use_overridden_equals();
        assert!(config.should_honor_overridden_equals(&dual("price", m(), m())));
        assert!(config.should_ignore_overridden_equals_of(&DualValue::root(m(), m())));
        assert!(!config.should_honor_overridden_equals(&dual("", 1, 2)));
        assert!(config.should_honor_overridden_equals(&dual("count", 1, 2)));

        config.ignore_overridden_equals_for_types(["Money"]);
        assert!(config.should_ignore_overridden_equals_of(&dual("price", m(), m())));
        assert!(config.is_configured_to_ignore_some_but_not_all_overridden_equals());

        let mut config = RecursiveComparisonConfig::new();
        config.use_overridden_equals().compare_only_fields(["total"]);
        assert!(config.should_ignore_overridden_equals_of(&dual("price", m(), m())));
        assert!(config.should_honor_overridden_equals(&dual("total", m(), m())));
    }

    #[test]
    fn collection_order_rules() {
        let mut config = RecursiveComparisonConfig::new();
        config.ignore_collection_order_in_fields(["friends"]);
        config
            .ignore_collection_order_in_fields_matching_regexes(["pets.*"])
            .unwrap();

        assert!(config.should_ignore_collection_order(&FieldLocation::from_dotted("friends")));
        assert!(config.should_ignore_collection_order(&FieldLocation::from_dotted("pets.toys")));
        assert!(!config.should_ignore_collection_order(&FieldLocation::from_dotted("friends.pets")));
        config.ignore_collection_order(true);
        assert!(config.should_ignore_collection_order(&FieldLocation::root()));
    }

    #[test]
    fn config_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecursiveComparisonConfig>();
    }
}
