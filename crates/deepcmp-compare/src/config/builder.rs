use std::sync::Arc;

use deepcmp_types::{Representation, Value};

use super::RecursiveComparisonConfig;
use crate::comparator::Comparator;
use crate::error::{CompareError, CompareResult};
use crate::introspection::IntrospectionStrategy;

/// Consuming builder for [`RecursiveComparisonConfig`].
///
/// Registration errors (invalid regexes) do not interrupt the chain: the
/// first one is kept and returned by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RecursiveComparisonConfigBuilder {
    config: RecursiveComparisonConfig,
    error: Option<CompareError>,
}

impl RecursiveComparisonConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(mut self, f: impl FnOnce(&mut RecursiveComparisonConfig)) -> Self {
        f(&mut self.config);
        self
    }

    fn try_apply(
        mut self,
        f: impl FnOnce(&mut RecursiveComparisonConfig) -> CompareResult<&mut RecursiveComparisonConfig>,
    ) -> Self {
        if let Err(err) = f(&mut self.config) {
            self.error.get_or_insert(err);
        }
        self
    }

    pub fn with_introspection_strategy(self, strategy: impl IntrospectionStrategy + 'static) -> Self {
        let strategy: Arc<dyn IntrospectionStrategy> = Arc::new(strategy);
        self.apply(|c| {
            c.set_shared_introspection_strategy(strategy);
        })
    }

    pub fn with_representation(self, representation: impl Representation + 'static) -> Self {
        self.apply(|c| {
            c.set_representation(representation);
        })
    }

    pub fn with_strict_type_checking(self, strict: bool) -> Self {
        self.apply(|c| {
            c.strict_type_checking(strict);
        })
    }

    pub fn with_enum_against_string_comparison(self, allow: bool) -> Self {
        self.apply(|c| {
            c.allow_comparing_enum_against_string(allow);
        })
    }

    pub fn with_null_and_empty_iterables_treated_as_equal(self, enabled: bool) -> Self {
        self.apply(|c| {
            c.treat_null_and_empty_iterables_as_equal(enabled);
        })
    }

    pub fn with_ignore_all_actual_null_fields(self, ignore: bool) -> Self {
        self.apply(|c| {
            c.ignore_all_actual_null_fields(ignore);
        })
    }

    pub fn with_ignore_all_expected_null_fields(self, ignore: bool) -> Self {
        self.apply(|c| {
            c.ignore_all_expected_null_fields(ignore);
        })
    }

    pub fn with_ignore_all_actual_empty_optional_fields(self, ignore: bool) -> Self {
        self.apply(|c| {
            c.ignore_all_actual_empty_optional_fields(ignore);
        })
    }

    pub fn with_ignored_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.ignore_fields(fields);
        })
    }

    pub fn with_ignored_fields_matching_regexes<I, S>(self, regexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_apply(|c| c.ignore_fields_matching_regexes(regexes))
    }

    pub fn with_ignored_fields_of_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.ignore_fields_of_types(types);
        })
    }

    pub fn with_ignored_fields_of_types_matching_regexes<I, S>(self, regexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_apply(|c| c.ignore_fields_of_types_matching_regexes(regexes))
    }

    pub fn with_compared_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.compare_only_fields(fields);
        })
    }

    pub fn with_compared_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.compare_only_fields_of_types(types);
        })
    }

    /// `true` ignores every overridden equality, `false` honors them.
    pub fn with_ignore_all_overridden_equals(self, ignore: bool) -> Self {
        self.apply(|c| {
            if ignore {
                c.ignore_all_overridden_equals();
            } else {
                c.use_overridden_equals();
            }
        })
    }

    pub fn with_ignored_overridden_equals_for_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.ignore_overridden_equals_for_fields(fields);
        })
    }

    pub fn with_ignored_overridden_equals_for_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.ignore_overridden_equals_for_types(types);
        })
    }

    pub fn with_ignored_overridden_equals_for_fields_matching_regexes<I, S>(self, regexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_apply(|c| c.ignore_overridden_equals_for_fields_matching_regexes(regexes))
    }

    pub fn with_ignore_collection_order(self, ignore: bool) -> Self {
        self.apply(|c| {
            c.ignore_collection_order(ignore);
        })
    }

    pub fn with_ignored_collection_order_in_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.ignore_collection_order_in_fields(fields);
        })
    }

    pub fn with_ignored_collection_order_in_fields_matching_regexes<I, S>(self, regexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_apply(|c| c.ignore_collection_order_in_fields_matching_regexes(regexes))
    }

    pub fn with_ignore_array_order(self, ignore: bool) -> Self {
        self.apply(|c| {
            c.ignore_array_order(ignore);
        })
    }

    pub fn with_comparator_for_fields<I, S>(self, comparator: Comparator, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.register_comparator_for_fields(comparator, fields);
        })
    }

    pub fn with_comparator_for_fields_matching_regexes<I, S>(self, comparator: Comparator, regexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_apply(|c| c.register_comparator_for_fields_matching_regexes(comparator, regexes))
    }

    pub fn with_comparator_for_type(self, comparator: Comparator, type_name: impl Into<String>) -> Self {
        self.apply(|c| {
            c.register_comparator_for_type(comparator, type_name);
        })
    }

    pub fn with_comparator_for_types(
        self,
        comparator: Comparator,
        actual_type: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        self.apply(|c| {
            c.register_comparator_for_types(comparator, actual_type, expected_type);
        })
    }

    pub fn with_equals_for_fields<P, I, S>(self, equals: P, fields: I) -> Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.register_equals_for_fields(equals, fields);
        })
    }

    pub fn with_equals_for_type<P>(self, equals: P, type_name: impl Into<String>) -> Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.apply(|c| {
            c.register_equals_for_type(equals, type_name);
        })
    }

    pub fn with_error_message_for_fields<I, S>(self, message: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|c| {
            c.register_error_message_for_fields(Some(message), fields);
        })
    }

    pub fn with_error_message_for_type(self, message: &str, type_name: &str) -> Self {
        self.apply(|c| {
            c.register_error_message_for_type(Some(message), type_name);
        })
    }

    /// The configuration, or the first registration error.
    pub fn build(self) -> CompareResult<RecursiveComparisonConfig> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.config),
        }
    }
}
