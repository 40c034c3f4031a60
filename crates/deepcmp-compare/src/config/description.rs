//! Human-readable account of a configuration, appended to failure reports.

use std::fmt::Write;

use deepcmp_types::PathPattern;

use super::RecursiveComparisonConfig;

const INDENT_LEVEL_2: &str = "  -";

fn join<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().collect::<Vec<_>>().join(", ")
}

fn join_regexes(regexes: &[PathPattern]) -> String {
    join(regexes.iter().map(PathPattern::as_str))
}

impl RecursiveComparisonConfig {
    /// One bullet line per active rule.
    pub fn multi_line_description(&self) -> String {
        let mut out = String::new();
        self.describe_ignoring(&mut out);
        self.describe_compared(&mut out);
        self.describe_overridden_equals(&mut out);
        self.describe_ordering(&mut out);
        self.describe_comparators(&mut out);
        self.describe_type_checking(&mut out);
        self.describe_messages(&mut out);
        let _ = writeln!(
            out,
            "- the introspection strategy used was: {}",
            self.introspection_strategy.description()
        );
        if self.compare_enum_against_string {
            out.push_str(
                "- enums can be compared against strings (and vice versa), e.g. Color::Red and \"Red\" are considered equal\n",
            );
        }
        if self.treat_null_and_empty_iterables_as_equal {
            out.push_str("- null and empty iterables were considered equal\n");
        }
        out
    }

    fn describe_ignoring(&self, out: &mut String) {
        if self.ignore_all_actual_null_fields {
            out.push_str("- all actual null fields were ignored in the comparison\n");
        }
        if self.ignore_all_actual_empty_optional_fields {
            out.push_str("- all actual empty optional fields were ignored in the comparison\n");
        }
        if self.ignore_all_expected_null_fields {
            out.push_str("- all expected null fields were ignored in the comparison\n");
        }
        if !self.ignored_fields.is_empty() {
            let _ = writeln!(
                out,
                "- the following fields were ignored in the comparison: {}",
                join(self.ignored_fields.iter().map(String::as_str))
            );
        }
        if !self.ignored_fields_regexes.is_empty() {
            let _ = writeln!(
                out,
                "- the fields matching the following regexes were ignored in the comparison: {}",
                join_regexes(&self.ignored_fields_regexes)
            );
        }
        if !self.ignored_types.is_empty() {
            let _ = writeln!(
                out,
                "- the following types were ignored in the comparison: {}",
                join(self.ignored_types.iter().map(String::as_str))
            );
        }
        if !self.ignored_types_regexes.is_empty() {
            let _ = writeln!(
                out,
                "- the types matching the following regexes were ignored in the comparison: {}",
                join_regexes(&self.ignored_types_regexes)
            );
        }
    }

    fn describe_compared(&self, out: &mut String) {
        if !self.compared_fields.is_empty() {
            let _ = writeln!(
                out,
                "- the comparison was performed on the following fields: {}",
                join(self.compared_fields.iter().map(|f| f.rule_path()))
            );
        }
        if !self.compared_types.is_empty() {
            let _ = writeln!(
                out,
                "- the comparison was performed on any fields with types: {}",
                join(self.compared_types.iter().map(String::as_str))
            );
        }
    }

    fn describe_overridden_equals(&self, out: &mut String) {
        out.push_str(if self.ignore_all_overridden_equals {
            "- no overridden equals methods were used in the comparison (except for built-in types)"
        } else {
            "- overridden equals methods were used in the comparison"
        });
        if !self.is_configured_to_ignore_some_but_not_all_overridden_equals() {
            out.push('\n');
            return;
        }
        out.push_str(" except for:\n");
        if !self.ignored_overridden_equals_for_fields.is_empty() {
            let _ = writeln!(
                out,
                "{INDENT_LEVEL_2} the following fields: {}",
                join(self.ignored_overridden_equals_for_fields.iter().map(String::as_str))
            );
        }
        if !self.ignored_overridden_equals_for_types.is_empty() {
            let _ = writeln!(
                out,
                "{INDENT_LEVEL_2} the following types: {}",
                join(self.ignored_overridden_equals_for_types.iter().map(String::as_str))
            );
        }
        if !self.ignored_overridden_equals_for_fields_regexes.is_empty() {
            let _ = writeln!(
                out,
                "{INDENT_LEVEL_2} the fields matching the following regexes: {}",
                join_regexes(&self.ignored_overridden_equals_for_fields_regexes)
            );
        }
    }

    fn describe_ordering(&self, out: &mut String) {
        if self.ignore_collection_order {
            out.push_str("- collection order was ignored in all fields in the comparison\n");
        }
        if !self.ignored_collection_order_in_fields.is_empty() {
            let _ = writeln!(
                out,
                "- collection order was ignored in the following fields in the comparison: {}",
                join(self.ignored_collection_order_in_fields.iter().map(String::as_str))
            );
        }
        if !self.ignored_collection_order_in_fields_regexes.is_empty() {
            let _ = writeln!(
                out,
                "- collection order was ignored in the fields matching the following regexes in the comparison: {}",
                join_regexes(&self.ignored_collection_order_in_fields_regexes)
            );
        }
        if self.ignore_array_order {
            out.push_str("- array order was ignored in all fields in the comparison\n");
        }
    }

    fn describe_comparators(&self, out: &mut String) {
        if !self.type_comparators.is_empty() {
            out.push_str("- these types were compared with the following comparators:\n");
            for ((actual, expected), comparator) in self.type_comparators.pair_comparators() {
                let _ = writeln!(out, "{INDENT_LEVEL_2} {actual} vs {expected} -> {comparator}");
            }
            for (type_name, comparator) in self.type_comparators.type_comparators() {
                let _ = writeln!(out, "{INDENT_LEVEL_2} {type_name} -> {comparator}");
            }
        }
        if self.field_comparators.is_empty() {
            return;
        }
        let has_field_comparators = self.field_comparators.field_comparators().next().is_some();
        let has_regex_comparators = self.field_comparators.has_regex_comparators();
        if has_field_comparators {
            out.push_str("- these fields were compared with the following comparators:\n");
            for (field, comparator) in self.field_comparators.field_comparators() {
                let _ = writeln!(out, "{INDENT_LEVEL_2} {field} -> {comparator}");
            }
        }
        if has_regex_comparators {
            out.push_str("- the fields matching these regexes were compared with the following comparators:\n");
            let mut lines: Vec<String> = self
                .field_comparators
                .regex_comparators()
                .map(|(regexes, comparator)| {
                    format!("{INDENT_LEVEL_2} [{}] -> {comparator}", join_regexes(regexes))
                })
                .collect();
            lines.sort();
            for line in lines {
                let _ = writeln!(out, "{line}");
            }
        }
        if has_field_comparators && has_regex_comparators {
            out.push_str("- field comparators take precedence over regex field matching comparators.\n");
        }
        if !self.type_comparators.is_empty() {
            out.push_str("- field comparators take precedence over type comparators.\n");
        }
    }

    fn describe_type_checking(&self, out: &mut String) {
        out.push_str(if self.strict_type_checking {
            "- actual and expected objects and their fields were considered different when of incompatible types (i.e. expected type does not extend actual's type) even if all their fields match (call strict_type_checking(false) to change that behavior).\n"
        } else {
            "- actual and expected objects and their fields were compared field by field recursively even if they were not of the same type (call strict_type_checking(true) to change that behavior).\n"
        });
    }

    fn describe_messages(&self, out: &mut String) {
        if !self.field_messages.is_empty() {
            out.push_str("- these fields had overridden error messages:\n");
            let _ = writeln!(
                out,
                "{INDENT_LEVEL_2} {}",
                join(self.field_messages.entries().map(|(field, _)| field))
            );
            if !self.type_messages.is_empty() {
                out.push_str("- field custom messages take precedence over type messages.\n");
            }
        }
        if !self.type_messages.is_empty() {
            out.push_str("- these types had overridden error messages:\n");
            let _ = writeln!(
                out,
                "{INDENT_LEVEL_2} {}",
                join(self.type_messages.entries().map(|(type_name, _)| type_name))
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::comparator::Comparator;

    use super::*;

    #[test]
    fn default_configuration() {
        let description = RecursiveComparisonConfig::default().multi_line_description();
        assert_eq!(
            description,
            "- no overridden equals methods were used in the comparison (except for built-in types)\n\
             - actual and expected objects and their fields were compared field by field recursively even if they were not of the same type (call strict_type_checking(true) to change that behavior).\n\
             - the introspection strategy used was: comparing fields\n"
        );
    }

    #[test]
    fn lists_active_rules() {
        let mut config = RecursiveComparisonConfig::new();
        config
            .ignore_fields(["id", "audit"])
            .compare_only_fields(["name.first"])
            .use_overridden_equals()
            .ignore_overridden_equals_for_types(["Money"])
            .ignore_collection_order(true)
            .register_comparator_for_fields(Comparator::new("lenient", |_, _| Ok(Ordering::Equal)), ["age"])
            .register_comparator_for_type(Comparator::new("by value", |_, _| Ok(Ordering::Equal)), "f64")
            .register_error_message_for_fields(Some("check the age"), ["age"]);
        config
            .ignore_fields_matching_regexes(["tmp.*"])
            .unwrap();

        let description = config.multi_line_description();
        for line in [
            "- the following fields were ignored in the comparison: audit, id\n",
            "- the fields matching the following regexes were ignored in the comparison: tmp.*\n",
            "- the comparison was performed on the following fields: name.first\n",
            "- overridden equals methods were used in the comparison except for:\n  - the following types: Money\n",
            "- collection order was ignored in all fields in the comparison\n",
            "- these types were compared with the following comparators:\n  - f64 -> by value\n",
            "- these fields were compared with the following comparators:\n  - age -> lenient\n",
            "- field comparators take precedence over type comparators.\n",
            "- these fields had overridden error messages:\n  - age\n",
        ] {
            assert!(description.contains(line), "missing {line:?} in:\n{description}");
        }
    }
}
