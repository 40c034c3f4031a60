//! Differences found by a comparison.

use std::cmp::Ordering;

use deepcmp_types::{Representation, Value};
use serde::Serialize;

use crate::dual_value::DualValue;

/// Message used for differences below the root. Placeholders: `{path}`,
/// `{actual}`, `{expected}` and `{info}` (the optional description on its
/// own line).
pub const DEFAULT_TEMPLATE: &str =
    "field/property '{path}' differ:\n- actual value  : {actual}\n- expected value: {expected}{info}";

/// Message used for differences between the compared values themselves.
pub const TOP_LEVEL_TEMPLATE: &str =
    "Top level actual and expected objects differ:\n- actual value  : {actual}\n- expected value: {expected}{info}";

/// Message used for key mismatches in sorted maps. Adds `{actual_key}` and
/// `{expected_key}` to the default placeholders.
pub const MAP_KEY_TEMPLATE: &str = "field/property '{path}' differ:\n- actual value  : {actual}\n- expected value: {expected}\nmap key difference:\n- actual key  : {actual_key}\n- expected key: {expected_key}";

/// The keys found at the same position of two sorted maps.
#[derive(Clone, Debug)]
pub struct KeyMismatch {
    pub actual_key: Value,
    pub expected_key: Value,
}

/// One reason the compared graphs are not equivalent.
#[derive(Clone, Debug)]
pub struct ComparisonDifference {
    decomposed_path: Vec<String>,
    concatenated_path: String,
    actual: Value,
    expected: Value,
    description: Option<String>,
    template: String,
    key_mismatch: Option<KeyMismatch>,
}

impl ComparisonDifference {
    /// A difference on `dual` with the default message.
    pub fn new(dual: &DualValue) -> Self {
        Self::from_parts(dual, None, None)
    }

    /// A difference on `dual` explained by `description`.
    pub fn with_description(dual: &DualValue, description: impl Into<String>) -> Self {
        Self::from_parts(dual, Some(description.into()), None)
    }

    /// `custom_message`, when given, replaces the default template.
    pub fn from_parts(
        dual: &DualValue,
        description: Option<String>,
        custom_message: Option<String>,
    ) -> Self {
        let location = dual.location();
        let template = custom_message.unwrap_or_else(|| {
            if location.is_root() {
                TOP_LEVEL_TEMPLATE.to_string()
            } else {
                DEFAULT_TEMPLATE.to_string()
            }
        });
        Self {
            decomposed_path: location.decomposed_path().to_vec(),
            concatenated_path: location.display_path(),
            actual: dual.actual().clone(),
            expected: dual.expected().clone(),
            description,
            template,
            key_mismatch: None,
        }
    }

    /// The keys at the same position of the sorted maps of `dual` differ.
    pub fn key_difference(dual: &DualValue, actual_key: Value, expected_key: Value) -> Self {
        Self {
            template: MAP_KEY_TEMPLATE.to_string(),
            key_mismatch: Some(KeyMismatch {
                actual_key,
                expected_key,
            }),
            ..Self::new(dual)
        }
    }

    pub fn decomposed_path(&self) -> &[String] {
        &self.decomposed_path
    }

    /// The display path, `children[2].name`. Empty at the root.
    pub fn path(&self) -> &str {
        &self.concatenated_path
    }

    pub fn actual(&self) -> &Value {
        &self.actual
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn key_mismatch(&self) -> Option<&KeyMismatch> {
        self.key_mismatch.as_ref()
    }

    pub fn is_key_difference(&self) -> bool {
        self.key_mismatch.is_some()
    }

    /// Path segments concatenated without separators: `children[2]name`.
    fn sort_key(&self) -> String {
        self.decomposed_path.concat()
    }

    /// The order differences are reported in.
    pub fn path_order(&self, other: &ComparisonDifference) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.decomposed_path.cmp(&other.decomposed_path))
            .then_with(|| self.description.cmp(&other.description))
    }

    /// The difference rendered through its template.
    pub fn multi_line_description(&self, representation: &dyn Representation) -> String {
        let actual = representation.to_string_of(&self.actual);
        let expected = representation.to_string_of(&self.expected);
        let info = self
            .description
            .as_ref()
            .map(|d| format!("\n{d}"))
            .unwrap_or_default();
        let (actual_key, expected_key) = match &self.key_mismatch {
            Some(keys) => (
                representation.to_string_of(&keys.actual_key),
                representation.to_string_of(&keys.expected_key),
            ),
            None => (String::new(), String::new()),
        };
        render_template(
            &self.template,
            &[
                ("path", self.concatenated_path.as_str()),
                ("actual", actual.as_str()),
                ("expected", expected.as_str()),
                ("info", info.as_str()),
                ("actual_key", actual_key.as_str()),
                ("expected_key", expected_key.as_str()),
            ],
        )
    }

    /// A flat, serializable view of the difference.
    pub fn summarize(&self, representation: &dyn Representation) -> DifferenceSummary {
        DifferenceSummary {
            path: self.concatenated_path.clone(),
            actual: representation.to_string_of(&self.actual),
            expected: representation.to_string_of(&self.expected),
            description: self.description.clone(),
            actual_key: self
                .key_mismatch
                .as_ref()
                .map(|k| representation.to_string_of(&k.actual_key)),
            expected_key: self
                .key_mismatch
                .as_ref()
                .map(|k| representation.to_string_of(&k.expected_key)),
        }
    }
}

/// Serializable rendering of a [`ComparisonDifference`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DifferenceSummary {
    pub path: String,
    pub actual: String,
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_key: Option<String>,
}

/// Substitute `{name}` placeholders in one pass. Unknown placeholders and
/// lone braces are kept as they are.
fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replacement = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use deepcmp_types::{FieldLocation, StandardRepresentation};

    use super::*;

    fn dual(path: &[&str], actual: Value, expected: Value) -> DualValue {
        DualValue::new(
            FieldLocation::new(path.iter().map(|s| s.to_string()).collect()),
            actual,
            expected,
        )
    }

    #[test]
    fn default_message() {
        let difference = ComparisonDifference::new(&dual(
            &["children", "[2]", "name"],
            Value::from("Tim"),
            Value::from("Tom"),
        ));
        assert_eq!(difference.path(), "children[2].name");
        assert_eq!(
            difference.multi_line_description(&StandardRepresentation::default()),
            "field/property 'children[2].name' differ:\n- actual value  : \"Tim\"\n- expected value: \"Tom\""
        );
    }

    #[test]
    fn top_level_message_with_description() {
        let difference = ComparisonDifference::with_description(
            &dual(&[], Value::from(1), Value::from(2)),
            "some explanation",
        );
        assert_eq!(
            difference.multi_line_description(&StandardRepresentation::default()),
            "Top level actual and expected objects differ:\n- actual value  : 1\n- expected value: 2\nsome explanation"
        );
    }

    #[test]
    fn custom_message_replaces_template() {
        let difference = ComparisonDifference::from_parts(
            &dual(&["age"], Value::from(1), Value::from(2)),
            Some("ignored in custom message".to_string()),
            Some("age must match, got {actual}".to_string()),
        );
        assert_eq!(
            difference.multi_line_description(&StandardRepresentation::default()),
            "age must match, got 1"
        );
    }

    #[test]
    fn key_difference_message() {
        let maps = dual(
            &["scores"],
            Value::sorted_map([(Value::from("a"), Value::from(1))]),
            Value::sorted_map([(Value::from("b"), Value::from(1))]),
        );
        let difference = ComparisonDifference::key_difference(&maps, Value::from("a"), Value::from("b"));
        assert!(difference.is_key_difference());
        let text = difference.multi_line_description(&StandardRepresentation::default());
        assert!(text.ends_with("map key difference:\n- actual key  : \"a\"\n- expected key: \"b\""));
    }

    #[test]
    fn ordering_concatenates_segments() {
        let a_b = ComparisonDifference::new(&dual(&["a", "b"], Value::Null, Value::from(1)));
        let aa = ComparisonDifference::new(&dual(&["aa"], Value::Null, Value::from(1)));
        let a = ComparisonDifference::new(&dual(&["a"], Value::Null, Value::from(1)));

        let mut differences = vec![a_b, aa, a];
        differences.sort_by(ComparisonDifference::path_order);
        let paths: Vec<_> = differences.iter().map(|d| d.path().to_string()).collect();
        assert_eq!(paths, vec!["a", "aa", "a.b"]);
    }

    #[test]
    fn template_rendering_is_single_pass() {
        let rendered = render_template("{a} {b} {c} {", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(rendered, "{b} B {c} {");
    }

    #[test]
    fn summary_serializes() {
        let difference = ComparisonDifference::with_description(
            &dual(&["age"], Value::from(10), Value::from(11)),
            "why",
        );
        let summary = difference.summarize(&StandardRepresentation::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["path"], "age");
        assert_eq!(json["actual"], "10");
        assert_eq!(json["description"], "why");
        assert!(json.get("actual_key").is_none());
    }
}
