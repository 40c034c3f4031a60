//! Field locations: the position of a node inside a compared object graph.
//!
//! A location keeps two views of the same path:
//!
//! - the **decomposed path**, every segment from the root including element
//!   indices such as `[2]`, used to report where a difference was found;
//! - the **rule path**, the dotted path with index segments removed, used to
//!   match ignore, compare-only, comparator and message rules. Rules apply to
//!   a group of elements (`children.name`), never to a single element
//!   (`children[2].name`).

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use crate::error::{TypeError, TypeResult};

const SEPARATOR: char = '.';

/// Returns `true` for segments of the form `[n]`.
fn is_index_segment(segment: &str) -> bool {
    segment
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// The rule path and all its ancestors, leaf first.
fn hierarchy_of(rule_path: &str) -> Vec<String> {
    let mut hierarchy = Vec::new();
    let mut current = rule_path;
    while !current.is_empty() {
        hierarchy.push(current.to_string());
        current = match current.rfind(SEPARATOR) {
            Some(idx) => &current[..idx],
            None => "",
        };
    }
    hierarchy
}

/// An immutable path from the root of a compared graph to one of its nodes.
///
/// Equality considers the decomposed path, the rule path and the rule path
/// hierarchy, so `children[0].name` and `children[1].name` are distinct
/// locations even though they share the rule path `children.name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    decomposed_path: Vec<String>,
    rule_path: String,
    hierarchy: Vec<String>,
}

impl FieldLocation {
    /// Build a location from its segments.
    pub fn new(decomposed_path: Vec<String>) -> Self {
        let rule_path = decomposed_path
            .iter()
            .filter(|segment| !is_index_segment(segment))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".");
        let hierarchy = hierarchy_of(&rule_path);
        Self {
            decomposed_path,
            rule_path,
            hierarchy,
        }
    }

    /// The location of the compared values themselves.
    pub fn root() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a dotted path such as `name.first`. The empty string is the root.
    pub fn from_dotted(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self::new(path.split(SEPARATOR).map(str::to_string).collect())
    }

    /// The location of the child `name` of this location.
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut decomposed_path = self.decomposed_path.clone();
        decomposed_path.push(name.into());
        Self::new(decomposed_path)
    }

    /// The dotted path with index segments removed.
    pub fn rule_path(&self) -> &str {
        &self.rule_path
    }

    /// The rule path of the child `name`, without building the child.
    pub fn rule_path_for_child(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}{SEPARATOR}{name}", self.rule_path)
        }
    }

    pub fn decomposed_path(&self) -> &[String] {
        &self.decomposed_path
    }

    /// Every segment joined with dots, indices included.
    pub fn path_for_error_report(&self) -> String {
        self.decomposed_path.join(".")
    }

    /// The human-facing path: `children[2].name`.
    pub fn display_path(&self) -> String {
        self.path_for_error_report().replace(".[", "[")
    }

    /// The last segment, or the empty string for the root.
    pub fn field_name(&self) -> &str {
        self.decomposed_path.last().map(String::as_str).unwrap_or("")
    }

    pub fn is_root(&self) -> bool {
        self.rule_path.is_empty()
    }

    /// A direct field of the root.
    pub fn is_top_level_field(&self) -> bool {
        !self.is_root() && !self.rule_path.contains(SEPARATOR)
    }

    /// Whether the rule path is exactly `path`.
    pub fn exactly_matches(&self, path: &str) -> bool {
        self.rule_path == path
    }

    /// Whether both locations share the same rule path.
    pub fn exactly_matches_location(&self, other: &FieldLocation) -> bool {
        self.rule_path == other.rule_path
    }

    /// Whether `parent` is a strict ancestor of this location.
    ///
    /// Segments are compared whole, `name` is not a parent of `names.first`.
    /// The root is nobody's parent.
    pub fn has_parent(&self, parent: &FieldLocation) -> bool {
        self.rule_path
            .strip_prefix(parent.rule_path.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }

    /// Whether `child` is a strict descendant of this location.
    pub fn has_child(&self, child: &FieldLocation) -> bool {
        child.has_parent(self)
    }

    /// Whether this location or one of its ancestors has the rule path `path`.
    pub fn hierarchy_matches(&self, path: &str) -> bool {
        self.hierarchy.iter().any(|p| p == path)
    }

    /// Whether this location or one of its ancestors fully matches `pattern`.
    pub fn hierarchy_matches_pattern(&self, pattern: &PathPattern) -> bool {
        self.hierarchy.iter().any(|p| pattern.matches(p))
    }

    /// Whether the rule path fully matches `pattern`.
    pub fn matches_pattern(&self, pattern: &PathPattern) -> bool {
        pattern.matches(&self.rule_path)
    }
}

impl Default for FieldLocation {
    fn default() -> Self {
        Self::root()
    }
}

impl From<&str> for FieldLocation {
    fn from(path: &str) -> Self {
        Self::from_dotted(path)
    }
}

impl Ord for FieldLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rule_path
            .cmp(&other.rule_path)
            .then_with(|| self.decomposed_path.cmp(&other.decomposed_path))
    }
}

impl PartialOrd for FieldLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            write!(f, "<{}>", self.rule_path)
        }
    }
}

// ---------------------------------------------------------------------------
// PathPattern
// ---------------------------------------------------------------------------

/// A regular expression that must match a whole rule path or type name.
#[derive(Clone, Debug)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> TypeResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            TypeError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Compile several patterns, failing on the first invalid one.
    pub fn compile_all<I, S>(patterns: I) -> TypeResult<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns.into_iter().map(|p| Self::new(p.as_ref())).collect()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
