//! Side-by-side rows for displaying a diff.

use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// How a row differs between the two texts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTag {
    Equal,
    Change,
    Delete,
    Insert,
}

/// One line of the original text next to one line of the revised text.
/// The side that has no line holds an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    pub tag: RowTag,
    pub old_line: String,
    pub new_line: String,
}

impl DiffRow {
    fn new(tag: RowTag, old_line: &str, new_line: &str) -> Self {
        Self {
            tag,
            old_line: old_line.to_string(),
            new_line: new_line.to_string(),
        }
    }
}

/// Produces [`DiffRow`]s from two texts.
#[derive(Clone, Debug, Default)]
pub struct DiffRowGenerator {
    ignore_whitespace: bool,
}

impl DiffRowGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat lines differing only in surrounding whitespace as equal.
    pub fn ignore_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_whitespace = ignore;
        self
    }

    fn normalize<'a>(&self, line: &'a str) -> &'a str {
        if self.ignore_whitespace {
            line.trim()
        } else {
            line
        }
    }

    pub fn generate_rows(&self, original: &[String], revised: &[String]) -> Vec<DiffRow> {
        let old_keys: Vec<&str> = original.iter().map(|l| self.normalize(l)).collect();
        let new_keys: Vec<&str> = revised.iter().map(|l| self.normalize(l)).collect();

        let mut rows = Vec::with_capacity(original.len().max(revised.len()));
        for op in capture_diff_slices(Algorithm::Myers, &old_keys, &new_keys) {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => {
                    for (o, n) in old_range.zip(new_range) {
                        rows.push(DiffRow::new(RowTag::Equal, &original[o], &revised[n]));
                    }
                }
                DiffTag::Delete => {
                    for o in old_range {
                        rows.push(DiffRow::new(RowTag::Delete, &original[o], ""));
                    }
                }
                DiffTag::Insert => {
                    for n in new_range {
                        rows.push(DiffRow::new(RowTag::Insert, "", &revised[n]));
                    }
                }
                DiffTag::Replace => {
                    let paired = old_range.len().min(new_range.len());
                    for i in 0..old_range.len().max(new_range.len()) {
                        let row = if i < paired {
                            DiffRow::new(
                                RowTag::Change,
                                &original[old_range.start + i],
                                &revised[new_range.start + i],
                            )
                        } else if i < old_range.len() {
                            DiffRow::new(RowTag::Delete, &original[old_range.start + i], "")
                        } else {
                            DiffRow::new(RowTag::Insert, "", &revised[new_range.start + i])
                        };
                        rows.push(row);
                    }
                }
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::split_lines;

    fn tags(rows: &[DiffRow]) -> Vec<RowTag> {
        rows.iter().map(|r| r.tag).collect()
    }

    #[test]
    fn equal_texts_give_equal_rows() {
        let text = split_lines("a\nb");
        let rows = DiffRowGenerator::new().generate_rows(&text, &text);
        assert_eq!(tags(&rows), vec![RowTag::Equal, RowTag::Equal]);
    }

    #[test]
    fn uneven_replacement_spills_into_insert() {
        let rows = DiffRowGenerator::new()
            .generate_rows(&split_lines("a\nb\nz"), &split_lines("a\nx\ny\nz"));
        assert_eq!(
            tags(&rows),
            vec![RowTag::Equal, RowTag::Change, RowTag::Insert, RowTag::Equal]
        );
        assert_eq!(rows[1].old_line, "b");
        assert_eq!(rows[1].new_line, "x");
        assert_eq!(rows[2].old_line, "");
    }

    #[test]
    fn whitespace_can_be_ignored() {
        let original = split_lines("a\n  b");
        let revised = split_lines("a\nb  ");
        assert_eq!(
            tags(&DiffRowGenerator::new().generate_rows(&original, &revised)),
            vec![RowTag::Equal, RowTag::Change]
        );
        let rows = DiffRowGenerator::new()
            .ignore_whitespace(true)
            .generate_rows(&original, &revised);
        assert_eq!(tags(&rows), vec![RowTag::Equal, RowTag::Equal]);
        assert_eq!(rows[1].old_line, "  b");
    }
}
