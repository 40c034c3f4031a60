//! Line-by-line patches between two texts.
//!
//! Uses the `similar` crate (Myers diff algorithm) and groups its operations
//! into deltas, each replacing one chunk of the original text by one chunk of
//! the revised text.

use std::fmt;

use serde::Serialize;
use similar::{capture_diff_slices, Algorithm, DiffTag};

use crate::error::{DiffError, DiffResult};

/// A run of consecutive lines at a position (0-based) of a text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub position: usize,
    pub lines: Vec<String>,
}

impl Chunk {
    pub fn new(position: usize, lines: Vec<String>) -> Self {
        Self { position, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check that `target` holds this chunk's lines at its position.
    pub fn verify(&self, target: &[String]) -> DiffResult<()> {
        let end = self.position + self.lines.len();
        if end > target.len() {
            return Err(DiffError::OutOfBounds {
                line: self.position + 1,
                len: target.len(),
            });
        }
        let found = &target[self.position..end];
        if found != self.lines.as_slice() {
            return Err(DiffError::ChunkMismatch {
                line: self.position + 1,
                expected: self.lines.clone(),
                found: found.to_vec(),
            });
        }
        Ok(())
    }
}

/// What a delta does to the original text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    Change,
    Delete,
    Insert,
}

/// One difference between the original and the revised text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Delta {
    pub kind: DeltaKind,
    pub original: Chunk,
    pub revised: Chunk,
}

impl Delta {
    /// The 1-based line of the original text the delta applies to.
    pub fn line_number(&self) -> usize {
        self.original.position + 1
    }
}

fn format_lines(lines: &[String]) -> String {
    let quoted: Vec<String> = lines.iter().map(|l| format!("{l:?}")).collect();
    format!("[{}]", quoted.join(",\n   "))
}

/// Renders as a message where the original text is what was expected and
/// the revised text is what was found.
impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DeltaKind::Change => write!(
                f,
                "Changed content at line {}:\nexpecting:\n  {}\nbut was:\n  {}",
                self.line_number(),
                format_lines(&self.original.lines),
                format_lines(&self.revised.lines)
            ),
            DeltaKind::Delete => write!(
                f,
                "Missing content at line {}:\n  {}",
                self.line_number(),
                format_lines(&self.original.lines)
            ),
            DeltaKind::Insert => write!(
                f,
                "Extra content at line {}:\n  {}",
                self.line_number(),
                format_lines(&self.revised.lines)
            ),
        }
    }
}

/// The ordered deltas turning an original text into a revised one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub deltas: Vec<Delta>,
}

impl Patch {
    /// Returns `true` if both texts were identical.
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Rebuild the revised text from the original one.
    pub fn apply_to(&self, original: &[String]) -> DiffResult<Vec<String>> {
        let mut result = original.to_vec();
        // Back to front so earlier positions stay valid.
        for delta in self.deltas.iter().rev() {
            delta.original.verify(&result)?;
            let start = delta.original.position;
            let end = start + delta.original.len();
            result.splice(start..end, delta.revised.lines.iter().cloned());
        }
        Ok(result)
    }

    /// Every delta rendered, separated by blank lines.
    pub fn render(&self) -> String {
        self.deltas
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Split a text into lines, without their terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Compute the patch turning `original` into `revised`, line by line.
pub fn diff(original: &str, revised: &str) -> Patch {
    diff_lines(&split_lines(original), &split_lines(revised))
}

/// Compute the patch turning `original` into `revised`.
pub fn diff_lines(original: &[String], revised: &[String]) -> Patch {
    if original == revised {
        return Patch::default();
    }

    let deltas = capture_diff_slices(Algorithm::Myers, original, revised)
        .iter()
        .filter_map(|op| {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let kind = match tag {
                DiffTag::Equal => return None,
                DiffTag::Delete => DeltaKind::Delete,
                DiffTag::Insert => DeltaKind::Insert,
                DiffTag::Replace => DeltaKind::Change,
            };
            Some(Delta {
                kind,
                original: Chunk::new(old_range.start, original[old_range].to_vec()),
                revised: Chunk::new(new_range.start, revised[new_range].to_vec()),
            })
        })
        .collect();

    Patch { deltas }
}
