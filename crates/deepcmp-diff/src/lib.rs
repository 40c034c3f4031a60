//! Line-oriented text diff.
//!
//! Used by comparison reports to show where two multi-line strings diverge.
//!
//! # Key Types
//!
//! - [`Patch`] / [`Delta`] / [`Chunk`] -- Deltas turning an original text into a revised one
//! - [`DiffRowGenerator`] / [`DiffRow`] -- Side-by-side rows for display

pub mod error;
pub mod patch;
pub mod rows;

pub use error::{DiffError, DiffResult};
pub use patch::{diff, diff_lines, split_lines, Chunk, Delta, DeltaKind, Patch};
pub use rows::{DiffRow, DiffRowGenerator, RowTag};
