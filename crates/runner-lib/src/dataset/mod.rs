//! Test-data loading and normalization
//!
//! Raw JSON files come in two orientations. Each file is parsed, its
//! orientation detected explicitly, and the result normalized into a
//! [`Dataset`]. All files of a directory are then concatenated.

mod loader;
mod raw;
mod table;

pub use loader::{DatasetLoader, TEST_DATA_EXTENSION};
pub use raw::{RawTable, ShapeError};
pub use table::{Cell, Dataset};
