//! Loads every JSON file of a directory into one dataset

use super::raw::RawTable;
use super::table::Dataset;
use crate::error::{PipelineError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension of test-data files
pub const TEST_DATA_EXTENSION: &str = "json";

/// Reads a directory of heterogeneous JSON files into a single [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and concatenate all JSON files directly under `dir`
    pub fn load(&self, dir: &Path) -> Result<Dataset> {
        let files = self.list_files(dir)?;
        self.load_files(&files)
    }

    /// List JSON files directly under `dir`, without recursion.
    ///
    /// Hidden files (names starting with `.`) are skipped. Files come back
    /// in directory enumeration order, which is filesystem-dependent and
    /// not sorted.
    pub fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| PipelineError::NoTestData {
            dir: dir.to_path_buf(),
            source: Some(e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            let is_json = path
                .extension()
                .map(|ext| ext == TEST_DATA_EXTENSION)
                .unwrap_or(false);
            if !hidden && is_json && path.is_file() {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(PipelineError::NoTestData {
                dir: dir.to_path_buf(),
                source: None,
            });
        }

        Ok(files)
    }

    /// Normalize each file and concatenate them in the given order.
    ///
    /// The first file matching neither orientation aborts the whole load.
    pub fn load_files(&self, files: &[PathBuf]) -> Result<Dataset> {
        let tables = files
            .iter()
            .map(|path| self.read_file(path))
            .collect::<Result<Vec<_>>>()?;

        let dataset = Dataset::concat(tables);
        info!(
            files = files.len(),
            rows = dataset.n_rows(),
            columns = dataset.n_columns(),
            "Test data loaded"
        );
        Ok(dataset)
    }

    /// Parse one file and normalize it according to its detected orientation
    pub fn read_file(&self, path: &Path) -> Result<Dataset> {
        let shape_error = |reason: String| PipelineError::DataShape {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| shape_error(format!("failed to read file: {e}")))?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| shape_error(format!("invalid JSON: {e}")))?;
        let raw = RawTable::detect(value).map_err(|e| shape_error(e.to_string()))?;

        let orientation = raw.orientation();
        let table = raw.into_dataset();
        debug!(
            path = %path.display(),
            orientation = orientation,
            rows = table.n_rows(),
            columns = table.n_columns(),
            "Normalized test data file"
        );
        Ok(table)
    }
}
