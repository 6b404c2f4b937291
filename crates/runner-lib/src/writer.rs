//! Persists prediction batches as timestamped single-column CSV reports

use crate::error::{PipelineError, Result};
use crate::models::PredictionBatch;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Column name of the prediction report
pub const DEFAULT_PREDICTION_COLUMN: &str = "predicted_price_category";

/// File name prefix of prediction reports
pub const REPORT_PREFIX: &str = "preds_";

/// Minute resolution. Two reports written within the same minute share a
/// file name and the later one replaces the earlier one.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Writes prediction reports into a results directory
#[derive(Debug, Clone)]
pub struct ResultWriter {
    column: String,
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new(DEFAULT_PREDICTION_COLUMN)
    }
}

impl ResultWriter {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Report file name for a generation time
    pub fn report_file_name(at: &DateTime<Local>) -> String {
        format!("{}{}.csv", REPORT_PREFIX, at.format(REPORT_TIMESTAMP_FORMAT))
    }

    /// Write `predictions` under `dir`, named after the current local time
    pub fn write(&self, predictions: &PredictionBatch, dir: &Path) -> Result<PathBuf> {
        self.write_at(predictions, dir, Local::now())
    }

    /// Write `predictions` under `dir`, named after `at`
    pub fn write_at(
        &self,
        predictions: &PredictionBatch,
        dir: &Path,
        at: DateTime<Local>,
    ) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|source| PipelineError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(Self::report_file_name(&at));
        let contents = self.render(predictions);
        save_report(&path, contents.as_bytes()).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;

        info!(
            path = %path.display(),
            rows = predictions.len(),
            "Predictions saved"
        );
        Ok(path)
    }

    /// Header line plus one line per label
    fn render(&self, predictions: &PredictionBatch) -> String {
        let mut out = String::with_capacity(self.column.len() + 1 + predictions.len() * 8);
        out.push_str(&csv_field(&self.column));
        out.push('\n');
        for label in predictions.iter() {
            out.push_str(&csv_field(label));
            out.push('\n');
        }
        out
    }
}

/// Write to a temp file first, then rename over the final path.
/// The temp file never outlives a failed save.
fn save_report(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("csv.tmp");
    let result = File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn batch(labels: &[&str]) -> PredictionBatch {
        PredictionBatch::new(labels.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_report_file_name_has_minute_resolution() {
        let at = Local.with_ymd_and_hms(2026, 10, 16, 14, 5, 59).unwrap();
        assert_eq!(ResultWriter::report_file_name(&at), "preds_202610161405.csv");
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data").join("predictions");

        let path = ResultWriter::default()
            .write(&batch(&["low", "high"]), &dir)
            .unwrap();

        assert!(path.starts_with(&dir));
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "predicted_price_category\nlow\nhigh\n");
    }

    #[test]
    fn test_write_into_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ResultWriter::new("label");
        assert!(writer.write(&batch(&["a"]), temp_dir.path()).is_ok());
        assert_eq!(writer.column(), "label");
    }

    #[test]
    fn test_same_minute_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ResultWriter::default();
        let first_at = Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 1).unwrap();
        let second_at = Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 58).unwrap();

        let first = writer
            .write_at(&batch(&["low"]), temp_dir.path(), first_at)
            .unwrap();
        let second = writer
            .write_at(&batch(&["high", "medium"]), temp_dir.path(), second_at)
            .unwrap();

        assert_eq!(first, second);
        let files: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(
            fs::read_to_string(&second).unwrap(),
            "predicted_price_category\nhigh\nmedium\n"
        );
    }

    #[test]
    fn test_labels_are_quoted_when_needed() {
        assert_eq!(csv_field("low"), "low");
        assert_eq!(csv_field("low, maybe"), "\"low, maybe\"");
        assert_eq!(csv_field("6\" wide"), "\"6\"\" wide\"");
    }

    #[test]
    fn test_write_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("predictions");
        fs::write(&blocker, "not a directory").unwrap();

        let result = ResultWriter::default().write(&batch(&["low"]), &blocker);
        assert!(matches!(result, Err(PipelineError::Write { .. })));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let at = Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        // A non-empty directory squatting on the report name cannot be renamed over
        let squatter = temp_dir.path().join(ResultWriter::report_file_name(&at));
        fs::create_dir(&squatter).unwrap();
        fs::write(squatter.join("keep"), "x").unwrap();

        let result = ResultWriter::default().write_at(&batch(&["low"]), temp_dir.path(), at);

        match result {
            Err(PipelineError::Write { path, .. }) => assert_eq!(path, squatter),
            other => panic!("expected Write error, got {:?}", other),
        }
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["preds_202610160930.csv".to_string()]);
        assert!(squatter.join("keep").exists());
    }
}
