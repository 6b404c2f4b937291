//! Error taxonomy for a pipeline run
//!
//! Every variant is fatal to the run. Errors are logged once by the
//! orchestrator and then returned to the caller unchanged.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one of the pipeline stages
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Model directory is missing, empty, or nothing matches the artifact pattern
    #[error("no model artifact found in {}", dir.display())]
    NoArtifactFound {
        dir: PathBuf,
        /// Set when the directory itself could not be listed
        #[source]
        source: Option<io::Error>,
    },

    /// The selected artifact could not be read or decoded
    #[error("model artifact {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Test-data directory is missing or holds no JSON files
    #[error("no test data files found in {}", dir.display())]
    NoTestData {
        dir: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// A test-data file matches neither supported JSON orientation
    #[error("test data file {} has an unsupported shape: {reason}", path.display())]
    DataShape { path: PathBuf, reason: String },

    /// The predictor failed while running on the dataset
    #[error("inference failed: {message}")]
    Inference { message: String },

    /// Persisting the prediction report failed
    #[error("failed to write predictions to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Render an error followed by each of its causes, `: `-separated
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cause = e.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_path() {
        let err = PipelineError::NoArtifactFound {
            dir: PathBuf::from("/data/models"),
            source: None,
        };
        assert_eq!(err.to_string(), "no model artifact found in /data/models");

        let err = PipelineError::DataShape {
            path: PathBuf::from("/data/test/a.json"),
            reason: "top-level value is a number".to_string(),
        };
        assert!(err.to_string().contains("/data/test/a.json"));
        assert!(err.to_string().contains("top-level value is a number"));
    }

    #[test]
    fn test_write_error_keeps_io_source() {
        use std::error::Error as _;

        let err = PipelineError::Write {
            path: PathBuf::from("/readonly/preds.csv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert_eq!(
            error_chain(&err),
            "failed to write predictions to /readonly/preds.csv: denied"
        );
    }

    #[test]
    fn test_listing_failure_is_carried_as_source() {
        use std::error::Error as _;

        let err = PipelineError::NoTestData {
            dir: PathBuf::from("/data/test"),
            source: Some(io::Error::new(io::ErrorKind::NotFound, "no such directory")),
        };
        assert_eq!(err.to_string(), "no test data files found in /data/test");
        assert!(err.source().is_some());
        assert_eq!(
            error_chain(&err),
            "no test data files found in /data/test: no such directory"
        );

        let err = PipelineError::NoTestData {
            dir: PathBuf::from("/data/test"),
            source: None,
        };
        assert!(err.source().is_none());
        assert_eq!(error_chain(&err), err.to_string());
    }
}
