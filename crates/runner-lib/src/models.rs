//! Core data models for the batch runner

use crate::predictor::Predictor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A selected and deserialized model artifact
pub struct ModelArtifact {
    pub path: PathBuf,
    /// Filesystem modification time, used as the version key
    pub modified: DateTime<Utc>,
    pub checksum: String,
    pub size_bytes: usize,
    pub predictor: Box<dyn Predictor>,
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("path", &self.path)
            .field("modified", &self.modified)
            .field("checksum", &self.checksum)
            .field("size_bytes", &self.size_bytes)
            .field("kind", &self.predictor.kind())
            .field("version", &self.predictor.version())
            .finish()
    }
}

/// Ordered predicted labels, one per dataset row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionBatch {
    labels: Vec<String>,
}

impl PredictionBatch {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for PredictionBatch {
    fn from(labels: Vec<String>) -> Self {
        Self::new(labels)
    }
}

/// Summary of a successful pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub artifact_path: PathBuf,
    pub artifact_checksum: String,
    pub input_files: usize,
    pub rows: usize,
    pub columns: usize,
    pub output_path: PathBuf,
}
