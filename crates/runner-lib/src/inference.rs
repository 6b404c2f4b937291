//! Runs the selected model over the whole dataset

use crate::dataset::Dataset;
use crate::error::{PipelineError, Result};
use crate::models::{ModelArtifact, PredictionBatch};
use std::time::Instant;
use tracing::{debug, warn};

/// Single call-through to the artifact's predictor, no batching or retry
#[derive(Debug, Clone, Default)]
pub struct InferenceRunner;

impl InferenceRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, artifact: &ModelArtifact, dataset: &Dataset) -> Result<PredictionBatch> {
        let start = Instant::now();

        let labels = artifact
            .predictor
            .predict(dataset)
            .map_err(|e| PipelineError::Inference {
                message: format!("{e:#}"),
            })?;

        // Row alignment is the predictor's contract; only report a mismatch
        if labels.len() != dataset.n_rows() {
            warn!(
                predictions = labels.len(),
                rows = dataset.n_rows(),
                "Prediction count does not match dataset rows"
            );
        }

        debug!(
            rows = dataset.n_rows(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            kind = artifact.predictor.kind(),
            "Inference completed"
        );

        Ok(PredictionBatch::new(labels))
    }
}
