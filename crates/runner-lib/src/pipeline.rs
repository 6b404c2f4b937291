//! End-to-end prediction run
//!
//! resolve artifact -> load dataset -> run inference -> write results.
//! The run is all-or-nothing: the first failing stage is logged once and
//! its error returned unchanged, nothing is persisted.

use crate::artifact::{ArtifactResolver, DEFAULT_ARTIFACT_EXTENSION, DEFAULT_ARTIFACT_PREFIX};
use crate::dataset::DatasetLoader;
use crate::error::Result;
use crate::inference::InferenceRunner;
use crate::models::RunReport;
use crate::observability::{RunLogger, Stage};
use crate::writer::{ResultWriter, DEFAULT_PREDICTION_COLUMN};
use std::path::{Path, PathBuf};
use std::time::Instant;

const RUNNER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory layout and naming used by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub project_root: PathBuf,
    pub models_dir: PathBuf,
    pub test_dir: PathBuf,
    pub predictions_dir: PathBuf,
    pub artifact_prefix: String,
    pub artifact_extension: String,
    pub prediction_column: String,
}

impl PipelineConfig {
    /// Resolve `data/models`, `data/test` and `data/predictions` under `root`
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();
        let data = project_root.join("data");
        Self {
            models_dir: data.join("models"),
            test_dir: data.join("test"),
            predictions_dir: data.join("predictions"),
            project_root,
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            prediction_column: DEFAULT_PREDICTION_COLUMN.to_string(),
        }
    }

    pub fn with_artifact_pattern(
        mut self,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        self.artifact_prefix = prefix.into();
        self.artifact_extension = extension.into();
        self
    }

    pub fn with_prediction_column(mut self, column: impl Into<String>) -> Self {
        self.prediction_column = column.into();
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_root(".")
    }
}

/// Sequences the four pipeline stages for one run
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    resolver: ArtifactResolver,
    loader: DatasetLoader,
    runner: InferenceRunner,
    writer: ResultWriter,
    logger: RunLogger,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            resolver: ArtifactResolver::new(
                config.artifact_prefix.clone(),
                config.artifact_extension.clone(),
            ),
            loader: DatasetLoader::new(),
            runner: InferenceRunner::new(),
            writer: ResultWriter::new(config.prediction_column.clone()),
            logger: RunLogger::new(config.project_root.display().to_string()),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one full run
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        self.logger.log_run_started(RUNNER_VERSION);

        let artifact = self.stage(Stage::ResolveArtifact, || {
            self.resolver.resolve(&self.config.models_dir)
        })?;

        let (input_files, dataset) = self.stage(Stage::LoadDataset, || {
            let files = self.loader.list_files(&self.config.test_dir)?;
            let dataset = self.loader.load_files(&files)?;
            Ok((files.len(), dataset))
        })?;

        let predictions = self.stage(Stage::Inference, || {
            self.runner.predict(&artifact, &dataset)
        })?;

        let output_path = self.stage(Stage::WriteResults, || {
            self.writer.write(&predictions, &self.config.predictions_dir)
        })?;

        let report = RunReport {
            artifact_path: artifact.path.clone(),
            artifact_checksum: artifact.checksum.clone(),
            input_files,
            rows: dataset.n_rows(),
            columns: dataset.n_columns(),
            output_path,
        };
        self.logger
            .log_run_completed(&report, start.elapsed().as_millis() as u64);

        Ok(report)
    }

    fn stage<T>(&self, stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
        f().map_err(|err| {
            self.logger.log_run_failed(stage, &err);
            err
        })
    }
}

/// Run the pipeline rooted at `root` with default naming
pub fn run_at(root: &Path) -> Result<RunReport> {
    PipelineOrchestrator::new(PipelineConfig::from_root(root)).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_root() {
        let config = PipelineConfig::from_root("/srv/cars");
        assert_eq!(config.models_dir, PathBuf::from("/srv/cars/data/models"));
        assert_eq!(config.test_dir, PathBuf::from("/srv/cars/data/test"));
        assert_eq!(config.predictions_dir, PathBuf::from("/srv/cars/data/predictions"));
        assert_eq!(config.artifact_prefix, "cars_pipe_");
        assert_eq!(config.prediction_column, "predicted_price_category");
    }

    #[test]
    fn test_config_overrides() {
        let config = PipelineConfig::default()
            .with_artifact_pattern("price_", "json")
            .with_prediction_column("category");
        assert_eq!(config.project_root, PathBuf::from("."));
        assert_eq!(config.artifact_extension, "json");
        assert_eq!(config.prediction_column, "category");

        let orchestrator = PipelineOrchestrator::new(config.clone());
        assert_eq!(orchestrator.config(), &config);
    }
}
