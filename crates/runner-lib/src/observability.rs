//! Run-level structured logging

use crate::error::{error_chain, PipelineError};
use crate::models::RunReport;
use std::fmt;
use tracing::{error, info};

/// Pipeline stage, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveArtifact,
    LoadDataset,
    Inference,
    WriteResults,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ResolveArtifact => "resolve_artifact",
            Stage::LoadDataset => "load_dataset",
            Stage::Inference => "inference",
            Stage::WriteResults => "write_results",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured logger for run events
///
/// Provides consistent, machine-readable start/finish/failure events
/// tagged with the project root the run operates on.
#[derive(Clone)]
pub struct RunLogger {
    project_root: String,
}

impl RunLogger {
    pub fn new(project_root: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Log run start
    pub fn log_run_started(&self, runner_version: &str) {
        info!(
            event = "run_started",
            project_root = %self.project_root,
            runner_version = %runner_version,
            "Prediction run started"
        );
    }

    /// Log a fully successful run
    pub fn log_run_completed(&self, report: &RunReport, elapsed_ms: u64) {
        info!(
            event = "run_completed",
            project_root = %self.project_root,
            artifact = %report.artifact_path.display(),
            input_files = report.input_files,
            rows = report.rows,
            columns = report.columns,
            output = %report.output_path.display(),
            elapsed_ms = elapsed_ms,
            "Prediction completed successfully"
        );
    }

    /// Log the failure that aborted a run, causes included
    pub fn log_run_failed(&self, stage: Stage, err: &PipelineError) {
        let error = error_chain(err);
        error!(
            event = "run_failed",
            project_root = %self.project_root,
            stage = %stage,
            error = %error,
            "Error during prediction: {}",
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::ResolveArtifact.to_string(), "resolve_artifact");
        assert_eq!(Stage::WriteResults.as_str(), "write_results");
    }

    #[test]
    fn test_run_logger_creation() {
        let logger = RunLogger::new("/srv/project");
        assert_eq!(logger.project_root, "/srv/project");
    }
}
