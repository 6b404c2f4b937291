//! Runner configuration

use anyhow::{Context, Result};
use runner_lib::artifact::{DEFAULT_ARTIFACT_EXTENSION, DEFAULT_ARTIFACT_PREFIX};
use runner_lib::writer::DEFAULT_PREDICTION_COLUMN;
use runner_lib::PipelineConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix, e.g. `PROJECT_PATH`
const ENV_PREFIX: &str = "PROJECT";

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Runner configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// Project root holding `data/models`, `data/test` and `data/predictions`
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// File name prefix of model artifacts
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// File extension of model artifacts
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,

    /// Column name of the prediction report
    #[serde(default = "default_prediction_column")]
    pub prediction_column: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_artifact_prefix() -> String {
    DEFAULT_ARTIFACT_PREFIX.to_string()
}

fn default_artifact_extension() -> String {
    DEFAULT_ARTIFACT_EXTENSION.to_string()
}

fn default_prediction_column() -> String {
    DEFAULT_PREDICTION_COLUMN.to_string()
}

impl RunnerConfig {
    /// Load configuration from `PROJECT_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_environment(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Pipeline layout derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::from_root(&self.path)
            .with_artifact_pattern(&self.artifact_prefix, &self.artifact_extension)
            .with_prediction_column(&self.prediction_column)
    }
}
