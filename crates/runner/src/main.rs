//! Batch Runner - one-shot car price category prediction
//!
//! Picks the newest model artifact under `data/models`, predicts over every
//! JSON file in `data/test` and writes the result to `data/predictions`.
//! Exits non-zero when any stage fails.

use anyhow::Result;
use runner_lib::PipelineOrchestrator;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use crate::config::{LogFormat, RunnerConfig};

fn main() -> Result<()> {
    let config = RunnerConfig::load()?;
    init_tracing(config.log_format);

    info!(project_root = %config.path.display(), "Starting batch-runner");

    let orchestrator = PipelineOrchestrator::new(config.pipeline_config());
    orchestrator.run()?;

    Ok(())
}

/// Initialize tracing with the configured output format and env filter
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init(),
    }
}
