//! Batch inference runner library
//!
//! This crate provides the core functionality for:
//! - Locating the most recent model artifact
//! - Loading and normalizing heterogeneous JSON test data
//! - Running inference over the normalized dataset
//! - Writing timestamped prediction reports
//! - Orchestrating and logging a full run

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod predictor;
pub mod writer;

pub use error::{PipelineError, Result};
pub use models::*;
pub use observability::{RunLogger, Stage};
pub use pipeline::{run_at, PipelineConfig, PipelineOrchestrator};
