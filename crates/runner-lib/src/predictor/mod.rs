//! Predictors decoded from model artifacts

mod onnx;
mod threshold;

pub use onnx::OnnxPredictor;
pub use threshold::ThresholdPredictor;

use crate::dataset::Dataset;
use anyhow::Result;
use serde_json::Value;

/// Trait for prediction implementations
pub trait Predictor: Send + Sync {
    /// Predict one label per dataset row, in row order
    fn predict(&self, dataset: &Dataset) -> Result<Vec<String>>;

    /// Short name of the predictor kind
    fn kind(&self) -> &'static str;

    /// Version recorded in the artifact, if any
    fn version(&self) -> Option<&str>;
}

/// Read a cell as a finite number. Numeric strings are accepted,
/// booleans and `"NaN"`/`"inf"` spellings are not.
pub(crate) fn numeric_cell(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}
