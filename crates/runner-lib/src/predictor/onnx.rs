//! ONNX classifier inference using tract
//!
//! The graph takes one row of numeric features (`f32[1, n]`) and returns
//! either a class index or one score per class. Rows are run one by one
//! and the winning class is mapped to its label.

use super::{numeric_cell, Predictor};
use crate::dataset::Dataset;
use anyhow::{bail, Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::debug;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based classifier over a fixed list of numeric feature columns
pub struct OnnxPredictor {
    model: TractModel,
    features: Vec<String>,
    labels: Vec<String>,
    version: Option<String>,
}

impl OnnxPredictor {
    /// Create a new predictor from model bytes
    pub fn new(
        model_bytes: &[u8],
        features: Vec<String>,
        labels: Vec<String>,
        version: Option<String>,
    ) -> Result<Self> {
        if features.is_empty() {
            bail!("onnx model declares no feature columns");
        }
        if labels.is_empty() {
            bail!("onnx model declares no labels");
        }

        let model = Self::load_model(model_bytes, features.len())?;
        Ok(Self {
            model,
            features,
            labels,
            version,
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8], num_features: usize) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    /// Convert one dataset row to the model's input tensor
    fn row_to_tensor(&self, dataset: &Dataset, columns: &[usize], row: usize) -> Result<Tensor> {
        let cells = dataset.row(row).context("row out of range")?;
        let data = columns
            .iter()
            .zip(&self.features)
            .map(|(&col, name)| {
                cells[col]
                    .as_ref()
                    .and_then(numeric_cell)
                    .map(|v| v as f32)
                    .with_context(|| format!("row {}: column '{}' is missing or not numeric", row, name))
            })
            .collect::<Result<Vec<f32>>>()?;

        let array = tract_ndarray::Array2::from_shape_vec((1, self.features.len()), data)
            .context("Failed to shape input tensor")?;
        Ok(array.into())
    }

    /// Map the model output to a class index
    fn output_to_class(&self, output: &Tensor) -> Result<usize> {
        if let Ok(view) = output.to_array_view::<i64>() {
            let class = view.iter().next().copied().context("Model returned an empty output")?;
            return usize::try_from(class).context("Model returned a negative class index");
        }

        let view = output.to_array_view::<f32>()?;
        let scores: Vec<f32> = view.iter().copied().collect();
        match scores.len() {
            0 => bail!("Model returned an empty output"),
            1 if self.labels.len() > 1 => {
                let class = scores[0].round();
                if class < 0.0 {
                    bail!("Model returned a negative class index");
                }
                Ok(class as usize)
            }
            _ => Ok(scores
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap_or(0)),
        }
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let start = Instant::now();

        let columns = self
            .features
            .iter()
            .map(|name| {
                dataset
                    .column_index(name)
                    .with_context(|| format!("dataset has no column '{}'", name))
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut labels = Vec::with_capacity(dataset.n_rows());
        for row in 0..dataset.n_rows() {
            let input = self.row_to_tensor(dataset, &columns, row)?;
            let result = self.model.run(tvec!(input.into()))?;
            let output = result.get(0).context("No output from model")?;

            let class = self.output_to_class(output)?;
            let label = self
                .labels
                .get(class)
                .with_context(|| format!("row {}: class index {} has no label", row, class))?;
            labels.push(label.clone());
        }

        debug!(
            rows = labels.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ONNX inference completed"
        );
        Ok(labels)
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
