//! Serialized form of a trained model artifact

use crate::predictor::{OnnxPredictor, Predictor, ThresholdPredictor};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Model description stored in an artifact file, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Bins one numeric feature into labelled ranges
    Threshold {
        feature: String,
        bounds: Vec<f64>,
        labels: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
    /// ONNX classifier graph stored next to the artifact
    Onnx {
        /// Graph file, relative paths resolve against the artifact's directory
        graph: PathBuf,
        features: Vec<String>,
        labels: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
}

impl ModelSpec {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("Failed to deserialize model artifact")
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).context("Failed to serialize model artifact")
    }

    /// Build the described predictor
    pub fn into_predictor(self, base_dir: &Path) -> Result<Box<dyn Predictor>> {
        match self {
            ModelSpec::Threshold {
                feature,
                bounds,
                labels,
                version,
            } => Ok(Box::new(ThresholdPredictor::new(feature, bounds, labels, version)?)),
            ModelSpec::Onnx {
                graph,
                features,
                labels,
                version,
            } => {
                let graph_path = if graph.is_absolute() {
                    graph
                } else {
                    base_dir.join(graph)
                };
                let weights = fs::read(&graph_path)
                    .with_context(|| format!("Failed to read ONNX graph {:?}", graph_path))?;
                Ok(Box::new(OnnxPredictor::new(&weights, features, labels, version)?))
            }
        }
    }
}

/// Decode artifact bytes into a ready-to-use predictor
pub fn decode_artifact(bytes: &[u8], base_dir: &Path) -> Result<Box<dyn Predictor>> {
    ModelSpec::from_bytes(bytes)?.into_predictor(base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_threshold_artifact() {
        let bytes = br#"{
            "kind": "threshold",
            "feature": "price",
            "bounds": [150000, 300000],
            "labels": ["low", "medium", "high"],
            "version": "v3"
        }"#;

        let predictor = decode_artifact(bytes, Path::new(".")).unwrap();
        assert_eq!(predictor.kind(), "threshold");
        assert_eq!(predictor.version(), Some("v3"));
    }

    #[test]
    fn test_serialized_model_is_tagged() {
        let model = ModelSpec::Threshold {
            feature: "price".into(),
            bounds: vec![1.0],
            labels: vec!["low".into(), "high".into()],
            version: None,
        };
        let value: serde_json::Value = serde_json::from_slice(&model.to_bytes().unwrap()).unwrap();
        assert_eq!(value["kind"], "threshold");
        assert!(value.get("version").is_none());
        assert_eq!(ModelSpec::from_bytes(&model.to_bytes().unwrap()).unwrap(), model);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = decode_artifact(br#"{"kind": "forest"}"#, Path::new(".")).err().unwrap();
        assert!(format!("{:#}", err).contains("unknown variant"));
    }

    #[test]
    fn test_onnx_graph_resolved_relative_to_artifact_dir() {
        let temp_dir = TempDir::new().unwrap();
        let bytes = br#"{"kind": "onnx", "graph": "missing.onnx", "features": ["year"], "labels": ["a"]}"#;

        let err = decode_artifact(bytes, temp_dir.path()).err().unwrap();
        let message = format!("{:#}", err);
        assert!(message.contains("missing.onnx"));
        assert!(message.contains(&temp_dir.path().display().to_string()));
    }
}
