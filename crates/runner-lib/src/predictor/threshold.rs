//! Rule-based predictor that bins one numeric column into categories

use super::{numeric_cell, Predictor};
use crate::dataset::Dataset;
use anyhow::{bail, Context, Result};

/// Assigns `labels[i]` to values below `bounds[i]` and the last label to
/// values at or above the last bound
#[derive(Debug, Clone)]
pub struct ThresholdPredictor {
    feature: String,
    bounds: Vec<f64>,
    labels: Vec<String>,
    version: Option<String>,
}

impl ThresholdPredictor {
    pub fn new(
        feature: impl Into<String>,
        bounds: Vec<f64>,
        labels: Vec<String>,
        version: Option<String>,
    ) -> Result<Self> {
        if labels.len() != bounds.len() + 1 {
            bail!(
                "threshold model has {} bounds and {} labels, expected {} labels",
                bounds.len(),
                labels.len(),
                bounds.len() + 1
            );
        }
        if bounds.iter().any(|b| !b.is_finite()) {
            bail!("threshold bounds must be finite");
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            bail!("threshold bounds must be strictly ascending");
        }

        Ok(Self {
            feature: feature.into(),
            bounds,
            labels,
            version,
        })
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    fn label_for(&self, value: f64) -> &str {
        let bin = self
            .bounds
            .iter()
            .position(|bound| value < *bound)
            .unwrap_or(self.bounds.len());
        &self.labels[bin]
    }
}

impl Predictor for ThresholdPredictor {
    fn predict(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let cells = dataset
            .column(&self.feature)
            .with_context(|| format!("dataset has no column '{}'", self.feature))?;

        cells
            .enumerate()
            .map(|(row, cell)| -> Result<String> {
                let value = cell
                    .and_then(numeric_cell)
                    .with_context(|| {
                        format!("row {}: column '{}' is missing or not numeric", row, self.feature)
                    })?;
                Ok(self.label_for(value).to_string())
            })
            .collect()
    }

    fn kind(&self) -> &'static str {
        "threshold"
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn price_model() -> ThresholdPredictor {
        ThresholdPredictor::new(
            "price",
            vec![150.0, 300.0],
            vec!["low".into(), "medium".into(), "high".into()],
            Some("2026-10-01".into()),
        )
        .unwrap()
    }

    fn prices(values: Vec<serde_json::Value>) -> Dataset {
        Dataset::from_rows(
            vec!["price".into()],
            values.into_iter().map(|v| vec![Some(v)]).collect(),
        )
    }

    #[test]
    fn test_bins_values() {
        let model = price_model();
        let ds = prices(vec![json!(100), json!(150), json!(299.9), json!(300), json!("1000")]);

        let labels = model.predict(&ds).unwrap();
        assert_eq!(labels, vec!["low", "medium", "medium", "high", "high"]);
        assert_eq!(model.version(), Some("2026-10-01"));
    }

    #[test]
    fn test_rejects_inconsistent_parameters() {
        assert!(ThresholdPredictor::new("price", vec![1.0], vec!["a".into()], None).is_err());
        assert!(ThresholdPredictor::new(
            "price",
            vec![2.0, 1.0],
            vec!["a".into(), "b".into(), "c".into()],
            None
        )
        .is_err());
    }

    #[test]
    fn test_missing_column_fails() {
        let ds = Dataset::from_rows(vec!["make".into()], vec![vec![Some(json!("Honda"))]]);
        let err = price_model().predict(&ds).unwrap_err();
        assert!(err.to_string().contains("no column 'price'"));
    }

    #[test]
    fn test_non_numeric_cell_fails() {
        let ds = prices(vec![json!(100), json!("cheap")]);
        let err = price_model().predict(&ds).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_booleans_and_non_finite_strings_fail() {
        let model = price_model();
        for cell in [json!("NaN"), json!(true), json!("inf"), json!("-infinity")] {
            let ds = prices(vec![json!(100), cell.clone()]);
            let err = model.predict(&ds).unwrap_err();
            assert!(err.to_string().contains("row 1"), "accepted {}", cell);
        }
    }

    #[test]
    fn test_absent_cell_fails() {
        let ds = Dataset::from_rows(
            vec!["price".into(), "make".into()],
            vec![vec![None, Some(json!("Honda"))]],
        );
        assert!(price_model().predict(&ds).is_err());
    }
}
