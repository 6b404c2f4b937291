//! Shape detection for raw test-data JSON
//!
//! Two orientations are supported, checked in this order:
//!
//! 1. column-indexed: `{"price": {"0": 100, "1": 200}, "make": {...}}`
//! 2. records: `[{"price": 100, "make": "Toyota"}, ...]` or a single record object
//!
//! Anything else is a structural mismatch and is reported as such.

use super::table::{Cell, Dataset};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Structural mismatch against both supported orientations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("top-level JSON value is {0}, expected an object or an array of objects")]
    TopLevel(&'static str),
    #[error("record {index} is {found}, expected an object")]
    NonObjectRecord { index: usize, found: &'static str },
}

/// A parsed test-data file tagged with its detected orientation
#[derive(Debug, Clone, PartialEq)]
pub enum RawTable {
    /// Column name to (row index to value), in file order
    ColumnIndexed(Vec<(String, Map<String, Value>)>),
    /// One object per row, in file order
    Records(Vec<Map<String, Value>>),
}

impl RawTable {
    /// Detect the orientation of a parsed JSON document
    pub fn detect(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Object(map) if map.values().all(Value::is_object) => {
                let columns = map
                    .into_iter()
                    .filter_map(|(name, cells)| match cells {
                        Value::Object(cells) => Some((name, cells)),
                        _ => None,
                    })
                    .collect();
                Ok(RawTable::ColumnIndexed(columns))
            }
            Value::Object(record) => Ok(RawTable::Records(vec![record])),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(ShapeError::NonObjectRecord {
                        index,
                        found: json_type_name(&other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(RawTable::Records),
            other => Err(ShapeError::TopLevel(json_type_name(&other))),
        }
    }

    pub fn orientation(&self) -> &'static str {
        match self {
            RawTable::ColumnIndexed(_) => "column_indexed",
            RawTable::Records(_) => "records",
        }
    }

    /// Normalize into a dataset with one row per record or row index
    pub fn into_dataset(self) -> Dataset {
        match self {
            RawTable::ColumnIndexed(columns) => transpose_columns(columns),
            RawTable::Records(records) => records_to_rows(records),
        }
    }
}

fn transpose_columns(columns: Vec<(String, Map<String, Value>)>) -> Dataset {
    let mut seen = HashSet::new();
    let mut row_keys: Vec<String> = Vec::new();
    for (_, cells) in &columns {
        for key in cells.keys() {
            if seen.insert(key.as_str()) {
                row_keys.push(key.clone());
            }
        }
    }
    sort_row_keys(&mut row_keys);

    let rows = row_keys
        .iter()
        .map(|key| {
            columns
                .iter()
                .map(|(_, cells)| cells.get(key).cloned())
                .collect::<Vec<Cell>>()
        })
        .collect();
    let names = columns.into_iter().map(|(name, _)| name).collect();

    Dataset::from_rows(names, rows)
}

/// Integer row indices are ordered numerically, anything else keeps first-appearance order
fn sort_row_keys(keys: &mut [String]) {
    let numeric: Option<Vec<u64>> = keys.iter().map(|k| k.parse::<u64>().ok()).collect();
    if numeric.is_some() {
        keys.sort_by_key(|k| k.parse::<u64>().unwrap_or(u64::MAX));
    }
}

fn records_to_rows(records: Vec<Map<String, Value>>) -> Dataset {
    let mut seen = HashSet::new();
    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|name| record.get(name).cloned())
                .collect::<Vec<Cell>>()
        })
        .collect();

    Dataset::from_rows(columns, rows)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
