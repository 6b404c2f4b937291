//! In-memory tabular dataset used as model input

use serde_json::Value;
use std::collections::HashMap;

/// A single cell. `None` marks a value absent from the source row,
/// which is distinct from an explicit JSON `null`.
pub type Cell = Option<Value>;

/// Ordered named columns over an ordered sequence of rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset from column names and rows.
    ///
    /// Rows shorter than the column list are padded with absent cells,
    /// longer rows are truncated.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Append tables in order, aligning cells by column name.
    ///
    /// The resulting column set is the union of all input columns in
    /// first-appearance order. Cells for columns a table does not have
    /// are left absent.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Dataset>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut rows: Vec<Vec<Cell>> = Vec::new();

        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .into_iter()
                .map(|name| {
                    let next = columns.len();
                    *positions.entry(name.clone()).or_insert_with(|| {
                        columns.push(name);
                        next
                    })
                })
                .collect();

            for row in table.rows {
                let mut aligned: Vec<Cell> = vec![None; columns.len()];
                for (cell, &pos) in row.into_iter().zip(&mapping) {
                    aligned[pos] = cell;
                }
                rows.push(aligned);
            }
        }

        let width = columns.len();
        for row in &mut rows {
            row.resize(width, None);
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Value at `row` under `column`, `None` if the column is unknown or the cell is absent
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_ref()
    }

    /// All cells of one column in row order
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = Option<&Value>>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[col].as_ref()))
    }
}
