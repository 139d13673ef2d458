//! Table loading from `.xlsx` workbooks
//!
//! The first worksheet is read as a two-way table:
//!
//! ```text
//!            | Speed | Comfort | Price      <- header row: column labels
//! -----------|-------|---------|------
//! Model A    |  3.2  |   4.0   |  2.5       <- first column: row labels
//! Model B    |  4.1  |   3.5   |  3.0
//! ```
//!
//! The corner cell is ignored. Every other cell must be numeric and is
//! rounded to one decimal on load. The synthetic "Synthese" row (column-wise
//! maximum) is derived once, right after loading.

use crate::error::{Error, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

/// Label of the derived row holding the per-column maxima.
pub const SYNTHESE_LABEL: &str = "Synthese";

/// An immutable, validated table of evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
    synthese: Vec<f64>,
}

impl Table {
    /// Build a table from labels and values, rounding every value to one decimal.
    pub fn new(rows: Vec<String>, columns: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::NoColumns);
        }
        if rows.is_empty() {
            return Err(Error::NoRows);
        }

        let mut seen = HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(Error::DuplicateColumn(c.clone()));
            }
        }
        let mut seen = HashSet::new();
        for r in &rows {
            if !seen.insert(r.as_str()) {
                return Err(Error::DuplicateRow(r.clone()));
            }
        }

        if values.len() != rows.len() {
            return Err(Error::BadRequest(format!(
                "{} rows labeled but {} value rows given",
                rows.len(),
                values.len()
            )));
        }
        for (label, row) in rows.iter().zip(&values) {
            if row.len() != columns.len() {
                return Err(Error::RaggedRow {
                    row: label.clone(),
                    found: row.len(),
                    expected: columns.len(),
                });
            }
        }

        let values: Vec<Vec<f64>> = values
            .into_iter()
            .map(|row| row.into_iter().map(round1).collect())
            .collect();
        let synthese = column_max(&values, columns.len());

        Ok(Self { rows, columns, values, synthese })
    }

    /// Read the first worksheet of an `.xlsx` file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_xlsx_bytes(&bytes)
    }

    /// Read the first worksheet of an uploaded `.xlsx` file.
    ///
    /// An empty upload is [`Error::NoFile`], which halts the pipeline before
    /// anything is rendered.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::NoFile);
        }

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        let range = workbook.worksheet_range_at(0).ok_or(Error::NoWorksheet)??;

        let mut sheet_rows = range
            .rows()
            .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)));

        let header = sheet_rows.next().ok_or(Error::NoColumns)?;
        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, cell)| match cell {
                Data::Empty => format!("Unnamed: {}", i),
                other => other.to_string(),
            })
            .collect();

        let mut rows = Vec::new();
        let mut values = Vec::new();
        for cells in sheet_rows {
            let label = cells.first().map(|c| c.to_string()).unwrap_or_default();
            let row_values = cells
                .iter()
                .skip(1)
                .zip(&columns)
                .map(|(cell, column)| {
                    cell_to_f64(cell).ok_or_else(|| Error::NonNumericCell {
                        row: label.clone(),
                        column: column.clone(),
                        value: cell.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(label);
            values.push(row_values);
        }

        let table = Self::new(rows, columns, values)?;
        log::debug!(
            "loaded table: {} rows x {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Values of the row with the given label, in column order.
    pub fn row(&self, label: &str) -> Option<&[f64]> {
        self.rows
            .iter()
            .position(|r| r == label)
            .map(|i| self.values[i].as_slice())
    }

    /// Rows paired with their values, in table order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// The synthetic row: maximum of every column over all rows.
    pub fn synthese(&self) -> &[f64] {
        &self.synthese
    }

    /// Smallest and largest value over the whole table.
    pub fn value_range(&self) -> (f64, f64) {
        self.values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Round to one decimal, ties to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn column_max(values: &[Vec<f64>], num_columns: usize) -> Vec<f64> {
    (0..num_columns)
        .map(|c| {
            values
                .iter()
                .map(|row| row[c])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect()
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}
