// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned row datasets.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::Value;

/// Errors returned when building a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// A column name appears more than once.
    DuplicateColumn(String),
    /// A row has more cells than the dataset has columns.
    RowWidth {
        /// Number of columns in the dataset.
        expected: usize,
        /// Number of cells in the offending row.
        found: usize,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(name) => write!(f, "duplicate column `{name}`"),
            Self::RowWidth { expected, found } => {
                write!(f, "row has {found} cells but the dataset has {expected} columns")
            }
        }
    }
}

impl core::error::Error for DatasetError {}

/// One dataset row: cells aligned to the owning dataset's column list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Returns the cells of this row, in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the cell at a column index.
    pub fn get(&self, column: usize) -> Option<&Value> {
        self.values.get(column)
    }
}

/// An ordered, immutable set of rows that share one column list.
///
/// The column list is fixed when the dataset is built (for loaded files, by the header or the
/// first record). Every row holds exactly one cell per column; cells that were absent in the
/// source are [`Value::Null`].
///
/// Pipeline stages never mutate a dataset: each produces a new one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Creates an empty dataset with the given columns.
    pub fn new(columns: Vec<String>) -> Result<Self, DatasetError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Builds a dataset from columns and rows of cells.
    pub fn from_rows(
        columns: Vec<String>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Result<Self, DatasetError> {
        let mut out = Self::new(columns)?;
        for row in rows {
            out.push_row(row)?;
        }
        Ok(out)
    }

    /// Builds a dataset whose cells are all text, as a file loader would produce.
    pub fn from_text(columns: &[&str], rows: &[&[&str]]) -> Result<Self, DatasetError> {
        Self::from_rows(
            columns.iter().map(|c| String::from(*c)).collect(),
            rows.iter()
                .map(|r| r.iter().map(|cell| Value::text(*cell)).collect()),
        )
    }

    /// Builds a dataset from name/value records.
    ///
    /// The first record defines the column set; within a record a repeated name overwrites the
    /// earlier cell. Later records are aligned to those columns by name: missing names become
    /// [`Value::Null`] and names the first record lacked are dropped.
    pub fn from_records<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (String, Value)>,
    {
        let mut records = records.into_iter();
        let mut out = Self::default();
        let Some(first) = records.next() else {
            return out;
        };

        let mut values = Vec::new();
        for (name, value) in first {
            match out.column_index(&name) {
                Some(ci) => values[ci] = value,
                None => {
                    out.columns.push(name);
                    values.push(value);
                }
            }
        }
        out.rows.push(Row { values });

        for record in records {
            let mut values = vec![Value::Null; out.columns.len()];
            for (name, value) in record {
                if let Some(ci) = out.column_index(&name) {
                    values[ci] = value;
                }
            }
            out.rows.push(Row { values });
        }
        out
    }

    /// Appends a row, padding missing trailing cells with [`Value::Null`].
    pub fn push_row(&mut self, mut values: Vec<Value>) -> Result<(), DatasetError> {
        let expected = self.columns.len();
        if values.len() > expected {
            return Err(DatasetError::RowWidth {
                expected,
                found: values.len(),
            });
        }
        values.resize(expected, Value::Null);
        self.rows.push(Row { values });
        Ok(())
    }

    /// Returns the column names in first-appearance order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterates rows together with the column list, for lookups by name.
    pub fn records(&self) -> impl ExactSizeIterator<Item = RowView<'_>> + '_ {
        self.rows.iter().map(|row| RowView {
            columns: &self.columns,
            row,
        })
    }

    /// Returns the row at `index` as a [`RowView`].
    pub fn record(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|row| RowView {
            columns: &self.columns,
            row,
        })
    }

    /// Returns a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let ci = self.column_index(column)?;
        self.rows.get(row)?.get(ci)
    }

    /// Returns a dataset with the same columns and only the rows matching `keep`.
    pub fn filter_rows(&self, mut keep: impl FnMut(&Row) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Returns a dataset with rows taken in the given index order.
    ///
    /// Out-of-range indices are skipped.
    pub fn select_rows(&self, order: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: order
                .iter()
                .filter_map(|&i| self.rows.get(i))
                .cloned()
                .collect(),
        }
    }

    /// Returns the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Returns a dataset with `name` set to `values`, one per row.
    ///
    /// An existing column of that name is overwritten in place; otherwise the column is appended.
    /// Rows beyond the end of `values` get [`Value::Null`].
    pub fn with_column(&self, name: &str, values: impl IntoIterator<Item = Value>) -> Self {
        let mut out = self.clone();
        let ci = match out.column_index(name) {
            Some(ci) => ci,
            None => {
                out.columns.push(String::from(name));
                for row in &mut out.rows {
                    row.values.push(Value::Null);
                }
                out.columns.len() - 1
            }
        };
        let mut values = values.into_iter();
        for row in &mut out.rows {
            row.values[ci] = values.next().unwrap_or_default();
        }
        out
    }

    /// Keeps rows where any cell's string form contains `term`, ignoring case.
    ///
    /// An empty (or all-whitespace) term keeps every row.
    pub fn search(&self, term: &str) -> Self {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.clone();
        }
        self.filter_rows(|row| {
            row.values
                .iter()
                .filter_map(Value::to_folded)
                .any(|cell| cell.contains(term.as_str()))
        })
    }
}

/// A borrowed row paired with its dataset's column list.
#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    columns: &'a [String],
    row: &'a Row,
}

impl<'a> RowView<'a> {
    /// Returns a cell by column name.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let ci = self.columns.iter().position(|c| c == column)?;
        self.row.get(ci)
    }

    /// Iterates `(column, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.row.values.iter())
    }

    /// Returns the underlying row.
    pub fn row(&self) -> &'a Row {
        self.row
    }
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.fields() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Serializes as a sequence of objects keyed by column name, in column order.
impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}
