// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insight summaries over the current view.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;

use crate::{Dataset, Value};

/// Summary statistics for one numeric column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnStat {
    /// Column name.
    pub column: String,
    /// Sum of all values.
    pub sum: f64,
    /// Arithmetic mean.
    pub avg: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

/// Returns `true` if every row's cell in `column` is a finite number.
///
/// One non-numeric cell (including a missing one) disqualifies the whole column. A dataset
/// with no rows has no numeric columns.
pub fn is_numeric_column(dataset: &Dataset, column: &str) -> bool {
    let Some(ci) = dataset.column_index(column) else {
        return false;
    };
    !dataset.is_empty()
        && dataset
            .rows()
            .iter()
            .all(|row| row.get(ci).is_some_and(Value::is_numeric))
}

/// Computes sum/average/min/max for every numeric column, in column order.
///
/// Pass the dataset currently on screen (the transformed view), not the raw upload: the panel
/// describes what the chart shows. Returns an empty list when nothing is numeric, which callers
/// treat as "hide the panel".
pub fn summarize(dataset: &Dataset) -> Vec<ColumnStat> {
    if dataset.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for (ci, column) in dataset.columns().iter().enumerate() {
        let values: Option<Vec<f64>> = dataset
            .rows()
            .iter()
            .map(|row| row.get(ci).and_then(Value::as_finite))
            .collect();
        let Some(values) = values else {
            continue;
        };

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        out.push(ColumnStat {
            column: column.clone(),
            sum,
            avg: sum / values.len() as f64,
            min,
            max,
        });
    }
    out
}
