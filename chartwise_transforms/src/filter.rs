// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter stage.

use chartwise_core::Dataset;

use crate::Filter;

/// Keeps the rows whose `filter.column` cell matches, preserving order and columns.
///
/// A column the dataset does not have reads as `Null` in every row.
pub fn filter(input: &Dataset, filter: &Filter) -> Dataset {
    let Some(ci) = input.column_index(&filter.column) else {
        let keep_nulls = filter.eval(&chartwise_core::Value::Null);
        return input.filter_rows(|_| keep_nulls);
    };
    let matches = filter.matcher();
    input.filter_rows(|row| row.get(ci).is_some_and(&matches))
}
