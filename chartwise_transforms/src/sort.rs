// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sort stage.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use chartwise_core::{Dataset, Value};
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};

use crate::{Sort, SortOrder};

/// The comparable form of one cell.
///
/// Cells that read as finite numbers compare numerically; everything else compares by its
/// lower-cased string form (`Null` as the empty string) under the root Unicode collation.
/// Numbers order before text, which keeps the ordering total on columns that mix the two.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    /// A numeric cell.
    Number(f64),
    /// A non-numeric cell, lower-cased.
    Text(String),
}

impl SortKey {
    /// Builds the key for a cell (`None` for a missing column).
    pub fn of(cell: Option<&Value>) -> Self {
        match cell.and_then(Value::as_finite) {
            Some(n) => Self::Number(n),
            None => Self::Text(cell.and_then(Value::to_folded).unwrap_or_default()),
        }
    }

    /// Compares two keys in ascending order.
    ///
    /// Text is ordered by `collator`, or by code point when none is given.
    pub fn compare(&self, other: &Self, collator: Option<&CollatorBorrowed<'_>>) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => match collator {
                Some(c) => c.compare(a, b),
                None => a.cmp(b),
            },
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

/// Stable-sorts rows by `sort.column`.
///
/// Rows with equal keys keep their input order in both directions: `Desc` reverses the key
/// comparison, not the tie-break.
pub fn sort(input: &Dataset, sort: &Sort) -> Dataset {
    // Compiled root collation data; code point order only if it fails to load.
    let collator =
        Collator::try_new(CollatorPreferences::default(), CollatorOptions::default()).ok();
    let ci = input.column_index(&sort.column);
    let keys: Vec<SortKey> = input
        .rows()
        .iter()
        .map(|row| SortKey::of(ci.and_then(|ci| row.get(ci))))
        .collect();

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| {
        let ord = keys[a].compare(&keys[b], collator.as_ref());
        match sort.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    input.select_rows(&order)
}
