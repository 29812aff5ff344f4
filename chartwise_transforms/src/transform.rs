// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform IR types.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartwise_core::{Dataset, Value};

/// Match operator for [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterOp {
    /// Case-insensitive equality of string forms.
    #[default]
    Equals,
    /// Case-insensitive substring test: the cell contains the filter value.
    Contains,
}

/// Keep only rows whose `column` cell matches `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column to read.
    pub column: String,
    /// Right-hand value, compared by its string form.
    pub value: Value,
    /// Match operator.
    pub op: FilterOp,
}

impl Filter {
    /// Creates an equality filter.
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            op: FilterOp::Equals,
        }
    }

    /// Creates a substring filter.
    pub fn contains(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            op: FilterOp::Contains,
        }
    }

    /// Evaluate the filter for a single cell.
    ///
    /// Both sides are compared by their lower-cased string form. A `Null` cell never
    /// contains anything, and equals only a `Null` filter value.
    pub fn eval(&self, cell: &Value) -> bool {
        self.matcher()(cell)
    }

    /// Returns a predicate with the filter value folded once up front.
    pub(crate) fn matcher(&self) -> impl Fn(&Value) -> bool + '_ {
        let needle = self.value.to_folded();
        move |cell: &Value| match (cell.to_folded(), needle.as_deref()) {
            (Some(cell), Some(needle)) => match self.op {
                FilterOp::Equals => cell == needle,
                FilterOp::Contains => cell.contains(needle),
            },
            (None, None) => self.op == FilterOp::Equals,
            _ => false,
        }
    }
}

/// Reduction applied per group by [`Aggregation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateOp {
    /// Sum of the coerced metric values.
    Sum,
    /// Sum divided by the number of rows in the group.
    Average,
    /// Number of rows in the group (the metric is not read).
    Count,
    /// No aggregation: rows pass through unchanged.
    #[default]
    None,
}

/// Group rows by one column and reduce another.
///
/// The output has one row per distinct group key, in first-seen order, with exactly two
/// columns: `group_by` (the key, as text) and `metric` (the reduced number).
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Column whose string value defines the group.
    pub group_by: String,
    /// Column holding the values to reduce.
    pub metric: String,
    /// Reduction.
    pub op: AggregateOp,
}

impl Aggregation {
    /// Creates an aggregation.
    pub fn new(group_by: impl Into<String>, metric: impl Into<String>, op: AggregateOp) -> Self {
        Self {
            group_by: group_by.into(),
            metric: metric.into(),
            op,
        }
    }

    /// Returns `true` if running this stage would change anything.
    ///
    /// `AggregateOp::None` and an empty `group_by` or `metric` all skip the stage.
    pub fn is_active(&self) -> bool {
        self.op != AggregateOp::None && !self.group_by.is_empty() && !self.metric.is_empty()
    }
}

/// Sorting order for [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// Reorder rows by one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// Column used as the sort key.
    pub column: String,
    /// Sort order.
    pub order: SortOrder,
}

impl Sort {
    /// Creates a sort stage.
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }
}

/// The three optional stages applied to a raw dataset to produce a view.
///
/// The default value has every stage absent and is the identity transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformSpec {
    /// Optional row filter.
    pub filter: Option<Filter>,
    /// Optional grouping and reduction.
    pub aggregation: Option<Aggregation>,
    /// Optional row ordering.
    pub sort: Option<Sort>,
}

impl TransformSpec {
    /// Creates the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter stage.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the aggregation stage.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Sets the sort stage.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Returns `true` if no stage would change the input.
    pub fn is_identity(&self) -> bool {
        self.filter.is_none()
            && !self.aggregation.as_ref().is_some_and(Aggregation::is_active)
            && self.sort.is_none()
    }

    /// Returns the columns this spec reads from its input dataset, in stage order.
    ///
    /// The sort column is only included when it reads the input directly, i.e. when no active
    /// aggregation replaces the column set first.
    pub fn input_columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(f) = &self.filter {
            push_unique(&mut out, &f.column);
        }
        let aggregated = match &self.aggregation {
            Some(a) if a.is_active() => {
                push_unique(&mut out, &a.group_by);
                push_unique(&mut out, &a.metric);
                true
            }
            _ => false,
        };
        if let (Some(s), false) = (&self.sort, aggregated) {
            push_unique(&mut out, &s.column);
        }
        out
    }

    /// Returns the input columns that `dataset` does not have.
    pub fn missing_columns<'a>(&'a self, dataset: &Dataset) -> Vec<&'a str> {
        self.input_columns()
            .into_iter()
            .filter(|c| dataset.column_index(c).is_none())
            .collect()
    }
}

fn push_unique<'a>(out: &mut Vec<&'a str>, column: &'a str) {
    if !out.contains(&column) {
        out.push(column);
    }
}
