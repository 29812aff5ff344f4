// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregation stage.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use chartwise_core::{Dataset, Value};
use hashbrown::HashMap;

use crate::{AggregateOp, Aggregation};

/// Group key used for rows whose `group_by` cell is missing or empty.
pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn reduce(self, op: AggregateOp) -> f64 {
        match op {
            AggregateOp::Sum => self.sum,
            AggregateOp::Average => self.sum / self.count as f64,
            AggregateOp::Count => self.count as f64,
            // Never reduced: `aggregate` passes rows through unless `is_active`.
            AggregateOp::None => 0.0,
        }
    }
}

/// Groups rows by `aggregation.group_by` and reduces `aggregation.metric` per group.
///
/// Groups are emitted in first-seen order, one row each: `{group_by: key, metric: reduced}`.
/// Metric cells are coerced with [`Value::to_number`], so unreadable cells count as `0`.
/// Inactive aggregations (see [`Aggregation::is_active`]) return the input unchanged.
pub fn aggregate(input: &Dataset, aggregation: &Aggregation) -> Dataset {
    if !aggregation.is_active() {
        return input.clone();
    }

    let group_col = input.column_index(&aggregation.group_by);
    let metric_col = input.column_index(&aggregation.metric);

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Accumulator)> = Vec::new();
    for row in input.rows() {
        let key = group_col
            .and_then(|ci| row.get(ci))
            .filter(|v| !v.is_blank())
            .and_then(Value::to_text)
            .map_or_else(|| UNKNOWN_GROUP.to_string(), |k| k.into_owned());
        let value = metric_col
            .and_then(|ci| row.get(ci))
            .map_or(0.0, Value::to_number);

        let slot = *index.entry(key).or_insert_with_key(|key| {
            groups.push((key.clone(), Accumulator::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.sum += value;
        acc.count += 1;
    }

    if groups.is_empty() {
        let mut columns = vec![aggregation.group_by.clone()];
        if aggregation.metric != aggregation.group_by {
            columns.push(aggregation.metric.clone());
        }
        return Dataset::new(columns).unwrap_or_default();
    }

    Dataset::from_records(groups.into_iter().map(|(key, acc)| {
        vec![
            (aggregation.group_by.clone(), Value::String(key)),
            (
                aggregation.metric.clone(),
                Value::Number(acc.reduce(aggregation.op)),
            ),
        ]
    }))
}
