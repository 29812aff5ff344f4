// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the transform pipeline invariants.

use std::collections::HashSet;

use chartwise_core::{Dataset, Value};
use chartwise_transforms::{
    AggregateOp, Aggregation, Filter, Sort, SortOrder, TransformSpec, apply,
};
use proptest::prelude::*;

const CATEGORIES: [&str; 5] = ["Books", "Toys", "", "Games", "books"];

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((0..CATEGORIES.len(), -1000_i32..1000, any::<bool>()), 0..40).prop_map(
        |rows| {
            Dataset::from_rows(
                vec!["Category".into(), "Sales".into()],
                rows.into_iter().map(|(cat, sales, garbage)| {
                    let sales = if garbage {
                        Value::text("n/a")
                    } else {
                        Value::text(format!("{}", f64::from(sales) / 4.0))
                    };
                    vec![Value::text(CATEGORIES[cat]), sales]
                }),
            )
            .unwrap()
        },
    )
}

fn distinct_groups(d: &Dataset) -> usize {
    d.records()
        .map(|r| match r.get("Category") {
            Some(v) if !v.is_blank() => v.to_text().unwrap_or_default().into_owned(),
            _ => String::from("Unknown"),
        })
        .collect::<HashSet<_>>()
        .len()
}

proptest! {
    #[test]
    fn identity_spec_is_identity(d in dataset()) {
        prop_assert_eq!(apply(&d, &TransformSpec::new()), d);
    }

    #[test]
    fn sum_is_conserved(d in dataset(), needle in 0..CATEGORIES.len()) {
        let filter = Filter::contains("Category", CATEGORIES[needle]);
        let spec = TransformSpec::new()
            .with_filter(filter.clone())
            .with_aggregation(Aggregation::new("Category", "Sales", AggregateOp::Sum));
        let filtered = apply(&d, &TransformSpec::new().with_filter(filter));
        let out = apply(&d, &spec);

        let input_sum: f64 = filtered.records().map(|r| r.get("Sales").map_or(0.0, Value::to_number)).sum();
        let output_sum: f64 = out.records().map(|r| r.get("Sales").map_or(0.0, Value::to_number)).sum();
        prop_assert!((input_sum - output_sum).abs() <= 1e-9, "{input_sum} != {output_sum}");
    }

    #[test]
    fn one_row_per_group(d in dataset()) {
        let spec = TransformSpec::new()
            .with_aggregation(Aggregation::new("Category", "Sales", AggregateOp::Count));
        prop_assert_eq!(apply(&d, &spec).row_count(), distinct_groups(&d));
    }

    #[test]
    fn sort_is_stable(d in dataset(), desc in any::<bool>()) {
        let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
        let tagged = d.with_column("Id", (0..d.row_count()).map(|i| Value::Number(i as f64)));
        let out = apply(&tagged, &TransformSpec::new().with_sort(Sort::new("Category", order)));
        prop_assert_eq!(out.row_count(), tagged.row_count());

        let records: Vec<_> = out.records().collect();
        for pair in records.windows(2) {
            let a = pair[0].get("Category").and_then(Value::to_folded);
            let b = pair[1].get("Category").and_then(Value::to_folded);
            if a == b {
                let ia = pair[0].get("Id").map_or(0.0, Value::to_number);
                let ib = pair[1].get("Id").map_or(0.0, Value::to_number);
                prop_assert!(ia < ib, "tie order changed: {ia} before {ib}");
            }
        }
    }
}
