// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `chartwise_session`.
//!
//! Loads the CSV given on the command line (or a small built-in dataset) and answers a few
//! questions with a keyword-matching stand-in for a language model.

use chartwise_charts::{ChartView, to_hex};
use chartwise_core::Dataset;
use chartwise_session::{
    Completion, IntentGenerator, ProviderError, Session, SessionConfig, build_prompt,
};
use serde_json::{Value as Json, json};

/// Answers from a fixed table of intents, keyed by words in the question.
#[derive(Debug)]
struct KeywordGenerator;

impl IntentGenerator for KeywordGenerator {
    async fn generate(&self, query: &str, preview: &str) -> Result<Json, ProviderError> {
        let prompt = build_prompt(query, preview);
        println!("  (prompt is {} bytes)", prompt.len());

        let query = query.to_lowercase();
        if query.contains("share") {
            Ok(json!({
                "type": "pie",
                "title": "Share of Sales",
                "xAxisKey": "Category",
                "series": [{ "key": "Sales", "name": "Sales" }],
                "transform": {
                    "aggregation": { "type": "sum", "groupBy": "Category", "metric": "Sales" }
                }
            }))
        } else if query.contains("books") {
            Ok(json!({
                "type": "line",
                "title": "Books over Time",
                "xAxisKey": "Month",
                "series": [{ "key": "Sales", "color": "#10b981" }],
                "transform": {
                    "filter": { "column": "Category", "value": "books", "operator": "equals" }
                }
            }))
        } else if query.contains("top") {
            Ok(json!({
                "type": "bar",
                "title": "Sales by Category",
                "xAxisKey": "Category",
                "series": [{ "key": "Sales" }],
                "transform": {
                    "aggregation": { "type": "sum", "groupBy": "Category", "metric": "Sales" },
                    "sort": { "column": "Sales", "direction": "desc" }
                }
            }))
        } else {
            Err(ProviderError::Unavailable(format!("no canned answer for {query:?}")))
        }
    }
}

fn builtin() -> Dataset {
    Dataset::from_text(
        &["Month", "Category", "Sales"],
        &[
            &["Jan", "Books", "120"],
            &["Jan", "Toys", "80"],
            &["Feb", "Books", "150"],
            &["Feb", "Games", "60"],
            &["Mar", "Toys", "95"],
            &["Mar", "Books", "n/a"],
        ],
    )
    .unwrap()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut session = Session::new(SessionConfig::default());
    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(err) = session.load_path(&path) {
                eprintln!("failed to load {path}: {err}");
                std::process::exit(1);
            }
        }
        None => session.load_dataset("builtin.csv", builtin()),
    }

    let generator = KeywordGenerator;
    for query in [
        "What are the top categories?",
        "Show books sales",
        "What share does each category have?",
        "Forecast next year",
        "reset",
    ] {
        println!("> {query}");
        match session.run_query(query, &generator).await {
            Ok(Completion::Applied(_)) => print_chart(&session),
            Ok(other) => println!("  {other:?}"),
            Err(err) => println!("  error: {err}"),
        }
        if let Some(reply) = session.messages().last() {
            println!("  {}", reply.content);
        }
    }
}

fn print_chart(session: &Session) {
    let Some(chart) = session.chart() else {
        return;
    };
    match &chart {
        ChartView::Cartesian(c) => {
            for row in &c.rows {
                println!("  {:?} -> {:?}", row.x, row.values.as_slice());
            }
        }
        ChartView::Pie(p) => {
            for (i, slice) in p.slices.iter().enumerate() {
                println!(
                    "  {} {:.1}% {}",
                    slice.label,
                    p.share(i) * 100.0,
                    to_hex(slice.fill)
                );
            }
        }
        ChartView::Scatter(s) => {
            for series in &s.series {
                println!("  {}: {} points", series.style.name, series.points.row_count());
            }
        }
    }
    for item in chart.legend() {
        println!("  legend: {} {}", item.label, to_hex(item.fill));
    }
    for stat in session.insights() {
        println!(
            "  {}: sum={} avg={:.2} min={} max={}",
            stat.column, stat.sum, stat.avg, stat.min, stat.max
        );
    }
}
