// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end session behavior against canned intent generators.

use std::cell::Cell;

use chartwise_charts::{ChartKind, ChartView};
use chartwise_core::{Dataset, Value};
use chartwise_session::{
    Completion, IntentGenerator, ProviderError, QueryError, Role, Session, SessionConfig,
    Submission, parse_intent_text,
};
use serde_json::{Value as Json, json};

/// Replies with a fixed response and counts calls.
struct Canned {
    reply: Result<Json, String>,
    calls: Cell<usize>,
}

impl Canned {
    fn ok(reply: Json) -> Self {
        Self {
            reply: Ok(reply),
            calls: Cell::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_owned()),
            calls: Cell::new(0),
        }
    }
}

impl IntentGenerator for Canned {
    async fn generate(&self, _query: &str, _preview: &str) -> Result<Json, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        self.reply.clone().map_err(ProviderError::Unavailable)
    }
}

/// Replies with free text that must be parsed as an intent.
struct TextReply(&'static str);

impl IntentGenerator for TextReply {
    async fn generate(&self, _query: &str, _preview: &str) -> Result<Json, ProviderError> {
        parse_intent_text(self.0)
    }
}

fn sales() -> Dataset {
    Dataset::from_text(
        &["Category", "Sales"],
        &[&["Books", "10"], &["Books", "20"], &["Toys", "5"]],
    )
    .unwrap()
}

fn loaded() -> Session {
    let mut session = Session::new(SessionConfig::default());
    session.load_dataset("sales.csv", sales());
    session
}

fn sales_by_category() -> Json {
    json!({
        "type": "bar",
        "title": "Sales by Category",
        "xAxisKey": "Category",
        "series": [{ "key": "Sales" }],
        "transform": {
            "aggregation": { "type": "sum", "groupBy": "Category", "metric": "Sales" },
            "sort": { "column": "Sales", "direction": "asc" }
        }
    })
}

fn last_message(session: &Session) -> &str {
    &session.messages().last().unwrap().content
}

#[tokio::test]
async fn query_without_dataset_never_calls_the_generator() {
    let mut session = Session::default();
    let generator = Canned::ok(sales_by_category());

    let err = session.run_query("sales by category", &generator).await.unwrap_err();

    assert!(matches!(err, QueryError::EmptyDataset), "{err}");
    assert_eq!(generator.calls.get(), 0, "generator must not be called");
    let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::User, Role::Assistant]);
    assert_eq!(
        last_message(&session),
        "Please upload a dataset first so I can visualize it."
    );
}

#[tokio::test]
async fn loading_announces_the_dataset() {
    let session = loaded();
    assert_eq!(session.dataset_name(), Some("sales.csv"));
    assert_eq!(
        last_message(&session),
        "I've analyzed sales.csv. It has 3 rows. What would you like to visualize?"
    );
    assert!(session.intent().is_none());
    assert_eq!(session.view(), session.raw());
}

#[tokio::test]
async fn applied_query_replaces_view_and_intent() {
    let mut session = loaded();
    let generator = Canned::ok(sales_by_category());

    let completion = session.run_query("sales by category", &generator).await.unwrap();
    let Completion::Applied(result) = completion else {
        panic!("expected the chart to be applied");
    };

    assert_eq!(result.intent.kind, ChartKind::Bar);
    assert_eq!(result.view.columns(), &["Category", "Sales"]);
    assert_eq!(
        result.view.get(0, "Category"),
        Some(&Value::text("Toys")),
        "ascending sort puts the smaller group first"
    );
    assert_eq!(result.view.get(1, "Sales"), Some(&Value::Number(30.0)));
    assert_eq!(session.view(), Some(&result.view));
    assert_eq!(session.raw().unwrap().row_count(), 3, "raw data is untouched");
    assert_eq!(session.intent_history().len(), 1);
    assert_eq!(
        last_message(&session),
        "I've generated a **bar chart** showing **Sales by Category**."
    );

    let Some(ChartView::Cartesian(chart)) = session.chart() else {
        panic!("expected a cartesian chart");
    };
    assert_eq!(chart.rows.len(), 2);

    let insights = session.insights();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].column, "Sales");
    assert_eq!(insights[0].sum, 35.0);
}

#[tokio::test]
async fn reset_keyword_restores_the_raw_view_without_the_generator() {
    let mut session = loaded();
    let generator = Canned::ok(sales_by_category());
    session.run_query("sales by category", &generator).await.unwrap();

    let completion = session.run_query("Reset please", &generator).await.unwrap();

    assert_eq!(completion, Completion::ViewReset);
    assert_eq!(generator.calls.get(), 1);
    assert!(session.intent().is_none());
    assert_eq!(session.view(), session.raw());
    assert_eq!(last_message(&session), "I've reset the view.");
}

#[tokio::test]
async fn provider_failure_keeps_the_previous_chart() {
    let mut session = loaded();
    session
        .run_query("sales by category", &Canned::ok(sales_by_category()))
        .await
        .unwrap();
    let view = session.view().cloned();

    let err = session
        .run_query("profit by month", &Canned::failing("timeout"))
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Provider(_)), "{err}");
    assert_eq!(session.view().cloned(), view);
    assert_eq!(session.intent().unwrap().title, "Sales by Category");
    assert!(!session.is_busy());
    assert_eq!(
        last_message(&session),
        "Sorry, I encountered an error. Please check your API Key."
    );
}

#[tokio::test]
async fn unparseable_reply_asks_to_rephrase_and_keeps_the_previous_chart() {
    let mut session = loaded();
    session
        .run_query("sales by category", &Canned::ok(sales_by_category()))
        .await
        .unwrap();
    let view = session.view().cloned();

    let err = session
        .run_query("profit by month", &TextReply("Sure! Here is your chart."))
        .await
        .unwrap_err();

    assert!(
        matches!(err, QueryError::Provider(ProviderError::Malformed(_))),
        "{err}"
    );
    assert_eq!(session.view().cloned(), view);
    assert_eq!(session.intent().unwrap().title, "Sales by Category");
    assert_eq!(session.intent_history().len(), 1);
    assert!(!session.is_busy());
    assert_eq!(
        last_message(&session),
        "I couldn't generate a chart for that. Try asking differently."
    );
}

#[tokio::test]
async fn malformed_intent_keeps_the_previous_chart() {
    let mut session = loaded();
    let generator = Canned::ok(json!({ "type": "bar", "series": [] }));

    let err = session.run_query("something", &generator).await.unwrap_err();

    assert!(matches!(err, QueryError::Schema(_)), "{err}");
    assert!(session.intent().is_none());
    assert_eq!(session.view(), session.raw());
    assert_eq!(
        last_message(&session),
        "I couldn't generate a chart for that. Try asking differently."
    );
}

#[test]
fn blank_queries_are_ignored() {
    let mut session = loaded();
    let before = session.messages().len();
    assert!(matches!(session.submit("   "), Err(QueryError::BlankQuery)));
    assert_eq!(session.messages().len(), before);
}

#[test]
fn second_submission_is_rejected_while_one_is_pending() {
    let mut session = loaded();
    let Ok(Submission::Pending(first)) = session.submit("sales by category") else {
        panic!("expected a pending query");
    };
    assert!(session.is_busy());
    assert!(matches!(session.submit("another"), Err(QueryError::Busy)));

    let completion = session
        .complete(first.token(), Ok(sales_by_category()))
        .unwrap();
    assert!(matches!(completion, Completion::Applied(_)));
    assert!(!session.is_busy());

    // The same token cannot be applied twice.
    let again = session
        .complete(first.token(), Ok(sales_by_category()))
        .unwrap();
    assert_eq!(again, Completion::Discarded);
}

#[test]
fn responses_after_reset_are_discarded() {
    let mut session = loaded();
    let Ok(Submission::Pending(pending)) = session.submit("sales by category") else {
        panic!("expected a pending query");
    };

    session.reset();

    let completion = session
        .complete(pending.token(), Ok(sales_by_category()))
        .unwrap();
    assert_eq!(completion, Completion::Discarded);
    assert!(session.raw().is_none());
    assert!(session.view().is_none());
    assert!(session.intent().is_none());
    assert!(session.messages().is_empty());
    assert!(session.chart().is_none());
    assert!(session.insights().is_empty());
}

#[test]
fn responses_after_a_new_dataset_are_discarded() {
    let mut session = loaded();
    let Ok(Submission::Pending(pending)) = session.submit("sales by category") else {
        panic!("expected a pending query");
    };
    let generation = session.generation();

    session.load_dataset("other.csv", sales());

    assert!(session.generation() > generation);
    assert!(!session.is_busy());
    let completion = session
        .complete(pending.token(), Ok(sales_by_category()))
        .unwrap();
    assert_eq!(completion, Completion::Discarded);
    assert!(session.intent().is_none());
}

#[test]
fn preview_holds_the_first_raw_rows() {
    let mut session = Session::new(SessionConfig::default().with_preview_rows(2));
    session.load_dataset("sales.csv", sales());
    let Ok(Submission::Pending(pending)) = session.submit("anything") else {
        panic!("expected a pending query");
    };
    assert_eq!(pending.query(), "anything");
    assert_eq!(
        pending.preview(),
        r#"[{"Category":"Books","Sales":"10"},{"Category":"Books","Sales":"20"}]"#
    );
}

#[test]
fn history_is_bounded() {
    let mut session = Session::new(SessionConfig::default().with_history_limit(2));
    session.load_dataset("sales.csv", sales());
    for title in ["one", "two", "three"] {
        let Ok(Submission::Pending(pending)) = session.submit(title) else {
            panic!("expected a pending query");
        };
        let mut intent = sales_by_category();
        intent["title"] = json!(title);
        session.complete(pending.token(), Ok(intent)).unwrap();
    }
    let titles: Vec<&str> = session
        .intent_history()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(titles, ["two", "three"]);
}

#[test]
fn chart_kind_can_be_switched() {
    let mut session = loaded();
    assert!(!session.set_chart_kind(ChartKind::Pie));

    let Ok(Submission::Pending(pending)) = session.submit("sales by category") else {
        panic!("expected a pending query");
    };
    session
        .complete(pending.token(), Ok(sales_by_category()))
        .unwrap();

    assert!(session.set_chart_kind(ChartKind::Pie));
    let Some(ChartView::Pie(pie)) = session.chart() else {
        panic!("expected a pie chart");
    };
    assert_eq!(pie.slices.len(), 2);
    assert_eq!(pie.total(), 35.0);
}
