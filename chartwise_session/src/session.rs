// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The query session: raw and view datasets, the current intent, and the transcript.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use chartwise_charts::{ChartIntent, ChartKind, ChartView, dispatch, validate_with};
use chartwise_core::{ColumnStat, Dataset, summarize};
use serde_json::Value as Json;
use tracing::{debug, info, warn};

use crate::{
    IntentGenerator, LoadError, Message, ProviderError, QueryError, Role, SessionConfig,
    load_path,
};

const NO_DATASET: &str = "Please upload a dataset first so I can visualize it.";
const VIEW_RESET: &str = "I've reset the view.";
const NOT_UNDERSTOOD: &str = "I couldn't generate a chart for that. Try asking differently.";
const PROVIDER_FAILED: &str = "Sorry, I encountered an error. Please check your API Key.";

/// Identifies one submitted query.
///
/// A token is only honored by [`Session::complete`] while it is the session's pending token:
/// loading a dataset or resetting the session invalidates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryToken {
    generation: u64,
    ticket: u64,
}

impl QueryToken {
    /// Session generation the query was submitted in.
    pub fn generation(self) -> u64 {
        self.generation
    }

    /// Sequence number of the query within the session.
    pub fn ticket(self) -> u64 {
        self.ticket
    }
}

/// A query waiting for its intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingQuery {
    token: QueryToken,
    query: String,
    preview: String,
}

impl PendingQuery {
    /// Token to pass back to [`Session::complete`].
    pub fn token(&self) -> QueryToken {
        self.token
    }

    /// The user's question.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// JSON array of the first raw rows, for the intent generator.
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

/// Outcome of [`Session::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The query needs an intent; generate one and call [`Session::complete`].
    Pending(PendingQuery),
    /// The query asked for a reset and the view is back to the raw dataset.
    ViewReset,
}

/// A chart produced by a query.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult {
    /// The validated intent.
    pub intent: ChartIntent,
    /// The intent's transform applied to the raw dataset.
    pub view: Arc<Dataset>,
}

/// Outcome of a query that did not fail.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    /// A new chart replaced the previous one.
    Applied(QueryResult),
    /// The query asked for a reset and the view is back to the raw dataset.
    ViewReset,
    /// The response arrived for a query that is no longer pending; nothing changed.
    Discarded,
}

/// One conversation about one dataset.
///
/// The session owns the raw dataset as loaded, the view dataset derived from it by the current
/// intent's transform, the intent history, and the transcript. Views are always recomputed from
/// the raw dataset; they never stack.
///
/// At most one query is in flight at a time. [`Session::run_query`] holds the session for the
/// whole round trip. Hosts that need the session while the generator runs use the split form:
/// [`Session::submit`] mints a [`QueryToken`], and [`Session::complete`] applies the response
/// only if that token is still pending. Further submissions fail with [`QueryError::Busy`] in
/// the meantime, and [`Session::reset`] or a new dataset makes the late response a no-op.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    name: Option<String>,
    raw: Option<Arc<Dataset>>,
    view: Option<Arc<Dataset>>,
    intent: Option<ChartIntent>,
    history: VecDeque<ChartIntent>,
    messages: Vec<Message>,
    next_message_id: u64,
    generation: u64,
    next_ticket: u64,
    pending: Option<QueryToken>,
}

impl Session {
    /// Creates an empty session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Loads a file and makes it the session's dataset. See [`Session::load_dataset`].
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let dataset = load_path(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_dataset(name, dataset);
        Ok(())
    }

    /// Replaces the raw and view datasets with `dataset`.
    ///
    /// The current chart is cleared and any pending query is abandoned.
    pub fn load_dataset(&mut self, name: impl Into<String>, dataset: Dataset) {
        let name = name.into();
        let rows = dataset.row_count();
        self.generation += 1;
        self.pending = None;
        self.intent = None;
        let dataset = Arc::new(dataset);
        self.view = Some(Arc::clone(&dataset));
        self.raw = Some(dataset);
        info!(
            name = %name,
            rows,
            columns = self.raw.as_ref().map_or(0, |d| d.columns().len()),
            generation = self.generation,
            "dataset loaded"
        );
        self.say(format!(
            "I've analyzed {name}. It has {rows} rows. What would you like to visualize?"
        ));
        self.name = Some(name);
    }

    /// Starts a query.
    ///
    /// Blank queries are ignored. Otherwise the query is recorded in the transcript and one of
    /// the following happens:
    /// - with no (or an empty) dataset, [`QueryError::EmptyDataset`] and an upload prompt,
    /// - a query mentioning the reset keyword resets the view without asking for an intent,
    /// - otherwise a [`PendingQuery`] is returned and the session is busy until it completes.
    pub fn submit(&mut self, query: &str) -> Result<Submission, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::BlankQuery);
        }
        if let Some(token) = self.pending {
            debug!(ticket = token.ticket, "query rejected while another is pending");
            return Err(QueryError::Busy);
        }
        self.push_message(Role::User, query.to_owned());

        let Some(raw) = self.raw.as_ref().filter(|d| !d.is_empty()).map(Arc::clone) else {
            self.say(NO_DATASET);
            return Err(QueryError::EmptyDataset);
        };

        if self.config.is_reset(query) {
            self.reset_view();
            self.say(VIEW_RESET);
            return Ok(Submission::ViewReset);
        }

        let preview = serde_json::to_string(&raw.head(self.config.preview_rows))
            .map_err(ProviderError::from)?;
        let token = QueryToken {
            generation: self.generation,
            ticket: self.next_ticket,
        };
        self.next_ticket += 1;
        self.pending = Some(token);
        debug!(
            generation = token.generation,
            ticket = token.ticket,
            preview_rows = self.config.preview_rows,
            "query submitted"
        );
        Ok(Submission::Pending(PendingQuery {
            token,
            query: query.to_owned(),
            preview,
        }))
    }

    /// Applies the generator's response to a pending query.
    ///
    /// A token that is no longer pending yields [`Completion::Discarded`] and changes nothing.
    /// On failure the previous chart stays in place and an apology is recorded.
    pub fn complete(
        &mut self,
        token: QueryToken,
        response: Result<Json, ProviderError>,
    ) -> Result<Completion, QueryError> {
        if self.pending != Some(token) {
            debug!(
                generation = token.generation,
                ticket = token.ticket,
                current_generation = self.generation,
                "stale response discarded"
            );
            return Ok(Completion::Discarded);
        }
        self.pending = None;

        let Some(raw) = self.raw.clone() else {
            return Ok(Completion::Discarded);
        };
        let json = match response {
            Ok(json) => json,
            Err(err) => {
                warn!(ticket = token.ticket, error = %err, "intent generator failed");
                self.say(match &err {
                    ProviderError::Malformed(_) => NOT_UNDERSTOOD,
                    ProviderError::Unavailable(_) => PROVIDER_FAILED,
                });
                return Err(err.into());
            }
        };
        let intent = match validate_with(&json, &self.config.validator) {
            Ok(intent) => intent,
            Err(err) => {
                warn!(ticket = token.ticket, error = %err, "intent rejected");
                self.say(NOT_UNDERSTOOD);
                return Err(err.into());
            }
        };
        Ok(Completion::Applied(self.apply(&raw, intent)))
    }

    /// Submits `query`, awaits `generator`, and completes the query.
    pub async fn run_query(
        &mut self,
        query: &str,
        generator: &impl IntentGenerator,
    ) -> Result<Completion, QueryError> {
        let pending = match self.submit(query)? {
            Submission::Pending(pending) => pending,
            Submission::ViewReset => return Ok(Completion::ViewReset),
        };
        let response = generator.generate(pending.query(), pending.preview()).await;
        self.complete(pending.token(), response)
    }

    /// Clears the dataset, chart, history, and transcript, abandoning any pending query.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.name = None;
        self.raw = None;
        self.view = None;
        self.intent = None;
        self.history.clear();
        self.messages.clear();
        info!(generation = self.generation, "session reset");
    }

    /// Drops the current chart and shows the raw dataset again.
    pub fn reset_view(&mut self) {
        self.intent = None;
        self.view = self.raw.clone();
    }

    /// Re-targets the current chart to another chart type, keeping its data.
    ///
    /// Returns `false` when there is no chart.
    pub fn set_chart_kind(&mut self, kind: ChartKind) -> bool {
        match self.intent.take() {
            Some(intent) => {
                self.intent = Some(intent.with_kind(kind));
                true
            }
            None => false,
        }
    }

    /// Shapes the view for the current intent.
    pub fn chart(&self) -> Option<ChartView> {
        Some(dispatch(self.intent.as_ref()?, self.view.as_deref()?))
    }

    /// Statistics for the numeric columns of the view.
    pub fn insights(&self) -> Vec<ColumnStat> {
        self.view.as_deref().map(summarize).unwrap_or_default()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Name of the loaded dataset.
    pub fn dataset_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The dataset as loaded.
    pub fn raw(&self) -> Option<&Arc<Dataset>> {
        self.raw.as_ref()
    }

    /// The dataset on screen.
    pub fn view(&self) -> Option<&Arc<Dataset>> {
        self.view.as_ref()
    }

    /// The current intent.
    pub fn intent(&self) -> Option<&ChartIntent> {
        self.intent.as_ref()
    }

    /// Applied intents, oldest first.
    pub fn intent_history(&self) -> impl ExactSizeIterator<Item = &ChartIntent> + '_ {
        self.history.iter()
    }

    /// The transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns `true` while a submitted query awaits completion.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Counter bumped by every load and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn apply(&mut self, raw: &Dataset, intent: ChartIntent) -> QueryResult {
        let missing = intent.transform.missing_columns(raw);
        if !missing.is_empty() {
            warn!(?missing, "transform reads columns the dataset does not have");
        }
        let view = Arc::new(intent.transform.apply(raw));
        let unplotted = intent.missing_columns(&view);
        if !unplotted.is_empty() {
            warn!(?unplotted, "chart keys name no view column");
        }
        debug!(
            kind = %intent.kind,
            raw_rows = raw.row_count(),
            view_rows = view.row_count(),
            "transform applied"
        );

        self.say(format!(
            "I've generated a **{} chart** showing **{}**.",
            intent.kind, intent.title
        ));
        self.view = Some(Arc::clone(&view));
        self.intent = Some(intent.clone());
        self.history.push_back(intent.clone());
        while self.history.len() > self.config.history_limit {
            self.history.pop_front();
        }
        QueryResult { intent, view }
    }

    fn say(&mut self, content: impl Into<String>) {
        self.push_message(Role::Assistant, content.into());
    }

    fn push_message(&mut self, role: Role, content: String) {
        self.messages.push(Message {
            id: self.next_message_id,
            role,
            content,
        });
        self.next_message_id += 1;
    }
}
