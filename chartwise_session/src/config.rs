// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration.

use chartwise_charts::ValidatorOptions;
use serde::Deserialize;

/// Tunables for a [`Session`](crate::Session).
///
/// Hosts usually take the defaults; the struct deserializes from JSON (missing fields keep
/// their defaults) so it can also live in a config file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of raw rows sent to the intent generator as a preview.
    pub preview_rows: usize,
    /// Word that, anywhere in a query (ignoring case), resets the view instead of asking for
    /// a chart. `None` disables the shortcut.
    pub reset_keyword: Option<String>,
    /// How generated intents are validated.
    pub validator: ValidatorOptions,
    /// Number of applied intents kept in the history (oldest dropped first).
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            reset_keyword: Some("reset".to_owned()),
            validator: ValidatorOptions::default(),
            history_limit: 32,
        }
    }
}

impl SessionConfig {
    /// Sets the preview size.
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Sets (or clears) the reset keyword.
    pub fn with_reset_keyword(mut self, keyword: Option<&str>) -> Self {
        self.reset_keyword = keyword.map(str::to_lowercase);
        self
    }

    /// Sets the validator options.
    pub fn with_validator(mut self, validator: ValidatorOptions) -> Self {
        self.validator = validator;
        self
    }

    /// Sets the intent history limit.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Returns `true` if `query` asks for a view reset.
    pub(crate) fn is_reset(&self, query: &str) -> bool {
        self.reset_keyword
            .as_deref()
            .filter(|k| !k.is_empty())
            .is_some_and(|k| query.to_lowercase().contains(&k.to_lowercase()))
    }
}
