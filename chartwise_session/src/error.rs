// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session error types.

use std::io;
use std::path::PathBuf;

use chartwise_charts::SchemaError;
use chartwise_core::DatasetError;
use thiserror::Error;

/// Failure reported by an [`IntentGenerator`](crate::IntentGenerator).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The generator could not be reached or refused the request.
    #[error("intent generator unavailable: {0}")]
    Unavailable(String),
    /// The generator answered with text that is not JSON.
    #[error("intent generator returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a query produced no new chart.
///
/// Every variant is recovered inside the session: the assistant message for it (if any) has
/// already been recorded and the previous chart is still in place.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No dataset (or an empty one) is loaded.
    #[error("no dataset loaded")]
    EmptyDataset,
    /// The query text was blank.
    #[error("query is blank")]
    BlankQuery,
    /// Another query is still waiting for its intent.
    #[error("another query is already in flight")]
    Busy,
    /// The generated intent failed validation.
    #[error("invalid chart intent: {0}")]
    Schema(#[from] SchemaError),
    /// The intent generator failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Failure loading a tabular file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Malformed delimited text.
    #[error("invalid delimited text: {0}")]
    Csv(#[from] csv::Error),
    /// Malformed or unreadable spreadsheet.
    #[cfg(feature = "excel")]
    #[error("invalid spreadsheet: {0}")]
    Excel(#[from] calamine::Error),
    /// Malformed JSON.
    #[error("invalid JSON records: {0}")]
    Json(#[from] serde_json::Error),
    /// JSON that parsed but is not an array of objects.
    #[error("JSON input must be an array of objects")]
    NotRecords,
    /// The file extension names no supported format.
    #[error("unsupported file format `{0}`")]
    UnsupportedFormat(String),
    /// The file has no header row (or an empty one).
    #[error("file has no columns")]
    NoColumns,
    /// The header row repeats a column name.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
