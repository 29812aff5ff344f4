// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular file loading.
//!
//! Every loader produces an all-text [`Dataset`]: cells keep the exact text of the file and
//! numeric interpretation is left to [`Value`]'s coercion rules. The header row (or the first
//! JSON object) defines the columns. Blank records are skipped, short records are padded with
//! [`Value::Null`], and cells past the last column are dropped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chartwise_core::{Dataset, Value};
use serde_json::Value as Json;

use crate::LoadError;

/// A supported file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// A JSON array of objects.
    Json,
    /// An `.xlsx`, `.xls`, or `.ods` workbook (first sheet).
    #[cfg(feature = "excel")]
    Spreadsheet,
}

impl Format {
    /// Picks a format from a file extension, ignoring ASCII case.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            #[cfg(feature = "excel")]
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Spreadsheet),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Loads a file, choosing the format from its extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let open = || {
        File::open(path)
            .map(BufReader::new)
            .map_err(|source| LoadError::Io {
                path: path.to_owned(),
                source,
            })
    };
    match format {
        Format::Csv => load_delimited(open()?, b','),
        Format::Tsv => load_delimited(open()?, b'\t'),
        Format::Json => load_json(open()?),
        #[cfg(feature = "excel")]
        Format::Spreadsheet => load_spreadsheet(path),
    }
}

/// Loads delimited text with a header row.
pub fn load_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(str::to_owned).collect());
    }
    from_text_records(columns, records)
}

/// Loads a JSON array of objects.
///
/// The first object's keys, in file order, define the columns. Strings, numbers, and booleans
/// are kept as their text; `null` becomes [`Value::Null`]; nested arrays and objects keep their
/// JSON text.
pub fn load_json<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let Json::Array(items) = serde_json::from_reader::<_, Json>(reader)? else {
        return Err(LoadError::NotRecords);
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Json::Object(fields) = item else {
            return Err(LoadError::NotRecords);
        };
        if fields.values().all(|v| json_cell(v).is_blank()) {
            continue;
        }
        records.push(fields);
    }

    let dataset = Dataset::from_records(
        records
            .into_iter()
            .map(|fields| fields.into_iter().map(|(k, v)| (k, json_cell(&v)))),
    );
    if dataset.columns().is_empty() {
        return Err(LoadError::NoColumns);
    }
    Ok(dataset)
}

fn json_cell(value: &Json) -> Value {
    match value {
        Json::Null => Value::Null,
        Json::String(s) => Value::text(s.as_str()),
        other => Value::text(other.to_string()),
    }
}

/// Loads the first sheet of a workbook; its first row is the header.
#[cfg(feature = "excel")]
pub fn load_spreadsheet(path: &Path) -> Result<Dataset, LoadError> {
    use calamine::{Data, Reader, open_workbook_auto};

    let mut workbook = open_workbook_auto(path)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(LoadError::NoColumns);
    };
    let range = workbook.worksheet_range(&sheet)?;

    let cell_text = |cell: &Data| match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut rows = range.rows();
    let columns = rows
        .next()
        .map(|header| header.iter().map(cell_text).collect())
        .unwrap_or_default();
    let records = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    from_text_records(columns, records)
}

/// Builds a dataset from header and text records.
///
/// Records whose cells are all empty or whitespace are dropped, so a line of bare
/// delimiters (`,,`) never becomes a row. Short records are padded with `Null` and
/// long ones truncated to the header width.
fn from_text_records(
    columns: Vec<String>,
    records: Vec<Vec<String>>,
) -> Result<Dataset, LoadError> {
    if columns.iter().all(String::is_empty) {
        return Err(LoadError::NoColumns);
    }
    let width = columns.len();
    let mut dataset = Dataset::new(columns)?;
    for record in records {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        dataset.push_row(record.into_iter().take(width).map(Value::text).collect())?;
    }
    Ok(dataset)
}
