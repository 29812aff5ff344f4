// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell values and the numeric coercion policy.

extern crate alloc;

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};

use serde::{Serialize, Serializer};

/// A single dataset cell.
///
/// Cells produced by a file loader are always [`Value::String`]; numbers only appear once a
/// pipeline stage computes them (for example an aggregated metric).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value (a missing field).
    #[default]
    Null,
    /// A computed number.
    Number(f64),
    /// Raw text as read from the source.
    String(String),
}

/// Parses text as a finite `f64`.
///
/// Surrounding whitespace is ignored and the whole remaining string must parse. Empty strings
/// and non-finite results (`inf`, `NaN`) are rejected.
pub fn parse_finite(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Value {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a finite number, if it is one or parses as one.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Number(n) => n.is_finite().then_some(*n),
            Self::String(s) => parse_finite(s),
        }
    }

    /// Returns `true` if [`Value::as_finite`] would succeed.
    pub fn is_numeric(&self) -> bool {
        self.as_finite().is_some()
    }

    /// Coerces the value to a number, never failing.
    ///
    /// Values that are not numeric (text that does not parse, non-finite numbers, `Null`)
    /// coerce to `0.0`. This is the aggregation metric policy: a malformed cell contributes
    /// nothing to a sum instead of aborting the query. Callers that need to tell "zero" from
    /// "not a number" must use [`Value::as_finite`] instead.
    pub fn to_number(&self) -> f64 {
        self.as_finite().unwrap_or(0.0)
    }

    /// Returns the string form of the value, or `None` for `Null`.
    ///
    /// Integral numbers print without a fractional part (`30`, not `30.0`).
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
            Self::String(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }

    /// Returns the lower-cased string form, or `None` for `Null`.
    ///
    /// This is the form used for case-insensitive filtering and sorting.
    pub fn to_folded(&self) -> Option<String> {
        self.to_text().map(|t| t.to_lowercase())
    }

    /// Returns `true` for `Null` and for empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(_) => false,
            Self::String(s) => s.is_empty(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid printing `-0`.
        return "0".to_string();
    }
    format!("{n}")
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}
