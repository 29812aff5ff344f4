// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed chart intents.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chartwise_core::Dataset;
use chartwise_transforms::TransformSpec;
use peniko::Color;
use smallvec::SmallVec;

/// Chart type requested by an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Vertical bars per x category.
    Bar,
    /// Lines through per-row points.
    Line,
    /// Filled areas under per-row points.
    Area,
    /// One slice per row, sized by the first series.
    Pie,
    /// Points at `(x, y)` per row and series.
    Scatter,
}

impl ChartKind {
    /// All chart kinds, in a stable order.
    pub const ALL: [Self; 5] = [Self::Bar, Self::Line, Self::Area, Self::Pie, Self::Scatter];

    /// Parses the wire token (`"bar"`, `"line"`, ...).
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == token)
    }

    /// Returns the wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    /// Column holding the series values.
    pub key: String,
    /// Explicit color; when absent the palette color for the series index is used.
    pub color: Option<Color>,
    /// Display name; when absent the key is shown.
    pub name: Option<String>,
}

impl SeriesSpec {
    /// Creates a series with no explicit color or name.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            color: None,
            name: None,
        }
    }

    /// Sets the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the name shown in legends and tooltips.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// A validated description of the chart to render.
///
/// Intents are replaced wholesale by each query; they never merge. After the transform runs,
/// `x_key` and every series key are expected to name columns of the view. Nothing enforces
/// that: a violation shows up as missing data in the chart (see
/// [`ChartIntent::missing_columns`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartIntent {
    /// Chart type.
    pub kind: ChartKind,
    /// Chart title.
    pub title: String,
    /// Optional subtitle.
    pub description: Option<String>,
    /// Column supplying x values (category labels for pies).
    pub x_key: String,
    /// Requested series, never empty for validated intents.
    pub series: SmallVec<[SeriesSpec; 4]>,
    /// Transform producing the view from the raw dataset.
    pub transform: TransformSpec,
}

impl ChartIntent {
    /// Creates an intent with an identity transform and no title.
    pub fn new(
        kind: ChartKind,
        x_key: impl Into<String>,
        series: impl IntoIterator<Item = SeriesSpec>,
    ) -> Self {
        Self {
            kind,
            title: String::new(),
            description: None,
            x_key: x_key.into(),
            series: series.into_iter().collect(),
            transform: TransformSpec::default(),
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the transform.
    pub fn with_transform(mut self, transform: TransformSpec) -> Self {
        self.transform = transform;
        self
    }

    /// Re-targets the intent to another chart type, keeping keys and transform.
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the columns the chart reads from the view: `x_key`, then series keys.
    pub fn view_columns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.series.len() + 1);
        out.push(&self.x_key);
        for s in &self.series {
            if !out.contains(&s.key.as_str()) {
                out.push(&s.key);
            }
        }
        out
    }

    /// Returns the view columns `view` does not have.
    pub fn missing_columns<'a>(&'a self, view: &Dataset) -> Vec<&'a str> {
        self.view_columns()
            .into_iter()
            .filter(|c| view.column_index(c).is_none())
            .collect()
    }
}
