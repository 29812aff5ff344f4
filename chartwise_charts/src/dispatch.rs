// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-chart-type shaping of a view dataset.
//!
//! Each chart family needs its data in a different shape:
//! - bar/line/area read one numeric field per series, aligned by the x value of each row,
//! - pie reads one value per row (from the first series only) and labels it by x,
//! - scatter pairs `x`/`y` per row and series, keeping the row's other fields for tooltips.
//!
//! [`dispatch`] produces that shape as a [`ChartView`]. It only reads the view dataset.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chartwise_core::{Dataset, Value};
use peniko::Color;
use smallvec::SmallVec;

use crate::palette::{LegendItem, palette_color};
use crate::{ChartIntent, ChartKind, SeriesSpec};

/// A series with its display name and color resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesStyle {
    /// Column holding the series values.
    pub key: String,
    /// Display name (explicit name, or the key).
    pub name: String,
    /// Stroke/fill color (explicit color, or the palette color for the series index).
    pub color: Color,
}

impl SeriesStyle {
    /// Resolves a series' name and color.
    pub fn resolve(index: usize, spec: &SeriesSpec) -> Self {
        Self {
            key: spec.key.clone(),
            name: String::from(spec.display_name()),
            color: spec.color.unwrap_or_else(|| palette_color(index)),
        }
    }
}

/// Mark type for cartesian charts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartesianMark {
    /// Bars.
    Bar,
    /// Lines.
    Line,
    /// Filled areas.
    Area,
}

/// One x position of a cartesian chart.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianRow {
    /// The row's x value, as stored in the view.
    pub x: Value,
    /// One value per series, in series order; `None` where the cell is missing or not a number.
    pub values: SmallVec<[Option<f64>; 4]>,
}

/// Bar, line, or area chart data.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianView {
    /// Mark type.
    pub mark: CartesianMark,
    /// Column supplying x values.
    pub x_key: String,
    /// Resolved series, in intent order.
    pub series: Vec<SeriesStyle>,
    /// One entry per view row, in view order.
    pub rows: Vec<CartesianRow>,
}

/// One pie slice.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    /// Category label (empty for a missing label).
    pub label: String,
    /// Slice value; `None` where the cell is missing or not a number.
    pub value: Option<f64>,
    /// Slice fill.
    pub fill: Color,
}

/// Pie chart data.
#[derive(Clone, Debug, PartialEq)]
pub struct PieView {
    /// Column supplying slice labels.
    pub label_key: String,
    /// The first series, which supplies slice values.
    pub series: SeriesStyle,
    /// One slice per view row, in view order.
    pub slices: Vec<PieSlice>,
}

impl PieView {
    /// Sum of the positive slice values.
    pub fn total(&self) -> f64 {
        self.slices
            .iter()
            .filter_map(|s| s.value)
            .filter(|v| *v > 0.0)
            .sum()
    }

    /// Fraction of the total covered by slice `index` (`0.0` for empty or non-positive slices).
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.slices.get(index).and_then(|s| s.value) {
            Some(v) if v > 0.0 && total > 0.0 => v / total,
            _ => 0.0,
        }
    }
}

/// One scatter series.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterSeries {
    /// Resolved style.
    pub style: SeriesStyle,
    /// The view rows with `x` and `y` columns set for this series.
    ///
    /// All other fields of each row are preserved for tooltips.
    pub points: Dataset,
}

/// Scatter chart data.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterView {
    /// Column supplying x values.
    pub x_key: String,
    /// One derived dataset per series, in intent order.
    pub series: Vec<ScatterSeries>,
}

/// The renderer-facing shape of a chart.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartView {
    /// Bar, line, or area chart.
    Cartesian(CartesianView),
    /// Pie chart.
    Pie(PieView),
    /// Scatter chart.
    Scatter(ScatterView),
}

impl ChartView {
    /// Returns the chart kind this view renders.
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Cartesian(c) => match c.mark {
                CartesianMark::Bar => ChartKind::Bar,
                CartesianMark::Line => ChartKind::Line,
                CartesianMark::Area => ChartKind::Area,
            },
            Self::Pie(_) => ChartKind::Pie,
            Self::Scatter(_) => ChartKind::Scatter,
        }
    }

    /// Returns legend entries: one per series, or one per slice for pies.
    pub fn legend(&self) -> Vec<LegendItem> {
        match self {
            Self::Cartesian(c) => legend_items(c.series.iter()),
            Self::Scatter(s) => legend_items(s.series.iter().map(|s| &s.style)),
            Self::Pie(p) => p
                .slices
                .iter()
                .map(|s| LegendItem {
                    label: s.label.clone(),
                    fill: s.fill,
                })
                .collect(),
        }
    }
}

/// Shapes `view` for the intent's chart type.
///
/// Keys that name no column of `view` read as missing cells rather than failing.
pub fn dispatch(intent: &ChartIntent, view: &Dataset) -> ChartView {
    match intent.kind {
        ChartKind::Bar => ChartView::Cartesian(cartesian(intent, view, CartesianMark::Bar)),
        ChartKind::Line => ChartView::Cartesian(cartesian(intent, view, CartesianMark::Line)),
        ChartKind::Area => ChartView::Cartesian(cartesian(intent, view, CartesianMark::Area)),
        ChartKind::Pie => ChartView::Pie(pie(intent, view)),
        ChartKind::Scatter => ChartView::Scatter(scatter(intent, view)),
    }
}

fn legend_items<'a>(styles: impl Iterator<Item = &'a SeriesStyle>) -> Vec<LegendItem> {
    styles
        .map(|s| LegendItem {
            label: s.name.clone(),
            fill: s.color,
        })
        .collect()
}

fn styles(intent: &ChartIntent) -> Vec<SeriesStyle> {
    intent
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| SeriesStyle::resolve(i, s))
        .collect()
}

fn cell(view: &Dataset, row: usize, column: Option<usize>) -> Option<&Value> {
    view.rows().get(row)?.get(column?)
}

fn cartesian(intent: &ChartIntent, view: &Dataset, mark: CartesianMark) -> CartesianView {
    let x_col = view.column_index(&intent.x_key);
    let series_cols: SmallVec<[Option<usize>; 4]> = intent
        .series
        .iter()
        .map(|s| view.column_index(&s.key))
        .collect();

    let rows = (0..view.row_count())
        .map(|row| CartesianRow {
            x: cell(view, row, x_col).cloned().unwrap_or_default(),
            values: series_cols
                .iter()
                .map(|&ci| cell(view, row, ci).and_then(Value::as_finite))
                .collect(),
        })
        .collect();

    CartesianView {
        mark,
        x_key: intent.x_key.clone(),
        series: styles(intent),
        rows,
    }
}

fn pie(intent: &ChartIntent, view: &Dataset) -> PieView {
    let series = match intent.series.first() {
        Some(first) => SeriesStyle::resolve(0, first),
        // Validated intents always carry a series; an empty one shapes an empty pie.
        None => {
            return PieView {
                label_key: intent.x_key.clone(),
                series: SeriesStyle {
                    key: String::new(),
                    name: String::new(),
                    color: palette_color(0),
                },
                slices: Vec::new(),
            };
        }
    };

    let label_col = view.column_index(&intent.x_key);
    let value_col = view.column_index(&series.key);
    let slices = (0..view.row_count())
        .map(|row| PieSlice {
            label: cell(view, row, label_col)
                .and_then(Value::to_text)
                .map(String::from)
                .unwrap_or_default(),
            value: cell(view, row, value_col).and_then(Value::as_finite),
            // Slice colors cycle through the series' explicit colors before the palette.
            fill: intent.series[row % intent.series.len()]
                .color
                .unwrap_or_else(|| palette_color(row)),
        })
        .collect();

    PieView {
        label_key: intent.x_key.clone(),
        series,
        slices,
    }
}

fn scatter(intent: &ChartIntent, view: &Dataset) -> ScatterView {
    let x_col = view.column_index(&intent.x_key);
    let xs: Vec<Value> = (0..view.row_count())
        .map(|row| cell(view, row, x_col).cloned().unwrap_or_default())
        .collect();

    let series = styles(intent)
        .into_iter()
        .map(|style| {
            let y_col = view.column_index(&style.key);
            let ys = (0..view.row_count())
                .map(|row| cell(view, row, y_col).cloned().unwrap_or_default());
            let points = view
                .with_column("x", xs.iter().cloned())
                .with_column("y", ys);
            ScatterSeries { style, points }
        })
        .collect();

    ScatterView {
        x_key: intent.x_key.clone(),
        series,
    }
}
