// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart intents and chart-type data shaping for Chartwise.
//!
//! A [`ChartIntent`] is the structured answer to a user's question: which chart type to draw,
//! which column feeds the x axis, which columns become series, and which
//! [`TransformSpec`](chartwise_transforms::TransformSpec) turns the raw upload into the view.
//!
//! This crate covers the two ends of that intent's life:
//! - **Validation** ([`validate`]) turns untrusted JSON (from a language-model collaborator)
//!   into a typed intent, or a [`SchemaError`] naming the offending field.
//! - **Dispatch** ([`dispatch`]) shapes a transformed dataset into the rows and series
//!   descriptors a renderer needs for that chart type ([`ChartView`]).
//!
//! Drawing is out of scope; colors are `peniko` colors so renderers can use them directly.

#![no_std]

extern crate alloc;

mod dispatch;
mod intent;
mod palette;
mod validate;

pub use dispatch::{
    CartesianMark, CartesianRow, CartesianView, ChartView, PieSlice, PieView, ScatterSeries,
    ScatterView, SeriesStyle, dispatch,
};
pub use intent::{ChartIntent, ChartKind, SeriesSpec};
pub use palette::{LegendItem, SERIES_PALETTE, palette_color, to_hex};
pub use validate::{
    SchemaError, SchemaErrorKind, UnknownTokenPolicy, ValidatorOptions, validate, validate_with,
};
