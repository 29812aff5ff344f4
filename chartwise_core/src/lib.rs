// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row datasets and cell values for Chartwise.
//!
//! This crate is the bottom layer of the query-to-chart pipeline:
//! - [`Value`] is the tagged cell type (`Number`, `String`, `Null`) together with the
//!   single coercion policy every other stage relies on, and
//! - [`Dataset`] is an immutable, ordered set of rows sharing one column list.
//!
//! It also hosts the insight summarizer ([`summarize`]), which computes per-column
//! statistics over whatever dataset is currently on screen.
//!
//! Everything here is pure: operations take `&self` and return new datasets.

#![no_std]

extern crate alloc;

mod dataset;
mod stats;
mod value;

pub use dataset::{Dataset, DatasetError, Row, RowView};
pub use stats::{ColumnStat, is_numeric_column, summarize};
pub use value::{Value, parse_finite};
