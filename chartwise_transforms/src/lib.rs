// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset transforms for Chartwise.
//!
//! This crate provides:
//! - a small transform IR ([`TransformSpec`]) with three optional stages, and
//! - a full-recompute executor ([`apply`]) that always runs them as filter, then aggregate,
//!   then sort.
//!
//! The executor never fails. Cells that cannot be read as numbers follow the coercion policy
//! of [`chartwise_core::Value::to_number`], and references to absent columns behave as if
//! every cell in that column were `Null`.

#![no_std]

extern crate alloc;

mod aggregate;
mod filter;
mod pipeline;
mod sort;
mod transform;

pub use aggregate::{UNKNOWN_GROUP, aggregate};
pub use filter::filter;
pub use pipeline::apply;
pub use sort::{SortKey, sort};
pub use transform::{
    AggregateOp, Aggregation, Filter, FilterOp, Sort, SortOrder, TransformSpec,
};
