// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-recompute execution of a [`TransformSpec`].

use chartwise_core::Dataset;

use crate::{TransformSpec, aggregate, filter, sort};

/// Runs `spec` against `raw` and returns the view dataset.
///
/// Stage order is fixed: filter, then aggregate over the filtered rows, then sort the final
/// rows. Absent stages are skipped; the identity spec returns a copy of `raw`.
///
/// Callers should always pass the raw dataset, never a previous view: transforms from
/// separate queries do not compose.
pub fn apply(raw: &Dataset, spec: &TransformSpec) -> Dataset {
    let mut view = match &spec.filter {
        Some(f) => filter(raw, f),
        None => raw.clone(),
    };
    if let Some(a) = &spec.aggregation {
        view = aggregate(&view, a);
    }
    if let Some(s) = &spec.sort {
        view = sort(&view, s);
    }
    view
}

impl TransformSpec {
    /// Runs this spec against `raw`. See [`apply`].
    pub fn apply(&self, raw: &Dataset) -> Dataset {
        apply(raw, self)
    }
}
