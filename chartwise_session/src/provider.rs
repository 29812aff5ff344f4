// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam to the natural-language intent generator.

use std::future::Future;

use serde_json::Value as Json;

use crate::ProviderError;

/// Turns a user question plus a data preview into an untrusted chart intent.
///
/// Implementations typically wrap a language-model API: render [`build_prompt`], send it,
/// and decode the reply with [`parse_intent_text`]. The returned JSON is validated by the
/// session, so implementations do not need to check its shape.
pub trait IntentGenerator {
    /// Generates an intent for `query`.
    ///
    /// `preview` is a JSON array of the first few raw rows.
    fn generate(&self, query: &str, preview: &str)
    -> impl Future<Output = Result<Json, ProviderError>>;
}

/// Renders the instruction prompt for a language-model-backed generator.
pub fn build_prompt(query: &str, preview: &str) -> String {
    format!(
        r##"You are a data visualization expert.
User Query: "{query}"
Data Preview:
{preview}

Generate a JSON configuration for a chart that best answers the query.
Return ONLY valid JSON.

Structure:
{{
  "type": "bar" | "line" | "area" | "pie" | "scatter",
  "title": "Chart Title",
  "description": "Brief description",
  "xAxisKey": "column_name_for_x_axis",
  "series": [
    {{ "key": "column_name_for_metric", "color": "#hexcode", "name": "Human Readable Name" }}
  ],
  "transform": {{
    "filter": {{ "column": "string", "value": "string | number", "operator": "equals" | "contains" }} | null,
    "aggregation": {{ "type": "sum" | "average" | "count" | "none", "groupBy": "string", "metric": "string" }} | null,
    "sort": {{ "column": "string", "direction": "asc" | "desc" }} | null
  }}
}}

IMPORTANT:
- If the user asks for a specific category (e.g. "Books"), add a "filter".
- If the user implies summarizing (e.g. "Revenue by Category", "Total Sales"), use "aggregation".
  - For pie charts, ALWAYS use aggregation if the data seems transactional (many rows per category).
  - "groupBy" should be the categorical column (xAxisKey).
  - "metric" should be the numeric column to sum or average.
- Ensure "xAxisKey" matches a column in the data exactly.
- Ensure each "series.key" matches a numeric column exactly (or the aggregated metric name).
"##
    )
}

/// Parses a model reply as JSON, ignoring Markdown code fences around it.
pub fn parse_intent_text(text: &str) -> Result<Json, ProviderError> {
    let stripped = text.replace("```json", "").replace("```", "");
    Ok(serde_json::from_str(stripped.trim())?)
}
