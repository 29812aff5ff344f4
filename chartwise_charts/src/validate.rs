// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validation of untrusted intent JSON.
//!
//! The expected shape is:
//!
//! ```json
//! {
//!   "type": "bar" | "line" | "area" | "pie" | "scatter",
//!   "title": "Chart Title",
//!   "description": "optional",
//!   "xAxisKey": "column",
//!   "series": [{ "key": "column", "color": "#hex", "name": "optional" }],
//!   "transform": {
//!     "filter": { "column": "...", "value": "..." | 0, "operator": "equals" | "contains" } | null,
//!     "aggregation": { "type": "sum" | "average" | "count" | "none", "groupBy": "...", "metric": "..." } | null,
//!     "sort": { "column": "...", "direction": "asc" | "desc" } | null
//!   }
//! }
//! ```

extern crate alloc;

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

use chartwise_core::Value;
use chartwise_transforms::{
    AggregateOp, Aggregation, Filter, FilterOp, Sort, SortOrder, TransformSpec,
};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use smallvec::SmallVec;

use crate::{ChartIntent, ChartKind, SeriesSpec};

/// What to do with an enum token the validator does not recognize.
///
/// This applies to the filter `operator`, the aggregation `type` and the sort `direction`.
/// The chart `type` is always strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTokenPolicy {
    /// Substitute the historical fallback: equality for operators, no aggregation for
    /// aggregation types, descending for sort directions.
    #[default]
    FallBack,
    /// Fail with [`SchemaErrorKind::UnknownToken`].
    Reject,
}

/// Validator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Handling of unrecognized enum tokens in the transform.
    pub unknown_tokens: UnknownTokenPolicy,
}

impl ValidatorOptions {
    /// Sets the unknown token policy.
    pub fn with_unknown_tokens(mut self, policy: UnknownTokenPolicy) -> Self {
        self.unknown_tokens = policy;
        self
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// The value is not a JSON object.
    NotAnObject,
    /// A required field is absent or `null`.
    Missing,
    /// The field has the wrong JSON type.
    WrongType {
        /// Expected JSON type.
        expected: &'static str,
    },
    /// A required string or list is empty.
    Empty,
    /// An enum token is not recognized.
    UnknownToken(String),
    /// A color string could not be parsed.
    InvalidColor(String),
}

/// An intent that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Dotted path of the offending field (`series[1].key`); empty for the root.
    pub path: String,
    /// Failure kind.
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    fn new(path: impl Into<String>, kind: SchemaErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "intent"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            SchemaErrorKind::NotAnObject => write!(f, "`{path}` must be an object"),
            SchemaErrorKind::Missing => write!(f, "`{path}` is required"),
            SchemaErrorKind::WrongType { expected } => write!(f, "`{path}` must be {expected}"),
            SchemaErrorKind::Empty => write!(f, "`{path}` must not be empty"),
            SchemaErrorKind::UnknownToken(t) => write!(f, "`{path}` has unknown value `{t}`"),
            SchemaErrorKind::InvalidColor(c) => write!(f, "`{path}` is not a color: `{c}`"),
        }
    }
}

impl core::error::Error for SchemaError {}

/// Validates intent JSON with default options.
pub fn validate(raw: &Json) -> Result<ChartIntent, SchemaError> {
    validate_with(raw, &ValidatorOptions::default())
}

/// Validates intent JSON.
///
/// Fails when `type`, `xAxisKey` or a non-empty `series` list is missing or malformed, or
/// when a present transform stage is malformed. An absent or `null` `transform` (or stage)
/// normalizes to "no stage".
pub fn validate_with(raw: &Json, options: &ValidatorOptions) -> Result<ChartIntent, SchemaError> {
    let root = object(raw, "")?;

    let kind_token = required_str(root, "type", "type")?;
    let kind = ChartKind::parse(kind_token).ok_or_else(|| {
        SchemaError::new("type", SchemaErrorKind::UnknownToken(kind_token.to_owned()))
    })?;

    let x_key = required_str(root, "xAxisKey", "xAxisKey")?;

    let series = match root.get("series") {
        None | Some(Json::Null) => {
            return Err(SchemaError::new("series", SchemaErrorKind::Missing));
        }
        Some(Json::Array(items)) if items.is_empty() => {
            return Err(SchemaError::new("series", SchemaErrorKind::Empty));
        }
        Some(Json::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| series_spec(item, &format!("series[{i}]")))
            .collect::<Result<SmallVec<[SeriesSpec; 4]>, _>>()?,
        Some(_) => {
            return Err(SchemaError::new(
                "series",
                SchemaErrorKind::WrongType { expected: "an array" },
            ));
        }
    };

    let title = optional_str(root, "title", "title")?.unwrap_or_default();
    let description = optional_str(root, "description", "description")?;

    let transform = match root.get("transform") {
        None | Some(Json::Null) => TransformSpec::default(),
        Some(t) => transform_spec(t, options)?,
    };

    Ok(ChartIntent {
        kind,
        title: title.to_owned(),
        description: description.map(ToOwned::to_owned),
        x_key: x_key.to_owned(),
        series,
        transform,
    })
}

fn series_spec(raw: &Json, path: &str) -> Result<SeriesSpec, SchemaError> {
    let obj = object(raw, path)?;
    let key = required_str(obj, "key", &format!("{path}.key"))?;

    let color_path = format!("{path}.color");
    let color = match optional_str(obj, "color", &color_path)? {
        // An empty color means "use the palette".
        None | Some("") => None,
        Some(c) => Some(parse_css_color(c).ok_or_else(|| {
            SchemaError::new(color_path, SchemaErrorKind::InvalidColor(c.to_owned()))
        })?),
    };

    let name = optional_str(obj, "name", &format!("{path}.name"))?
        .filter(|n| !n.is_empty())
        .map(ToOwned::to_owned);

    Ok(SeriesSpec {
        key: key.to_owned(),
        color,
        name,
    })
}

fn parse_css_color(s: &str) -> Option<Color> {
    parse_color(s.trim())
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

fn transform_spec(raw: &Json, options: &ValidatorOptions) -> Result<TransformSpec, SchemaError> {
    let obj = object(raw, "transform")?;
    let mut spec = TransformSpec::default();

    if let Some(f) = stage(obj, "filter") {
        let f = object(f, "transform.filter")?;
        let column = required_str(f, "column", "transform.filter.column")?;
        let value = scalar(f.get("value"), "transform.filter.value")?;
        let op = match optional_str(f, "operator", "transform.filter.operator")? {
            None => FilterOp::Equals,
            Some("equals") => FilterOp::Equals,
            Some("contains") => FilterOp::Contains,
            Some(t) => fall_back(options, "transform.filter.operator", t, FilterOp::Equals)?,
        };
        spec.filter = Some(Filter {
            column: column.to_owned(),
            value,
            op,
        });
    }

    if let Some(a) = stage(obj, "aggregation") {
        let a = object(a, "transform.aggregation")?;
        let op = match optional_str(a, "type", "transform.aggregation.type")? {
            None => AggregateOp::None,
            Some("sum") => AggregateOp::Sum,
            Some("average") => AggregateOp::Average,
            Some("count") => AggregateOp::Count,
            Some("none") => AggregateOp::None,
            Some(t) => fall_back(options, "transform.aggregation.type", t, AggregateOp::None)?,
        };
        let group_by = optional_str(a, "groupBy", "transform.aggregation.groupBy")?;
        let metric = optional_str(a, "metric", "transform.aggregation.metric")?;
        spec.aggregation = Some(Aggregation::new(
            group_by.unwrap_or_default(),
            metric.unwrap_or_default(),
            op,
        ));
    }

    if let Some(s) = stage(obj, "sort") {
        let s = object(s, "transform.sort")?;
        let column = required_str(s, "column", "transform.sort.column")?;
        let order = match optional_str(s, "direction", "transform.sort.direction")? {
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            // Anything but "asc" has always meant descending.
            None => SortOrder::Desc,
            Some(t) => fall_back(options, "transform.sort.direction", t, SortOrder::Desc)?,
        };
        spec.sort = Some(Sort::new(column, order));
    }

    Ok(spec)
}

fn fall_back<T>(
    options: &ValidatorOptions,
    path: &str,
    token: &str,
    fallback: T,
) -> Result<T, SchemaError> {
    match options.unknown_tokens {
        UnknownTokenPolicy::FallBack => Ok(fallback),
        UnknownTokenPolicy::Reject => Err(SchemaError::new(
            path,
            SchemaErrorKind::UnknownToken(token.to_owned()),
        )),
    }
}

/// Returns a present, non-null stage object.
fn stage<'a>(obj: &'a Map<String, Json>, field: &str) -> Option<&'a Json> {
    obj.get(field).filter(|v| !v.is_null())
}

fn object<'a>(raw: &'a Json, path: &str) -> Result<&'a Map<String, Json>, SchemaError> {
    raw.as_object()
        .ok_or_else(|| SchemaError::new(path, SchemaErrorKind::NotAnObject))
}

fn required_str<'a>(
    obj: &'a Map<String, Json>,
    field: &str,
    path: &str,
) -> Result<&'a str, SchemaError> {
    match optional_str(obj, field, path)? {
        None => Err(SchemaError::new(path, SchemaErrorKind::Missing)),
        Some("") => Err(SchemaError::new(path, SchemaErrorKind::Empty)),
        Some(s) => Ok(s),
    }
}

fn optional_str<'a>(
    obj: &'a Map<String, Json>,
    field: &str,
    path: &str,
) -> Result<Option<&'a str>, SchemaError> {
    match obj.get(field) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(SchemaError::new(
            path,
            SchemaErrorKind::WrongType {
                expected: "a string",
            },
        )),
    }
}

fn scalar(raw: Option<&Json>, path: &str) -> Result<Value, SchemaError> {
    match raw {
        None | Some(Json::Null) => Ok(Value::Null),
        Some(Json::String(s)) => Ok(Value::text(s.as_str())),
        Some(Json::Number(n)) => Ok(n
            .as_f64()
            .map_or_else(|| Value::text(n.to_string()), Value::Number)),
        Some(Json::Bool(b)) => Ok(Value::text(if *b { "true" } else { "false" })),
        Some(_) => Err(SchemaError::new(
            path,
            SchemaErrorKind::WrongType {
                expected: "a string, number, boolean or null",
            },
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal() -> Json {
        json!({
            "type": "bar",
            "title": "Sales by Category",
            "xAxisKey": "Category",
            "series": [{ "key": "Sales" }]
        })
    }

    fn err_of(raw: &Json) -> SchemaError {
        validate(raw).unwrap_err()
    }

    #[test]
    fn minimal_intent_has_identity_transform() {
        let intent = validate(&minimal()).unwrap();
        assert_eq!(intent.kind, ChartKind::Bar);
        assert_eq!(intent.title, "Sales by Category");
        assert_eq!(intent.description, None);
        assert_eq!(intent.x_key, "Category");
        assert_eq!(intent.series.len(), 1);
        assert_eq!(intent.series[0].key, "Sales");
        assert!(intent.transform.is_identity());
        assert_eq!(intent.transform, TransformSpec::default());
    }

    #[test]
    fn full_intent() {
        let raw = json!({
            "type": "pie",
            "title": "Share",
            "description": "Revenue share",
            "xAxisKey": "Category",
            "series": [
                { "key": "Sales", "color": "#ff0000", "name": "Revenue" },
                { "key": "Units", "color": "", "name": null }
            ],
            "transform": {
                "filter": { "column": "Region", "value": "north", "operator": "contains" },
                "aggregation": { "type": "sum", "groupBy": "Category", "metric": "Sales" },
                "sort": { "column": "Sales", "direction": "asc" }
            }
        });
        let intent = validate(&raw).unwrap();
        assert_eq!(intent.kind, ChartKind::Pie);
        assert_eq!(intent.description.as_deref(), Some("Revenue share"));
        assert_eq!(
            intent.series[0].color.map(Color::to_rgba8),
            Some(Color::from_rgb8(255, 0, 0).to_rgba8())
        );
        assert_eq!(intent.series[0].name.as_deref(), Some("Revenue"));
        assert_eq!(intent.series[1].color, None);
        assert_eq!(intent.series[1].name, None);
        assert_eq!(
            intent.transform,
            TransformSpec::new()
                .with_filter(Filter::contains("Region", "north"))
                .with_aggregation(Aggregation::new("Category", "Sales", AggregateOp::Sum))
                .with_sort(Sort::new("Sales", SortOrder::Asc))
        );
    }

    #[test]
    fn null_stages_are_absent() {
        let mut raw = minimal();
        raw["transform"] = json!({ "filter": null, "aggregation": null, "sort": null });
        assert!(validate(&raw).unwrap().transform.is_identity());
        raw["transform"] = Json::Null;
        assert!(validate(&raw).unwrap().transform.is_identity());
    }

    #[test]
    fn required_fields() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("type");
        assert_eq!(err_of(&raw), SchemaError::new("type", SchemaErrorKind::Missing));

        let mut raw = minimal();
        raw["xAxisKey"] = json!(3);
        assert_eq!(
            err_of(&raw),
            SchemaError::new(
                "xAxisKey",
                SchemaErrorKind::WrongType {
                    expected: "a string"
                }
            )
        );

        let mut raw = minimal();
        raw["series"] = json!([]);
        assert_eq!(err_of(&raw), SchemaError::new("series", SchemaErrorKind::Empty));

        let mut raw = minimal();
        raw["series"] = json!({ "key": "Sales" });
        assert_eq!(err_of(&raw).path, "series");

        let mut raw = minimal();
        raw["series"] = json!([{ "key": "Sales" }, { "name": "x" }]);
        assert_eq!(
            err_of(&raw),
            SchemaError::new("series[1].key", SchemaErrorKind::Missing)
        );

        assert_eq!(
            err_of(&json!("bar")),
            SchemaError::new("", SchemaErrorKind::NotAnObject)
        );
    }

    #[test]
    fn unknown_chart_type_is_always_rejected() {
        let mut raw = minimal();
        raw["type"] = json!("radar");
        assert_eq!(
            err_of(&raw),
            SchemaError::new("type", SchemaErrorKind::UnknownToken("radar".into()))
        );
    }

    #[test]
    fn invalid_colors_are_rejected() {
        let mut raw = minimal();
        raw["series"][0]["color"] = json!("not-a-color");
        assert_eq!(
            err_of(&raw),
            SchemaError::new(
                "series[0].color",
                SchemaErrorKind::InvalidColor("not-a-color".into())
            )
        );

        raw["series"][0]["color"] = json!("cornflowerblue");
        assert!(validate(&raw).unwrap().series[0].color.is_some());
    }

    #[test]
    fn filter_values_keep_their_scalar_type() {
        let mut raw = minimal();
        raw["transform"] = json!({ "filter": { "column": "Sales", "value": 10 } });
        let f = validate(&raw).unwrap().transform.filter.unwrap();
        assert_eq!(f.value, Value::Number(10.0));
        assert_eq!(f.op, FilterOp::Equals);

        raw["transform"] = json!({ "filter": { "column": "Sales", "value": [1] } });
        assert_eq!(err_of(&raw).path, "transform.filter.value");
    }

    #[test]
    fn unknown_tokens_fall_back_by_default() {
        let mut raw = minimal();
        raw["transform"] = json!({
            "filter": { "column": "Category", "value": "Books", "operator": "startsWith" },
            "aggregation": { "type": "median", "groupBy": "Category", "metric": "Sales" },
            "sort": { "column": "Sales", "direction": "up" }
        });
        let t = validate(&raw).unwrap().transform;
        assert_eq!(t.filter.unwrap().op, FilterOp::Equals);
        assert_eq!(t.aggregation.unwrap().op, AggregateOp::None);
        assert_eq!(t.sort.unwrap().order, SortOrder::Desc);

        let strict = ValidatorOptions::default().with_unknown_tokens(UnknownTokenPolicy::Reject);
        assert_eq!(
            validate_with(&raw, &strict).unwrap_err(),
            SchemaError::new(
                "transform.filter.operator",
                SchemaErrorKind::UnknownToken("startsWith".into())
            )
        );
    }

    #[test]
    fn tokens_are_case_sensitive() {
        let mut raw = minimal();
        raw["transform"] = json!({
            "filter": { "column": "Category", "value": "Books", "operator": "CONTAINS" },
            "aggregation": { "type": "Sum", "groupBy": "Category", "metric": "Sales" },
            "sort": { "column": "Sales", "direction": "ASC" }
        });
        let t = validate(&raw).unwrap().transform;
        assert_eq!(t.filter.unwrap().op, FilterOp::Equals);
        assert_eq!(t.aggregation.unwrap().op, AggregateOp::None);
        assert_eq!(t.sort.unwrap().order, SortOrder::Desc);

        let strict = ValidatorOptions::default().with_unknown_tokens(UnknownTokenPolicy::Reject);
        assert_eq!(
            validate_with(&raw, &strict).unwrap_err(),
            SchemaError::new(
                "transform.filter.operator",
                SchemaErrorKind::UnknownToken("CONTAINS".into())
            )
        );

        raw["type"] = json!("Bar");
        assert_eq!(
            err_of(&raw),
            SchemaError::new("type", SchemaErrorKind::UnknownToken("Bar".into()))
        );
    }

    #[test]
    fn missing_direction_sorts_descending() {
        let mut raw = minimal();
        raw["transform"] = json!({ "sort": { "column": "Sales" } });
        let strict = ValidatorOptions::default().with_unknown_tokens(UnknownTokenPolicy::Reject);
        let t = validate_with(&raw, &strict).unwrap().transform;
        assert_eq!(t.sort.unwrap().order, SortOrder::Desc);
    }

    #[test]
    fn options_deserialize_from_json() {
        let options: ValidatorOptions =
            serde_json::from_value(json!({ "unknown_tokens": "reject" })).unwrap();
        assert_eq!(options.unknown_tokens, UnknownTokenPolicy::Reject);
        let options: ValidatorOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, ValidatorOptions::default());
    }

    #[test]
    fn errors_render_their_path() {
        let e = SchemaError::new("series[0].key", SchemaErrorKind::Missing);
        assert_eq!(e.to_string(), "`series[0].key` is required");
        let e = SchemaError::new("", SchemaErrorKind::NotAnObject);
        assert_eq!(e.to_string(), "`intent` must be an object");
    }
}
