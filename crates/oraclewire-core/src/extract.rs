//! Field extraction from a validated envelope.
//!
//! Each metric declares an [`Extraction`] plan: which record to select and
//! which typed field(s) to read. The result is an [`Extracted`] value with a
//! concrete primitive type, so encoders never probe JSON themselves.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde_json::{Map, Number, Value};

use crate::error::OracleError;
use crate::request::RequestedIdentifiers;
use crate::validator::{ApiEnvelope, EnvelopeData};

/// One step of a field path inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    /// Object member lookup; absent or `null` members fail.
    Field(&'static str),
    /// First element of a non-empty array.
    First,
}

/// Per-metric extraction plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Number at `path` inside the first record.
    Number(&'static [Hop]),
    /// String at `path` inside the first record; numbers are rendered as text.
    Text(&'static [Hop]),
    /// Number of records in `data`.
    Count,
    /// Map `key` to `value` across all records, then project over the
    /// requested identifiers in request order.
    Batch {
        key: &'static str,
        value: &'static str,
    },
    /// Text member of an object-shaped `data`.
    Answer(&'static str),
    /// Text at `with_primary` when the caller supplied a primary identifier,
    /// otherwise text at `without_primary`.
    ByPrimary {
        with_primary: &'static [Hop],
        without_primary: &'static [Hop],
    },
    /// First present candidate field of the first record, number or text;
    /// the whole record when no candidate has either type. Only absent or
    /// `null` candidates fall through; `0` and `""` are taken as found.
    FirstOf(&'static [&'static str]),
}

/// Typed value handed to an encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Number(Number),
    Text(String),
    Count(usize),
    Series(Vec<Number>),
    Record(Map<String, Value>),
}

impl Extracted {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Count(_) => "count",
            Self::Series(_) => "series",
            Self::Record(_) => "record",
        }
    }
}

pub fn extract(
    metric: &'static str,
    plan: &Extraction,
    envelope: ApiEnvelope,
    identifiers: &RequestedIdentifiers,
) -> Result<Extracted, OracleError> {
    match (*plan, envelope.data) {
        (Extraction::Count, EnvelopeData::Records(records)) => Ok(Extracted::Count(records.len())),
        (Extraction::Number(path), EnvelopeData::Records(records)) => {
            let record = first_record(metric, &records)?;
            number_at(metric, record, path).map(Extracted::Number)
        }
        (Extraction::Text(path), EnvelopeData::Records(records)) => {
            let record = first_record(metric, &records)?;
            text_at(metric, record, path).map(Extracted::Text)
        }
        (
            Extraction::ByPrimary {
                with_primary,
                without_primary,
            },
            EnvelopeData::Records(records),
        ) => {
            let record = first_record(metric, &records)?;
            let path = if identifiers.primary.is_some() {
                with_primary
            } else {
                without_primary
            };
            text_at(metric, record, path).map(Extracted::Text)
        }
        (Extraction::Batch { key, value }, EnvelopeData::Records(records)) => {
            batch(metric, &records, key, value, &identifiers.ordered).map(Extracted::Series)
        }
        (Extraction::FirstOf(candidates), EnvelopeData::Records(mut records)) => {
            first_record(metric, &records)?;
            let Value::Object(record) = records.swap_remove(0) else {
                return Err(OracleError::invalid_shape(metric, "first record is not an object"));
            };
            Ok(first_of(candidates, record))
        }
        (Extraction::Answer(field), EnvelopeData::Object(object)) => match object.get(field) {
            None | Some(Value::Null) => Err(OracleError::NoData {
                metric,
                identifier: None,
            }),
            Some(Value::String(text)) => Ok(Extracted::Text(text.clone())),
            Some(other) => Err(OracleError::invalid_shape(
                metric,
                format!("field '{field}' must be text, got {}", json_type(other)),
            )),
        },
        (_, EnvelopeData::Object(_)) => Err(OracleError::invalid_shape(
            metric,
            "expected a list of records, got an object",
        )),
        (Extraction::Answer(_), EnvelopeData::Records(_)) => Err(OracleError::invalid_shape(
            metric,
            "expected an object, got a list of records",
        )),
    }
}

fn first_record<'a>(
    metric: &'static str,
    records: &'a [Value],
) -> Result<&'a Map<String, Value>, OracleError> {
    match records.first() {
        Some(Value::Object(record)) => Ok(record),
        Some(_) => Err(OracleError::invalid_shape(
            metric,
            "first record is not an object",
        )),
        None => Err(OracleError::invalid_shape(metric, "no record to select")),
    }
}

/// Walk `path` from `record`, failing on the first absent hop.
fn walk<'a>(
    metric: &'static str,
    record: &'a Map<String, Value>,
    path: &[Hop],
) -> Result<&'a Value, OracleError> {
    let mut walked = String::new();
    let mut current: Option<&Value> = None;

    for hop in path {
        let next = match (hop, current) {
            (Hop::Field(name), None) => record.get(*name),
            (Hop::Field(name), Some(Value::Object(object))) => object.get(*name),
            (Hop::First, Some(Value::Array(items))) => items.first(),
            _ => None,
        };
        match hop {
            Hop::Field(name) if walked.is_empty() => walked.push_str(name),
            Hop::Field(name) => {
                let _ = write!(walked, ".{name}");
            }
            Hop::First => walked.push_str("[0]"),
        }
        match next {
            Some(Value::Null) | None => {
                return Err(OracleError::invalid_shape(
                    metric,
                    format!("missing or empty '{walked}'"),
                ))
            }
            Some(value) => current = Some(value),
        }
    }

    current.ok_or_else(|| OracleError::invalid_shape(metric, "empty field path"))
}

fn number_at(
    metric: &'static str,
    record: &Map<String, Value>,
    path: &[Hop],
) -> Result<Number, OracleError> {
    match walk(metric, record, path)? {
        Value::Number(number) => Ok(number.clone()),
        other => Err(OracleError::invalid_shape(
            metric,
            format!("{} must be a number, got {}", display_path(path), json_type(other)),
        )),
    }
}

fn text_at(
    metric: &'static str,
    record: &Map<String, Value>,
    path: &[Hop],
) -> Result<String, OracleError> {
    match walk(metric, record, path)? {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(OracleError::invalid_shape(
            metric,
            format!("{} must be text, got {}", display_path(path), json_type(other)),
        )),
    }
}

fn batch(
    metric: &'static str,
    records: &[Value],
    key: &'static str,
    value: &'static str,
    requested: &[String],
) -> Result<Vec<Number>, OracleError> {
    let mut by_key: HashMap<String, Number> = HashMap::with_capacity(records.len());
    for record in records {
        let Value::Object(record) = record else {
            return Err(OracleError::invalid_shape(metric, "record is not an object"));
        };
        let natural_key = match record.get(key) {
            Some(Value::String(text)) => text.trim().to_owned(),
            Some(Value::Number(number)) => number.to_string(),
            _ => {
                return Err(OracleError::invalid_shape(
                    metric,
                    format!("record is missing '{key}'"),
                ))
            }
        };
        let Some(Value::Number(number)) = record.get(value) else {
            return Err(OracleError::invalid_shape(
                metric,
                format!("'{value}' for '{natural_key}' must be a number"),
            ));
        };
        by_key.entry(natural_key).or_insert_with(|| number.clone());
    }

    requested
        .iter()
        .map(|identifier| {
            by_key
                .get(identifier)
                .cloned()
                .ok_or_else(|| OracleError::ValueNotFound {
                    identifier: identifier.clone(),
                })
        })
        .collect()
}

fn first_of(candidates: &[&'static str], record: Map<String, Value>) -> Extracted {
    let found = candidates
        .iter()
        .find_map(|name| record.get(*name).filter(|value| !value.is_null()));
    match found {
        Some(Value::Number(number)) => Extracted::Number(number.clone()),
        Some(Value::String(text)) => Extracted::Text(text.clone()),
        _ => Extracted::Record(record),
    }
}

fn display_path(path: &[Hop]) -> String {
    let mut rendered = String::new();
    for hop in path {
        match hop {
            Hop::Field(name) if rendered.is_empty() => rendered.push_str(name),
            Hop::Field(name) => {
                let _ = write!(rendered, ".{name}");
            }
            Hop::First => rendered.push_str("[0]"),
        }
    }
    rendered
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
