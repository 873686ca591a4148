//! Response validation chain.
//!
//! Checks run in a fixed order and the first failure is returned:
//!
//! 1. transport error (reclassified as a timeout when the text says so)
//! 2. missing body or falsy `success`
//! 3. missing, mistyped or empty `data`
//!
//! Record and field checks are the fourth link and live in
//! [`extract`](crate::extract), which consumes the [`ApiEnvelope`] produced
//! here.

use serde_json::{Map, Value};

use crate::error::OracleError;
use crate::http_client::{HttpError, HttpResponse};

/// Transport outcome as seen by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status_ok: bool,
    pub error_message: Option<String>,
    pub body: Option<Value>,
}

impl RawResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status_ok: true,
            error_message: None,
            body: Some(body),
        }
    }

    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            status_ok: false,
            error_message: Some(message.into()),
            body: None,
        }
    }

    pub fn from_transport(result: Result<HttpResponse, HttpError>) -> Self {
        match result {
            Err(error) => Self::transport_error(error.message()),
            Ok(response) if !response.is_success() => Self {
                status_ok: false,
                error_message: Some(format!("upstream returned status {}", response.status)),
                body: serde_json::from_str(&response.body).ok(),
            },
            Ok(response) => Self {
                status_ok: true,
                error_message: None,
                body: serde_json::from_str(&response.body).ok(),
            },
        }
    }
}

/// Expected container type of the envelope's `data` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataShape {
    /// A sequence of records; `allow_empty` is set for count-style metrics.
    Records { allow_empty: bool },
    /// A single object (free-text answers).
    Object,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeData {
    Records(Vec<Value>),
    Object(Map<String, Value>),
}

/// `{ success, message, data }` wrapper after the envelope-level checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope {
    pub message: Option<String>,
    pub data: EnvelopeData,
}

pub fn validate(
    metric: &'static str,
    raw: RawResponse,
    shape: DataShape,
    identifier: Option<&str>,
) -> Result<ApiEnvelope, OracleError> {
    if !raw.status_ok || raw.error_message.is_some() {
        let message = raw
            .error_message
            .unwrap_or_else(|| String::from("unknown transport error"));
        if message.to_ascii_lowercase().contains("timeout") {
            return Err(OracleError::Timeout { metric });
        }
        return Err(OracleError::TransportError { metric, message });
    }

    let Some(Value::Object(mut body)) = raw.body else {
        return Err(api_failure(metric, None));
    };

    if !body.get("success").is_some_and(is_truthy) {
        return Err(api_failure(metric, body.get("message")));
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let no_data = || OracleError::NoData {
        metric,
        identifier: identifier.map(str::to_owned),
    };

    let data = match (shape, body.remove("data")) {
        (DataShape::Records { allow_empty }, Some(Value::Array(records))) => {
            if records.is_empty() && !allow_empty {
                return Err(no_data());
            }
            EnvelopeData::Records(records)
        }
        (DataShape::Object, Some(Value::Object(object))) => EnvelopeData::Object(object),
        _ => return Err(no_data()),
    };

    Ok(ApiEnvelope { message, data })
}

fn api_failure(metric: &'static str, message: Option<&Value>) -> OracleError {
    let message = match message {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(value @ (Value::Number(_) | Value::Object(_) | Value::Array(_))) => value.to_string(),
        Some(Value::Bool(true)) => String::from("true"),
        _ => String::from("Unknown error"),
    };
    OracleError::ApiFailure { metric, message }
}

/// Truthiness as the upstream's JavaScript clients see it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
