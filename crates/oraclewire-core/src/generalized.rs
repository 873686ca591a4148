//! Generalized multi-metric dispatcher.
//!
//! One adapter serving twenty metric types by SCREAMING_CASE key. Every
//! request is a GET with an optional `token_id`, no paging, and the config
//! default timeout. Values are shaped per metric with exact decimal
//! arithmetic before landing in a single `uint256` word or a string:
//!
//! | Keys | Candidate fields | Shaping |
//! |------|------------------|---------|
//! | `PRICE` | `CURRENT_PRICE` | floor(x × 100) |
//! | `TRADING_SIGNALS`, `HOURLY_TRADING_SIGNALS` | `signal`, `recommendation`, `score` | text as-is, else floor(x × 100) |
//! | `TRADER_GRADES`, `INVESTOR_GRADES` | `grade`, `score`, `rating` | floor(x × 100) |
//! | `SENTIMENT` | `sentiment_score`, `score` | floor((x + 1) × 50) |
//! | `TOKENS` | none | record count |
//! | everything else | `value`, `price`, `score`, `rating` | text as-is, number floor(x × 100), else the record as JSON |
//!
//! These scales differ from the dedicated adapters' ×10^18 and the two
//! encodings are not interchangeable.

use std::str::FromStr;

use ethabi::ethereum_types::U256;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::encoding::{encode_text, EncodedResult, PlainDecimal};
use crate::error::OracleError;
use crate::extract::{Extracted, Extraction};
use crate::registry::{encode_count, unexpected, MetricDescriptor};
use crate::request::{IdentifierPolicy, RequestTemplate};

const OPTIONAL_TOKEN: IdentifierPolicy = IdentifierPolicy::Optional {
    params: &["token_id"],
};

const SIGNAL_FIELDS: &[&str] = &["signal", "recommendation", "score"];
const GRADE_FIELDS: &[&str] = &["grade", "score", "rating"];
const SENTIMENT_FIELDS: &[&str] = &["sentiment_score", "score"];
const DEFAULT_FIELDS: &[&str] = &["value", "price", "score", "rating"];

const fn shaped(
    key: &'static str,
    path: &'static str,
    fields: &'static [&'static str],
    encode: crate::registry::EncodeFn,
) -> MetricDescriptor {
    MetricDescriptor::new(
        key,
        RequestTemplate::get(path, OPTIONAL_TOKEN),
        Extraction::FirstOf(fields),
        encode,
    )
}

const GENERALIZED: [MetricDescriptor; 20] = [
    MetricDescriptor::new(
        "TOKENS",
        RequestTemplate::get("/tokens", OPTIONAL_TOKEN),
        Extraction::Count,
        encode_count,
    ),
    shaped("TRADER_GRADES", "/trader-grades", GRADE_FIELDS, encode_percent),
    shaped("HOURLY_OHLCV", "/hourly-ohlcv", DEFAULT_FIELDS, encode_default),
    shaped("DAILY_OHLCV", "/daily-ohlcv", DEFAULT_FIELDS, encode_default),
    shaped("INVESTOR_GRADES", "/investor-grades", GRADE_FIELDS, encode_percent),
    shaped("MARKET_METRICS", "/market-metrics", DEFAULT_FIELDS, encode_default),
    shaped("TRADING_SIGNALS", "/trading-signals", SIGNAL_FIELDS, encode_signal),
    shaped("AI_REPORTS", "/ai-reports", DEFAULT_FIELDS, encode_default),
    shaped("CRYPTO_INVESTORS", "/crypto-investors", DEFAULT_FIELDS, encode_default),
    shaped("TOP_TOKENS", "/top-tokens-by-market-cap", DEFAULT_FIELDS, encode_default),
    shaped("RESISTANCE_SUPPORT", "/resistance-support", DEFAULT_FIELDS, encode_default),
    shaped(
        "HOURLY_TRADING_SIGNALS",
        "/hourly-trading-signals",
        SIGNAL_FIELDS,
        encode_signal,
    ),
    shaped("PRICE", "/price", &["CURRENT_PRICE"], encode_percent),
    shaped("SENTIMENT", "/sentiment", SENTIMENT_FIELDS, encode_sentiment),
    shaped("QUANTMETRICS", "/quantmetrics", DEFAULT_FIELDS, encode_default),
    shaped("SCENARIO_ANALYSIS", "/scenario-analysis", DEFAULT_FIELDS, encode_default),
    shaped("CORRELATION", "/correlation", DEFAULT_FIELDS, encode_default),
    shaped("INDICES", "/indices", DEFAULT_FIELDS, encode_default),
    shaped("INDICES_HOLDINGS", "/indices-holdings", DEFAULT_FIELDS, encode_default),
    shaped(
        "INDICES_PERFORMANCE",
        "/indices-performance",
        DEFAULT_FIELDS,
        encode_default,
    ),
];

pub fn descriptors() -> [MetricDescriptor; 20] {
    GENERALIZED
}

/// floor(x × 100)
fn encode_percent(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    let decimal = to_decimal(metric, &value)?;
    let scaled = decimal
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| overflow(&decimal))?;
    floor_to_uint(scaled).map(EncodedResult::FixedPointUint)
}

/// floor((x + 1) × 50), mapping a [-1, 1] score onto [0, 100].
fn encode_sentiment(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    let decimal = to_decimal(metric, &value)?;
    let scaled = decimal
        .checked_add(Decimal::ONE)
        .and_then(|shifted| shifted.checked_mul(Decimal::from(50)))
        .ok_or_else(|| overflow(&decimal))?;
    floor_to_uint(scaled).map(EncodedResult::FixedPointUint)
}

fn encode_signal(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    match value {
        Extracted::Text(text) => encode_text(&text, None).map(EncodedResult::EncodedString),
        other => encode_percent(metric, other),
    }
}

fn encode_default(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    match value {
        Extracted::Text(text) => encode_text(&text, None).map(EncodedResult::EncodedString),
        Extracted::Record(record) => {
            encode_text(&Value::Object(record).to_string(), None).map(EncodedResult::EncodedString)
        }
        other => encode_percent(metric, other),
    }
}

fn to_decimal(metric: &'static str, value: &Extracted) -> Result<Decimal, OracleError> {
    let plain = match value {
        Extracted::Number(number) => PlainDecimal::parse(&number.to_string())?,
        Extracted::Text(text) => PlainDecimal::parse(text)?,
        other => return Err(unexpected(metric, "number", other)),
    };
    let rendered = plain.to_plain_string();
    Decimal::from_str(&rendered).map_err(|_| OracleError::OutOfRange {
        value: rendered,
        reason: "exceeds decimal precision",
    })
}

fn floor_to_uint(value: Decimal) -> Result<U256, OracleError> {
    let floored = value.floor();
    if floored.is_sign_negative() && !floored.is_zero() {
        return Err(OracleError::OutOfRange {
            value: value.to_string(),
            reason: "negative values cannot be encoded as uint256",
        });
    }
    U256::from_dec_str(&floored.abs().trunc().to_string()).map_err(|_| OracleError::OutOfRange {
        value: value.to_string(),
        reason: "exceeds uint256",
    })
}

fn overflow(value: &Decimal) -> OracleError {
    OracleError::OutOfRange {
        value: value.to_string(),
        reason: "exceeds decimal precision",
    }
}
