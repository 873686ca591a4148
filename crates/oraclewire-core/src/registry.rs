//! Metric descriptors and the dispatcher that resolves them.
//!
//! Every adapter is pure data: a [`RequestTemplate`], the expected
//! [`DataShape`], an [`Extraction`] plan and an encoder function. The shared
//! pipeline runs the same stages for all of them.

use std::collections::BTreeMap;

use ethabi::ethereum_types::U256;

use crate::encoding::{
    encode_text, number_to_fixed_point, to_fixed_point, EncodedResult, TEXT_CAP_BYTES,
};
use crate::error::OracleError;
use crate::extract::{Extracted, Extraction, Hop};
use crate::metric::MetricKey;
use crate::request::{IdentifierPolicy, RequestTemplate};
use crate::validator::DataShape;

/// Turns an extracted value into the on-chain result.
pub type EncodeFn = fn(&'static str, Extracted) -> Result<EncodedResult, OracleError>;

#[derive(Debug, Clone, Copy)]
pub struct MetricDescriptor {
    pub key: &'static str,
    pub request: RequestTemplate,
    pub shape: DataShape,
    pub extraction: Extraction,
    pub encode: EncodeFn,
}

impl MetricDescriptor {
    pub const fn new(
        key: &'static str,
        request: RequestTemplate,
        extraction: Extraction,
        encode: EncodeFn,
    ) -> Self {
        Self {
            key,
            request,
            shape: DataShape::Records { allow_empty: false },
            extraction,
            encode,
        }
    }

    pub const fn with_shape(mut self, shape: DataShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Key-to-descriptor table.
#[derive(Debug, Clone, Default)]
pub struct MetricRegistry {
    descriptors: BTreeMap<&'static str, MetricDescriptor>,
}

impl MetricRegistry {
    pub fn new(descriptors: impl IntoIterator<Item = MetricDescriptor>) -> Self {
        Self {
            descriptors: descriptors
                .into_iter()
                .map(|descriptor| (descriptor.key, descriptor))
                .collect(),
        }
    }

    /// One descriptor per dedicated adapter, keyed by [`MetricKey`] name.
    pub fn dedicated() -> Self {
        Self::new(DEDICATED)
    }

    /// The generalized multi-metric dispatcher.
    pub fn generalized() -> Self {
        Self::new(crate::generalized::descriptors())
    }

    pub fn resolve(&self, key: &str) -> Result<&MetricDescriptor, OracleError> {
        let key = key.trim();
        self.descriptors
            .get(key)
            .ok_or_else(|| OracleError::UnknownMetric {
                key: key.to_owned(),
                known: self.keys().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.keys().copied()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

pub fn encode_fixed_point(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    let scaled = match value {
        Extracted::Number(number) => number_to_fixed_point(&number)?,
        Extracted::Text(text) => to_fixed_point(&text)?,
        other => return Err(unexpected(metric, "number", &other)),
    };
    Ok(EncodedResult::FixedPointUint(scaled))
}

pub fn encode_plain_text(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    text_result(metric, value, None)
}

/// Free-text answers are cut to [`TEXT_CAP_BYTES`].
pub fn encode_capped_text(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    text_result(metric, value, Some(TEXT_CAP_BYTES))
}

/// Unscaled cardinality.
pub fn encode_count(metric: &'static str, value: Extracted) -> Result<EncodedResult, OracleError> {
    match value {
        Extracted::Count(count) => Ok(EncodedResult::FixedPointUint(U256::from(count as u64))),
        other => Err(unexpected(metric, "count", &other)),
    }
}

pub fn encode_fixed_point_array(
    metric: &'static str,
    value: Extracted,
) -> Result<EncodedResult, OracleError> {
    match value {
        Extracted::Series(numbers) => numbers
            .iter()
            .map(number_to_fixed_point)
            .collect::<Result<Vec<_>, _>>()
            .map(EncodedResult::OrderedArray),
        other => Err(unexpected(metric, "series", &other)),
    }
}

fn text_result(
    metric: &'static str,
    value: Extracted,
    cap: Option<usize>,
) -> Result<EncodedResult, OracleError> {
    let text = match value {
        Extracted::Text(text) => text,
        Extracted::Number(number) => number.to_string(),
        other => return Err(unexpected(metric, "text", &other)),
    };
    encode_text(&text, cap).map(EncodedResult::EncodedString)
}

pub(crate) fn unexpected(metric: &'static str, wanted: &str, got: &Extracted) -> OracleError {
    OracleError::invalid_shape(
        metric,
        format!("expected a {wanted} value, got a {}", got.type_name()),
    )
}

const TOKEN_ID: IdentifierPolicy = IdentifierPolicy::Single { param: "token_id" };
const INDEX_ID: IdentifierPolicy = IdentifierPolicy::Single { param: "id" };
const NO_ID: IdentifierPolicy = IdentifierPolicy::None;

const DEDICATED: [MetricDescriptor; 21] = [
    MetricDescriptor::new(
        MetricKey::Price.as_str(),
        RequestTemplate::get("/price", IdentifierPolicy::Batch { param: "token_id" }),
        Extraction::Batch {
            key: "TOKEN_ID",
            value: "CURRENT_PRICE",
        },
        encode_fixed_point_array,
    ),
    MetricDescriptor::new(
        MetricKey::Tokens.as_str(),
        RequestTemplate::get(
            "/tokens",
            IdentifierPolicy::Optional {
                params: &["token_id", "token_name", "symbol"],
            },
        )
        .paged(),
        Extraction::ByPrimary {
            with_primary: &[Hop::Field("TOKEN_SYMBOL")],
            without_primary: &[Hop::Field("TOKEN_ID")],
        },
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::TraderGrades.as_str(),
        RequestTemplate::get("/trader-grades", TOKEN_ID).paged(),
        Extraction::Number(&[Hop::Field("TM_TRADER_GRADE")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::InvestorGrades.as_str(),
        RequestTemplate::get("/investor-grades", TOKEN_ID).paged().tagged(),
        Extraction::Number(&[Hop::Field("TM_INVESTOR_GRADE")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::HourlyOhlcv.as_str(),
        RequestTemplate::get("/hourly-ohlcv", TOKEN_ID)
            .paged()
            .tagged()
            .timeout_ms(10_000),
        Extraction::Number(&[Hop::Field("OPEN")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::DailyOhlcv.as_str(),
        RequestTemplate::get("/daily-ohlcv", TOKEN_ID)
            .paged()
            .timeout_ms(10_000),
        Extraction::Number(&[Hop::Field("OPEN")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::MarketMetrics.as_str(),
        RequestTemplate::get("/market-metrics", NO_ID)
            .paged()
            .timeout_ms(10_000),
        Extraction::Number(&[Hop::Field("TOTAL_CRYPTO_MCAP")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::TradingSignals.as_str(),
        RequestTemplate::get("/trading-signals", TOKEN_ID).paged().tagged(),
        Extraction::Text(&[Hop::Field("TRADING_SIGNAL")]),
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::HourlyTradingSignals.as_str(),
        RequestTemplate::get("/hourly-trading-signals", TOKEN_ID).timeout_ms(10_000),
        Extraction::Text(&[Hop::Field("SIGNAL")]),
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::AiReports.as_str(),
        RequestTemplate::get("/ai-reports", TOKEN_ID)
            .paged()
            .timeout_ms(10_000),
        Extraction::Text(&[Hop::Field("INVESTMENT_ANALYSIS")]),
        encode_capped_text,
    ),
    MetricDescriptor::new(
        MetricKey::CryptoInvestors.as_str(),
        RequestTemplate::get("/crypto-investors", NO_ID)
            .paged()
            .tagged()
            .timeout_ms(10_000),
        Extraction::Text(&[Hop::Field("INVESTOR_NAME")]),
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::TopMarketCapTokens.as_str(),
        RequestTemplate::get("/top-tokens-by-market-cap", NO_ID)
            .paged()
            .tagged()
            .timeout_ms(10_000),
        Extraction::Text(&[Hop::Field("TOKEN_ID")]),
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::ResistanceSupport.as_str(),
        RequestTemplate::get("/resistance-support", TOKEN_ID)
            .paged()
            .timeout_ms(10_000),
        Extraction::Number(&[
            Hop::Field("HISTORICAL_RESISTANCE_SUPPORT_LEVELS"),
            Hop::First,
            Hop::Field("level"),
        ]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::Sentiments.as_str(),
        RequestTemplate::get("/sentiments", NO_ID)
            .tagged()
            .timeout_ms(10_000),
        Extraction::Number(&[Hop::Field("MARKET_SENTIMENT_GRADE")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::Quantmetrics.as_str(),
        RequestTemplate::get("/quantmetrics", TOKEN_ID)
            .paged()
            .tagged()
            .timeout_ms(10_000),
        Extraction::Number(&[Hop::Field("VOLATILITY")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::ScenarioAnalysis.as_str(),
        RequestTemplate::get("/scenario-analysis", TOKEN_ID)
            .tagged()
            .timeout_ms(10_000),
        Extraction::Number(&[
            Hop::Field("SCENARIO_PREDICTION"),
            Hop::Field("scenario_prediction"),
            Hop::First,
            Hop::Field("predicted_price_moon"),
        ]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::Correlation.as_str(),
        RequestTemplate::get("/correlation", TOKEN_ID)
            .tagged()
            .timeout_ms(10_000),
        Extraction::Text(&[Hop::Field("TOP_CORRELATION"), Hop::First, Hop::Field("token")]),
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::Indices.as_str(),
        RequestTemplate::get("/indices", NO_ID)
            .paged()
            .tagged()
            .timeout_ms(10_000),
        Extraction::Text(&[Hop::Field("TICKER")]),
        encode_plain_text,
    ),
    MetricDescriptor::new(
        MetricKey::IndicesHoldings.as_str(),
        RequestTemplate::get("/indices-holdings", INDEX_ID).timeout_ms(10_000),
        Extraction::Count,
        encode_count,
    )
    .with_shape(DataShape::Records { allow_empty: true }),
    MetricDescriptor::new(
        MetricKey::IndicesPerformance.as_str(),
        RequestTemplate::get("/indices-performance", INDEX_ID)
            .tagged()
            .timeout_ms(15_000),
        Extraction::Number(&[Hop::Field("INDEX_CUMULATIVE_ROI")]),
        encode_fixed_point,
    ),
    MetricDescriptor::new(
        MetricKey::Tmai.as_str(),
        RequestTemplate::get("/tmai", IdentifierPolicy::Prompt)
            .post()
            .tagged()
            .timeout_ms(20_000),
        Extraction::Answer("answer"),
        encode_capped_text,
    )
    .with_shape(DataShape::Object),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::http_client::HttpMethod;
    use serde_json::Number;

    #[test]
    fn every_dedicated_key_resolves() {
        let registry = MetricRegistry::dedicated();
        assert_eq!(registry.len(), MetricKey::ALL.len());
        for key in MetricKey::ALL {
            let descriptor = registry.resolve(key.as_str()).expect("registered");
            assert_eq!(descriptor.key, key.as_str());
        }
    }

    #[test]
    fn unknown_key_lists_registered_keys() {
        let error = MetricRegistry::dedicated()
            .resolve("volume")
            .expect_err("unknown");
        assert_eq!(error.kind(), ErrorKind::UnknownMetric);
        assert!(error.to_string().contains("trader-grades"));
    }

    #[test]
    fn holdings_accept_empty_data_and_tmai_expects_object() {
        let registry = MetricRegistry::dedicated();
        let holdings = registry.resolve("indices-holdings").expect("registered");
        assert_eq!(holdings.shape, DataShape::Records { allow_empty: true });

        let tmai = registry.resolve("tmai").expect("registered");
        assert_eq!(tmai.shape, DataShape::Object);
        assert_eq!(tmai.request.method, HttpMethod::Post);
        assert_eq!(tmai.request.timeout_ms, Some(20_000));
    }

    #[test]
    fn per_metric_timeouts_override_default() {
        let registry = MetricRegistry::dedicated();
        let timeout = |key: &str| registry.resolve(key).expect("registered").request.timeout_ms;
        assert_eq!(timeout("indices-performance"), Some(15_000));
        assert_eq!(timeout("hourly-ohlcv"), Some(10_000));
        assert_eq!(timeout("price"), None);
    }

    #[test]
    fn count_is_not_scaled() {
        let encoded = encode_count("indices-holdings", Extracted::Count(3)).expect("encodes");
        assert_eq!(encoded, EncodedResult::FixedPointUint(U256::from(3_u64)));
    }

    #[test]
    fn fixed_point_encoder_scales_by_ten_to_eighteen() {
        let number = Number::from_f64(12.5).expect("finite");
        let encoded = encode_fixed_point("trader-grades", Extracted::Number(number)).expect("encodes");
        assert_eq!(
            encoded,
            EncodedResult::FixedPointUint(
                U256::from_dec_str("12500000000000000000").expect("decimal")
            )
        );
    }

    #[test]
    fn numeric_signal_is_rendered_as_text() {
        let encoded =
            encode_plain_text("trading-signals", Extracted::Number(Number::from(1))).expect("encodes");
        assert_eq!(encoded, EncodedResult::EncodedString(b"1".to_vec()));
    }

    #[test]
    fn encoder_rejects_wrong_extracted_type() {
        let error = encode_count("indices-holdings", Extracted::Text(String::from("3")))
            .expect_err("must fail");
        assert_eq!(error.kind(), ErrorKind::InvalidShape);
    }
}
