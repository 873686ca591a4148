//! Contract tests for every dedicated metric.
//!
//! Each test feeds a canned upstream envelope through the full pipeline and
//! checks both the outbound request shape and the encoded result.

#[path = "../support/mod.rs"]
mod support;

use oraclewire_core::{EncodedResult, HttpMethod, HttpRequest, MetricRequest, OracleError};
use serde_json::{json, Value};

use support::{dedicated, records, wei, ScriptedHttpClient};

async fn fetch(
    metric: &str,
    identifiers: &[&str],
    body: Value,
) -> (Result<EncodedResult, OracleError>, HttpRequest) {
    let client = ScriptedHttpClient::replying(body);
    let result = dedicated(&client)
        .run(&MetricRequest::new(metric, identifiers.iter().copied()))
        .await;
    (result, client.only_request())
}

fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request.headers.get(name).map(String::as_str)
}

fn text(value: &str) -> EncodedResult {
    EncodedResult::EncodedString(value.as_bytes().to_vec())
}

fn fixed(decimal: &str) -> EncodedResult {
    EncodedResult::FixedPointUint(wei(decimal))
}

// =============================================================================
// Batch price
// =============================================================================

#[tokio::test]
async fn price_batch_follows_request_order_not_response_order() {
    // Given: upstream answers in a different order than requested
    let body = records(json!([
        {"TOKEN_ID": 33305, "CURRENT_PRICE": 0.25},
        {"TOKEN_ID": 34008, "CURRENT_PRICE": 1.0001}
    ]));

    // When
    let (result, request) = fetch("price", &["34008,33305"], body).await;

    // Then
    assert_eq!(
        result.expect("encodes"),
        EncodedResult::OrderedArray(vec![
            wei("1000100000000000000"),
            wei("250000000000000000"),
        ])
    );
    assert_eq!(
        request.url_with_query(),
        "https://api.tokenmetrics.com/v2/price?token_id=34008%2C33305"
    );
    assert_eq!(request.timeout_ms, 10_000);
    assert_eq!(header(&request, "x-integration"), None);
}

#[tokio::test]
async fn price_encoding_has_length_prefix_and_one_word_per_value() {
    let body = records(json!([
        {"TOKEN_ID": 34008, "CURRENT_PRICE": 1.0001},
        {"TOKEN_ID": 33305, "CURRENT_PRICE": 0.25}
    ]));

    let (result, _) = fetch("price", &["34008, 33305"], body).await;
    let bytes = result.expect("encodes").to_bytes();

    assert_eq!(bytes.len(), 96);
    assert_eq!(bytes[31], 2);
    assert!(bytes[..31].iter().all(|byte| *byte == 0));
}

// =============================================================================
// Token lookup
// =============================================================================

#[tokio::test]
async fn tokens_by_id_returns_symbol() {
    let body = records(json!([{"TOKEN_ID": 3375, "TOKEN_SYMBOL": "BTC", "TOKEN_NAME": "Bitcoin"}]));

    let (result, request) = fetch("tokens", &["3375"], body).await;

    assert_eq!(result.expect("encodes"), text("BTC"));
    assert_eq!(
        request.query,
        vec![
            (String::from("token_id"), String::from("3375")),
            (String::from("limit"), String::from("1")),
            (String::from("page"), String::from("1")),
        ]
    );
}

#[tokio::test]
async fn tokens_by_symbol_returns_numeric_id_as_text() {
    let body = records(json!([{"TOKEN_ID": 3375, "TOKEN_SYMBOL": "BTC"}]));

    let (result, request) = fetch("tokens", &["", "", "BTC"], body).await;

    assert_eq!(result.expect("encodes"), text("3375"));
    assert_eq!(request.query_value("symbol"), Some("BTC"));
    assert_eq!(request.query_value("token_id"), None);
    assert_eq!(request.query_value("token_name"), None);
}

// =============================================================================
// Single fixed-point values
// =============================================================================

#[tokio::test]
async fn trader_grade_is_scaled_to_eighteen_decimals() {
    let (result, request) =
        fetch("trader-grades", &["3375"], records(json!([{"TM_TRADER_GRADE": 12.5}]))).await;

    assert_eq!(result.expect("encodes"), fixed("12500000000000000000"));
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(header(&request, "x-api-key"), Some("test-key"));
    assert_eq!(header(&request, "accept"), Some("application/json"));
    assert_eq!(header(&request, "x-integration"), None);
}

#[tokio::test]
async fn investor_grade_sends_integration_tag() {
    let (result, request) = fetch(
        "investor-grades",
        &["3375"],
        records(json!([{"TM_INVESTOR_GRADE": 63.2}])),
    )
    .await;

    assert_eq!(result.expect("encodes"), fixed("63200000000000000000"));
    assert_eq!(header(&request, "x-integration"), Some("chainlink"));
}

#[tokio::test]
async fn ohlcv_metrics_read_open_price() {
    let (hourly, request) =
        fetch("hourly-ohlcv", &["3375"], records(json!([{"OPEN": 67250.12, "CLOSE": 1.0}]))).await;
    assert_eq!(hourly.expect("encodes"), fixed("67250120000000000000000"));
    assert!(request.url.ends_with("/hourly-ohlcv"));

    let (daily, request) = fetch("daily-ohlcv", &["3375"], records(json!([{"OPEN": 3100.5}]))).await;
    assert_eq!(daily.expect("encodes"), fixed("3100500000000000000000"));
    assert_eq!(header(&request, "x-integration"), None);
}

#[tokio::test]
async fn market_metrics_take_no_identifier() {
    let (result, request) = fetch(
        "market-metrics",
        &[],
        records(json!([{"TOTAL_CRYPTO_MCAP": 2450000000000_u64}])),
    )
    .await;

    assert_eq!(
        result.expect("encodes"),
        fixed("2450000000000000000000000000000")
    );
    assert_eq!(
        request.url_with_query(),
        "https://api.tokenmetrics.com/v2/market-metrics?limit=1&page=1"
    );
}

#[tokio::test]
async fn resistance_support_reads_first_level() {
    let body = records(json!([{
        "HISTORICAL_RESISTANCE_SUPPORT_LEVELS": [{"level": 61000.5}, {"level": 58000}]
    }]));

    let (result, _) = fetch("resistance-support", &["3375"], body).await;

    assert_eq!(result.expect("encodes"), fixed("61000500000000000000000"));
}

#[tokio::test]
async fn sentiment_grade_is_unscoped() {
    let (result, request) =
        fetch("sentiments", &[], records(json!([{"MARKET_SENTIMENT_GRADE": 72}]))).await;

    assert_eq!(result.expect("encodes"), fixed("72000000000000000000"));
    assert!(request.query.is_empty());
    assert_eq!(header(&request, "x-integration"), Some("chainlink"));
}

#[tokio::test]
async fn quantmetrics_reads_volatility() {
    let (result, _) =
        fetch("quantmetrics", &["3375"], records(json!([{"VOLATILITY": 0.45}]))).await;

    assert_eq!(result.expect("encodes"), fixed("450000000000000000"));
}

#[tokio::test]
async fn scenario_analysis_reads_first_moon_prediction() {
    let body = records(json!([{
        "SCENARIO_PREDICTION": {
            "scenario_prediction": [{"predicted_price_moon": 250000.5, "predicted_price_bear": 1}]
        }
    }]));

    let (result, request) = fetch("scenario-analysis", &["3375"], body).await;

    assert_eq!(result.expect("encodes"), fixed("250000500000000000000000"));
    assert_eq!(request.query_value("limit"), None);
}

#[tokio::test]
async fn index_performance_accepts_zero_return() {
    let (result, request) =
        fetch("indices-performance", &["7"], records(json!([{"INDEX_CUMULATIVE_ROI": 0}]))).await;

    assert_eq!(result.expect("encodes"), fixed("0"));
    assert_eq!(request.query_value("id"), Some("7"));
    assert_eq!(request.timeout_ms, 15_000);
}

// =============================================================================
// Text values
// =============================================================================

#[tokio::test]
async fn numeric_trading_signal_is_rendered_as_text() {
    let (result, _) =
        fetch("trading-signals", &["3375"], records(json!([{"TRADING_SIGNAL": -1}]))).await;

    assert_eq!(result.expect("encodes"), text("-1"));
}

#[tokio::test]
async fn hourly_trading_signal_is_passed_through() {
    let (result, request) =
        fetch("hourly-trading-signals", &["3375"], records(json!([{"SIGNAL": "BUY"}]))).await;

    assert_eq!(result.expect("encodes"), text("BUY"));
    assert_eq!(request.query_value("page"), None);
}

#[tokio::test]
async fn ai_report_is_capped_at_256_bytes() {
    let report = "Bitcoin shows strong momentum. ".repeat(20);
    let (result, _) = fetch(
        "ai-reports",
        &["3375"],
        records(json!([{"INVESTMENT_ANALYSIS": report}])),
    )
    .await;

    let EncodedResult::EncodedString(bytes) = result.expect("encodes") else {
        panic!("expected string encoding");
    };
    assert_eq!(bytes.len(), 256);
    assert_eq!(bytes.as_slice(), &report.as_bytes()[..256]);
}

#[tokio::test]
async fn listings_return_first_record_text() {
    let (investors, _) =
        fetch("crypto-investors", &[], records(json!([{"INVESTOR_NAME": "a16z"}]))).await;
    assert_eq!(investors.expect("encodes"), text("a16z"));

    let (top, request) =
        fetch("top-market-cap-tokens", &[], records(json!([{"TOKEN_ID": 3375}]))).await;
    assert_eq!(top.expect("encodes"), text("3375"));
    assert!(request.url.ends_with("/top-tokens-by-market-cap"));

    let (indices, _) = fetch("indices", &[], records(json!([{"TICKER": "TMAI10"}]))).await;
    assert_eq!(indices.expect("encodes"), text("TMAI10"));
}

#[tokio::test]
async fn correlation_returns_top_correlated_token() {
    let body = records(json!([{"TOP_CORRELATION": [{"token": "ETH", "correlation": 0.91}]}]));

    let (result, _) = fetch("correlation", &["3375"], body).await;

    assert_eq!(result.expect("encodes"), text("ETH"));
}

// =============================================================================
// Counts
// =============================================================================

#[tokio::test]
async fn index_holdings_are_counted_unscaled() {
    let body = records(json!([{"TOKEN_ID": 1}, {"TOKEN_ID": 2}, {"TOKEN_ID": 3}]));

    let (result, request) = fetch("indices-holdings", &["7"], body).await;

    assert_eq!(result.expect("encodes"), EncodedResult::FixedPointUint(wei("3")));
    assert_eq!(request.query_value("id"), Some("7"));
}

#[tokio::test]
async fn index_with_no_holdings_counts_zero() {
    let (result, _) = fetch("indices-holdings", &["7"], records(json!([]))).await;

    assert_eq!(result.expect("encodes"), EncodedResult::FixedPointUint(wei("0")));
}

// =============================================================================
// Free-text answers
// =============================================================================

#[tokio::test]
async fn tmai_posts_prompt_and_returns_answer() {
    let body = json!({"success": true, "message": "ok", "data": {"answer": "BTC looks bullish."}});

    let (result, request) = fetch("tmai", &["What about BTC?"], body).await;

    assert_eq!(result.expect("encodes"), text("BTC looks bullish."));
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.timeout_ms, 20_000);
    assert_eq!(header(&request, "content-type"), Some("application/json"));
    let sent: Value = serde_json::from_str(request.body.as_deref().expect("body")).expect("json");
    assert_eq!(sent, json!({"messages": [{"user": "What about BTC?"}]}));
}
