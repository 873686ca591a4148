use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::OracleError;

/// Dedicated adapters, one per upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKey {
    Price,
    Tokens,
    TraderGrades,
    InvestorGrades,
    HourlyOhlcv,
    DailyOhlcv,
    MarketMetrics,
    TradingSignals,
    HourlyTradingSignals,
    AiReports,
    CryptoInvestors,
    TopMarketCapTokens,
    ResistanceSupport,
    Sentiments,
    Quantmetrics,
    ScenarioAnalysis,
    Correlation,
    Indices,
    IndicesHoldings,
    IndicesPerformance,
    Tmai,
}

impl MetricKey {
    pub const ALL: [Self; 21] = [
        Self::Price,
        Self::Tokens,
        Self::TraderGrades,
        Self::InvestorGrades,
        Self::HourlyOhlcv,
        Self::DailyOhlcv,
        Self::MarketMetrics,
        Self::TradingSignals,
        Self::HourlyTradingSignals,
        Self::AiReports,
        Self::CryptoInvestors,
        Self::TopMarketCapTokens,
        Self::ResistanceSupport,
        Self::Sentiments,
        Self::Quantmetrics,
        Self::ScenarioAnalysis,
        Self::Correlation,
        Self::Indices,
        Self::IndicesHoldings,
        Self::IndicesPerformance,
        Self::Tmai,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Tokens => "tokens",
            Self::TraderGrades => "trader-grades",
            Self::InvestorGrades => "investor-grades",
            Self::HourlyOhlcv => "hourly-ohlcv",
            Self::DailyOhlcv => "daily-ohlcv",
            Self::MarketMetrics => "market-metrics",
            Self::TradingSignals => "trading-signals",
            Self::HourlyTradingSignals => "hourly-trading-signals",
            Self::AiReports => "ai-reports",
            Self::CryptoInvestors => "crypto-investors",
            Self::TopMarketCapTokens => "top-market-cap-tokens",
            Self::ResistanceSupport => "resistance-support",
            Self::Sentiments => "sentiments",
            Self::Quantmetrics => "quantmetrics",
            Self::ScenarioAnalysis => "scenario-analysis",
            Self::Correlation => "correlation",
            Self::Indices => "indices",
            Self::IndicesHoldings => "indices-holdings",
            Self::IndicesPerformance => "indices-performance",
            Self::Tmai => "tmai",
        }
    }
}

impl Display for MetricKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = OracleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OracleError::UnknownMetric {
                key: wanted.to_owned(),
                known: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

/// One invocation: a metric key and its positional identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRequest {
    pub metric: String,
    pub identifiers: Vec<String>,
}

impl MetricRequest {
    pub fn new<I, S>(metric: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metric: metric.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn for_metric<I, S>(key: MetricKey, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key.as_str(), identifiers)
    }
}
