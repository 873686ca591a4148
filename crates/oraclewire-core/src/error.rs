use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Failure classification for a single oracle invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingIdentifier,
    MultiValueNotAllowed,
    TransportError,
    Timeout,
    ApiFailure,
    NoData,
    InvalidShape,
    ValueNotFound,
    NonNumeric,
    OutOfRange,
    EmptyText,
    UnknownMetric,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingIdentifier => "missing_identifier",
            Self::MultiValueNotAllowed => "multi_value_not_allowed",
            Self::TransportError => "transport_error",
            Self::Timeout => "timeout",
            Self::ApiFailure => "api_failure",
            Self::NoData => "no_data",
            Self::InvalidShape => "invalid_shape",
            Self::ValueNotFound => "value_not_found",
            Self::NonNumeric => "non_numeric",
            Self::OutOfRange => "out_of_range",
            Self::EmptyText => "empty_text",
            Self::UnknownMetric => "unknown_metric",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way an invocation can fail. Raised once, at the first point of
/// detection, and returned to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("{metric}: {param} is required")]
    MissingIdentifier {
        metric: &'static str,
        param: &'static str,
    },

    #[error("{metric}: {param} must be a single value, not a comma-separated list: '{value}'")]
    MultiValueNotAllowed {
        metric: &'static str,
        param: &'static str,
        value: String,
    },

    #[error("{metric}: upstream request failed: {message}")]
    TransportError {
        metric: &'static str,
        message: String,
    },

    #[error("{metric}: request timed out, please try again")]
    Timeout { metric: &'static str },

    #[error("{metric}: API request failed: {message}")]
    ApiFailure {
        metric: &'static str,
        message: String,
    },

    #[error("{metric}: no data received{}", identifier_suffix(.identifier))]
    NoData {
        metric: &'static str,
        identifier: Option<String>,
    },

    #[error("{metric}: invalid response shape: {detail}")]
    InvalidShape {
        metric: &'static str,
        detail: String,
    },

    #[error("no value found for identifier '{identifier}'")]
    ValueNotFound { identifier: String },

    #[error("value '{value}' is not a finite number")]
    NonNumeric { value: String },

    #[error("value '{value}' is out of range: {reason}")]
    OutOfRange { value: String, reason: &'static str },

    #[error("text value is empty")]
    EmptyText,

    #[error("unknown metric '{key}', available metrics: {known}")]
    UnknownMetric { key: String, known: String },
}

fn identifier_suffix(identifier: &Option<String>) -> String {
    match identifier {
        Some(value) => format!(" for '{value}'"),
        None => String::new(),
    }
}

impl OracleError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingIdentifier { .. } => ErrorKind::MissingIdentifier,
            Self::MultiValueNotAllowed { .. } => ErrorKind::MultiValueNotAllowed,
            Self::TransportError { .. } => ErrorKind::TransportError,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::ApiFailure { .. } => ErrorKind::ApiFailure,
            Self::NoData { .. } => ErrorKind::NoData,
            Self::InvalidShape { .. } => ErrorKind::InvalidShape,
            Self::ValueNotFound { .. } => ErrorKind::ValueNotFound,
            Self::NonNumeric { .. } => ErrorKind::NonNumeric,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::EmptyText => ErrorKind::EmptyText,
            Self::UnknownMetric { .. } => ErrorKind::UnknownMetric,
        }
    }

    /// Stable machine-readable code, e.g. `oracle.timeout`.
    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MissingIdentifier => "oracle.missing_identifier",
            ErrorKind::MultiValueNotAllowed => "oracle.multi_value_not_allowed",
            ErrorKind::TransportError => "oracle.transport_error",
            ErrorKind::Timeout => "oracle.timeout",
            ErrorKind::ApiFailure => "oracle.api_failure",
            ErrorKind::NoData => "oracle.no_data",
            ErrorKind::InvalidShape => "oracle.invalid_shape",
            ErrorKind::ValueNotFound => "oracle.value_not_found",
            ErrorKind::NonNumeric => "oracle.non_numeric",
            ErrorKind::OutOfRange => "oracle.out_of_range",
            ErrorKind::EmptyText => "oracle.empty_text",
            ErrorKind::UnknownMetric => "oracle.unknown_metric",
        }
    }

    /// Whether the caller may reasonably try the same request again.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Timeout | ErrorKind::TransportError
        )
    }

    pub(crate) fn invalid_shape(metric: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidShape {
            metric,
            detail: detail.into(),
        }
    }
}

/// Errors raised while assembling an [`OracleConfig`](crate::OracleConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key is required (set ORACLEWIRE_API_KEY or TOKEN_METRICS_API_KEY)")]
    MissingApiKey,
    #[error("base URL must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("timeout must be a positive number of milliseconds: '{value}'")]
    InvalidTimeout { value: String },
}

/// Errors raised while decoding a binary result back into values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid hex input: {0}")]
    InvalidHex(String),
    #[error("expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("length prefix {declared} does not fit the payload of {payload_words} words")]
    LengthMismatch { declared: String, payload_words: usize },
    #[error("abi decode failed: {0}")]
    Abi(String),
}
