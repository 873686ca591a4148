//! # Oraclewire Core
//!
//! Market-data oracle adapters for the Token Metrics API.
//!
//! ## Overview
//!
//! Every metric runs the same five-stage pipeline:
//!
//! - **Request building** from a per-metric template and the caller's identifiers
//! - **Response validation** of the `{ success, message, data }` envelope
//! - **Field extraction** into a typed value
//! - **Normalization** to 18-decimal fixed point, text or a count
//! - **Encoding** into the binary layout consumed on-chain
//!
//! Adapters are descriptors in a [`MetricRegistry`]; adding a metric means
//! adding data, not code paths.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Explicit configuration (credential, base URL, timeouts) |
//! | [`encoding`] | Fixed-point, string and ordered-array encodings plus decoders |
//! | [`error`] | Failure taxonomy |
//! | [`extract`] | Typed field extraction |
//! | [`generalized`] | Generalized multi-metric dispatcher |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metric`] | Metric keys and invocation requests |
//! | [`pipeline`] | End-to-end invocation |
//! | [`registry`] | Metric descriptors and the dedicated catalog |
//! | [`request`] | Outbound request construction |
//! | [`validator`] | Envelope validation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oraclewire_core::{MetricRequest, OracleConfig, OraclePipeline, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OracleConfig::from_env()?;
//!     let pipeline = OraclePipeline::new(config, Arc::new(ReqwestHttpClient::new()?));
//!
//!     let result = pipeline
//!         .run(&MetricRequest::new("price", ["34008,33305"]))
//!         .await?;
//!     println!("{}", result.to_hex());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use oraclewire_core::{ErrorKind, OracleError};
//!
//! fn should_retry(error: &OracleError) -> bool {
//!     matches!(error.kind(), ErrorKind::Timeout | ErrorKind::TransportError)
//! }
//! ```
//!
//! ## Security
//!
//! - The API key lives in [`OracleConfig`] and is redacted from `Debug` output
//! - Request logging records method, URL and query, never headers

pub mod config;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod generalized;
pub mod http_client;
pub mod metric;
pub mod pipeline;
pub mod registry;
pub mod request;
pub mod validator;

pub use ethabi::ethereum_types::U256;

pub use config::{OracleConfig, DEFAULT_BASE_URL, DEFAULT_INTEGRATION_TAG, DEFAULT_TIMEOUT_MS};

pub use encoding::{
    decode_hex, decode_ordered_array, decode_text, decode_uint256, encode_ordered_array,
    encode_text, encode_uint256, from_fixed_point, to_fixed_point, EncodedResult, EncodingKind,
    FIXED_POINT_DECIMALS, TEXT_CAP_BYTES,
};

pub use error::{ConfigError, DecodeError, ErrorKind, OracleError};

pub use extract::{Extracted, Extraction, Hop};

pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use metric::{MetricKey, MetricRequest};

pub use pipeline::OraclePipeline;

pub use registry::{MetricDescriptor, MetricRegistry};

pub use request::{IdentifierPolicy, PreparedRequest, RequestTemplate, RequestedIdentifiers};

pub use validator::{ApiEnvelope, DataShape, RawResponse};
