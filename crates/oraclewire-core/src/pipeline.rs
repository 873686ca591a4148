//! End-to-end invocation: resolve, build, fetch, validate, extract, encode.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::OracleConfig;
use crate::encoding::EncodedResult;
use crate::error::OracleError;
use crate::extract::extract;
use crate::http_client::HttpClient;
use crate::metric::MetricRequest;
use crate::registry::MetricRegistry;
use crate::request::build_request;
use crate::validator::{validate, RawResponse};

/// Stateless between calls; each invocation issues at most one request and
/// never retries.
#[derive(Clone)]
pub struct OraclePipeline {
    config: OracleConfig,
    http_client: Arc<dyn HttpClient>,
    registry: MetricRegistry,
}

impl OraclePipeline {
    /// Pipeline over the dedicated adapters.
    pub fn new(config: OracleConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
            registry: MetricRegistry::dedicated(),
        }
    }

    /// Pipeline over the generalized multi-metric dispatcher.
    pub fn generalized(config: OracleConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(config, http_client).with_registry(MetricRegistry::generalized())
    }

    pub fn with_registry(mut self, registry: MetricRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub async fn run(&self, request: &MetricRequest) -> Result<EncodedResult, OracleError> {
        let request_id = Uuid::new_v4().to_string();
        self.run_with_request_id(request, &request_id).await
    }

    /// Like [`run`](Self::run), tagging logs with a caller-chosen id.
    pub async fn run_with_request_id(
        &self,
        request: &MetricRequest,
        request_id: &str,
    ) -> Result<EncodedResult, OracleError> {
        let span = info_span!(
            "oracle_invocation",
            metric = %request.metric,
            request_id = %request_id
        );

        async {
            match self.invoke(request).await {
                Ok(result) => {
                    info!(
                        encoding = %result.kind(),
                        byte_len = result.to_bytes().len(),
                        "invocation succeeded"
                    );
                    Ok(result)
                }
                Err(error) => {
                    warn!(code = error.code(), error = %error, "invocation failed");
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn invoke(&self, request: &MetricRequest) -> Result<EncodedResult, OracleError> {
        let descriptor = self.registry.resolve(&request.metric)?;
        let metric = descriptor.key;

        let prepared = build_request(metric, &descriptor.request, &request.identifiers, &self.config)?;
        let timeout_ms = prepared.http.timeout_ms;
        debug!(
            method = %prepared.http.method,
            url = %prepared.http.url,
            query = ?prepared.http.query,
            timeout_ms,
            "dispatching request"
        );

        let outcome = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.http_client.execute(prepared.http),
        )
        .await;
        let raw = match outcome {
            Ok(result) => RawResponse::from_transport(result),
            Err(_) => RawResponse::transport_error(format!("request timeout after {timeout_ms} ms")),
        };

        let identifiers = prepared.identifiers;
        let context = (!identifiers.ordered.is_empty()).then(|| identifiers.ordered.join(","));
        let envelope = validate(metric, raw, descriptor.shape, context.as_deref())?;
        let extracted = extract(metric, &descriptor.extraction, envelope, &identifiers)?;
        (descriptor.encode)(metric, extracted)
    }
}
