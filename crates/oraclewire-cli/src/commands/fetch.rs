use std::sync::Arc;
use std::time::Instant;

use oraclewire_core::{
    HttpClient, MetricRequest, OracleConfig, OraclePipeline, ReqwestHttpClient,
};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use crate::cli::FetchArgs;
use crate::error::CliError;
use crate::metadata::{Metadata, RegistryName, RequestId};

use super::describe;

#[derive(Debug, Serialize)]
struct FetchOutput {
    #[serde(flatten)]
    meta: Metadata,
    encoding: &'static str,
    hex: String,
    byte_len: usize,
    decoded: Value,
}

pub async fn run(args: &FetchArgs) -> Result<Value, CliError> {
    let config = build_config(args)?;
    debug!(
        base_url = config.base_url(),
        default_timeout_ms = config.default_timeout_ms(),
        generalized = args.generalized,
        "configuration loaded"
    );
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);
    let (pipeline, registry) = if args.generalized {
        (
            OraclePipeline::generalized(config, client),
            RegistryName::Generalized,
        )
    } else {
        (OraclePipeline::new(config, client), RegistryName::Dedicated)
    };

    let request_id = RequestId::new_v4();
    let request = MetricRequest::new(args.metric.trim(), args.identifiers.iter().cloned());

    let started = Instant::now();
    let result = pipeline
        .run_with_request_id(&request, &request_id.to_string())
        .await?;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let bytes = result.to_bytes();
    let output = FetchOutput {
        meta: Metadata::new(
            request_id,
            request.metric.as_str(),
            registry,
            OffsetDateTime::now_utc(),
            latency_ms,
        )?,
        encoding: result.kind().as_str(),
        hex: result.to_hex(),
        byte_len: bytes.len(),
        decoded: describe(&result),
    };

    Ok(serde_json::to_value(output)?)
}

fn build_config(args: &FetchArgs) -> Result<OracleConfig, CliError> {
    let mut config = OracleConfig::from_env()?;
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.as_str())?;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout_ms(timeout_ms)?;
    }
    if args.no_integration_tag {
        config = config.with_integration_tag(None);
    }
    Ok(config)
}
