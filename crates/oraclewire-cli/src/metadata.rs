use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Request identifier (UUID v4), also attached to the invocation's log span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Which registry resolved the metric key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryName {
    Dedicated,
    Generalized,
}

/// Per-invocation metadata printed alongside the encoded result.
///
/// Field order is fixed to keep deterministic JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub request_id: RequestId,
    pub metric: String,
    pub registry: RegistryName,
    pub fetched_at: String,
    pub latency_ms: u64,
}

impl Metadata {
    pub fn new(
        request_id: RequestId,
        metric: impl Into<String>,
        registry: RegistryName,
        fetched_at: OffsetDateTime,
        latency_ms: u64,
    ) -> Result<Self, time::error::Format> {
        Ok(Self {
            request_id,
            metric: metric.into(),
            registry,
            fetched_at: fetched_at.format(&Rfc3339)?,
            latency_ms,
        })
    }
}
