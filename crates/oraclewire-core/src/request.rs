//! Outbound request construction.
//!
//! A [`RequestTemplate`] is static per-metric data; [`build_request`]
//! combines it with the caller's identifiers and the [`OracleConfig`] to
//! produce an [`HttpRequest`]. Identifier validation happens here, so a bad
//! identifier never reaches the transport.

use serde_json::json;

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::http_client::{HttpMethod, HttpRequest};

/// How a metric consumes caller identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Takes no identifier (aggregate market metrics).
    None,
    /// Exactly one non-empty value, commas forbidden.
    Single { param: &'static str },
    /// Comma-separated list; split order is the result order.
    Batch { param: &'static str },
    /// Positional optional filters; blank positions are skipped, commas
    /// forbidden.
    Optional { params: &'static [&'static str] },
    /// Free-text prompt sent in a JSON body.
    Prompt,
}

/// Static request shape of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTemplate {
    pub path: &'static str,
    pub method: HttpMethod,
    pub identifiers: IdentifierPolicy,
    /// Adds `limit=1&page=1`.
    pub paged: bool,
    /// Overrides the config default when set.
    pub timeout_ms: Option<u64>,
    /// Sends `x-integration` when the config carries a tag.
    pub integration_tag: bool,
}

impl RequestTemplate {
    pub const fn get(path: &'static str, identifiers: IdentifierPolicy) -> Self {
        Self {
            path,
            method: HttpMethod::Get,
            identifiers,
            paged: false,
            timeout_ms: None,
            integration_tag: false,
        }
    }

    pub const fn paged(mut self) -> Self {
        self.paged = true;
        self
    }

    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub const fn tagged(mut self) -> Self {
        self.integration_tag = true;
        self
    }

    pub const fn post(mut self) -> Self {
        self.method = HttpMethod::Post;
        self
    }
}

/// Identifiers as the caller supplied them, after validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedIdentifiers {
    /// First non-empty identifier, if any.
    pub primary: Option<String>,
    /// Batch members in request order; a single entry for single-value metrics.
    pub ordered: Vec<String>,
}

/// Request ready for the transport plus what the extractor needs to know
/// about the caller's identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub http: HttpRequest,
    pub identifiers: RequestedIdentifiers,
}

pub fn build_request(
    metric: &'static str,
    template: &RequestTemplate,
    identifiers: &[String],
    config: &OracleConfig,
) -> Result<PreparedRequest, OracleError> {
    let url = config.endpoint_url(template.path);
    let mut http = HttpRequest::new(template.method, url)
        .with_header("x-api-key", config.api_key())
        .with_header("accept", "application/json")
        .with_timeout_ms(template.timeout_ms.unwrap_or(config.default_timeout_ms()));

    if template.integration_tag {
        if let Some(tag) = config.integration_tag() {
            http = http.with_header("x-integration", tag);
        }
    }

    let first = identifiers.first().map(String::as_str).unwrap_or_default();
    let requested = match template.identifiers {
        IdentifierPolicy::None => RequestedIdentifiers::default(),
        IdentifierPolicy::Single { param } => {
            let value = first.trim();
            if value.is_empty() {
                return Err(OracleError::MissingIdentifier { metric, param });
            }
            if first.contains(',') {
                return Err(OracleError::MultiValueNotAllowed {
                    metric,
                    param,
                    value: first.to_owned(),
                });
            }
            http = http.with_query(param, value);
            RequestedIdentifiers {
                primary: Some(value.to_owned()),
                ordered: vec![value.to_owned()],
            }
        }
        IdentifierPolicy::Batch { param } => {
            let ordered = split_batch(first);
            if ordered.is_empty() || ordered.iter().any(String::is_empty) {
                return Err(OracleError::MissingIdentifier { metric, param });
            }
            http = http.with_query(param, ordered.join(","));
            RequestedIdentifiers {
                primary: ordered.first().cloned(),
                ordered,
            }
        }
        IdentifierPolicy::Optional { params } => {
            let mut requested = RequestedIdentifiers::default();
            for (index, param) in params.iter().enumerate() {
                let value = identifiers
                    .get(index)
                    .map(|value| value.trim())
                    .unwrap_or_default();
                if value.is_empty() {
                    continue;
                }
                if value.contains(',') {
                    return Err(OracleError::MultiValueNotAllowed {
                        metric,
                        param: *param,
                        value: value.to_owned(),
                    });
                }
                if index == 0 {
                    requested.primary = Some(value.to_owned());
                }
                requested.ordered.push(value.to_owned());
                http = http.with_query(*param, value);
            }
            requested
        }
        IdentifierPolicy::Prompt => {
            if first.trim().is_empty() {
                return Err(OracleError::MissingIdentifier {
                    metric,
                    param: "message",
                });
            }
            let body = json!({ "messages": [{ "user": first }] });
            http = http
                .with_header("content-type", "application/json")
                .with_body(body.to_string());
            RequestedIdentifiers {
                primary: Some(first.to_owned()),
                ordered: vec![first.to_owned()],
            }
        }
    };

    if template.paged {
        http = http.with_query("limit", "1").with_query("page", "1");
    }

    Ok(PreparedRequest {
        http,
        identifiers: requested,
    })
}

fn split_batch(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|part| part.trim().to_owned()).collect()
}
