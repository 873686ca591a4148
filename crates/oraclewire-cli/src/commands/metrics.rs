use oraclewire_core::{IdentifierPolicy, MetricDescriptor, MetricRegistry};
use serde::Serialize;
use serde_json::Value;

use crate::cli::MetricsArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct MetricEntry {
    key: &'static str,
    method: &'static str,
    path: &'static str,
    identifiers: String,
    paged: bool,
    timeout_ms: Option<u64>,
}

impl From<&MetricDescriptor> for MetricEntry {
    fn from(descriptor: &MetricDescriptor) -> Self {
        let request = &descriptor.request;
        Self {
            key: descriptor.key,
            method: request.method.as_str(),
            path: request.path,
            identifiers: describe_identifiers(request.identifiers),
            paged: request.paged,
            timeout_ms: request.timeout_ms,
        }
    }
}

pub fn run(args: &MetricsArgs) -> Result<Value, CliError> {
    let registry = if args.generalized {
        MetricRegistry::generalized()
    } else {
        MetricRegistry::dedicated()
    };
    let entries: Vec<MetricEntry> = registry.descriptors().map(MetricEntry::from).collect();
    Ok(serde_json::to_value(entries)?)
}

fn describe_identifiers(policy: IdentifierPolicy) -> String {
    match policy {
        IdentifierPolicy::None => String::from("none"),
        IdentifierPolicy::Single { param } => param.to_owned(),
        IdentifierPolicy::Batch { param } => format!("{param} (comma-separated)"),
        IdentifierPolicy::Optional { params } => format!("{} (optional)", params.join(", ")),
        IdentifierPolicy::Prompt => String::from("message (request body)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_listing_describes_batch_price() {
        let listing = run(&MetricsArgs { generalized: false }).expect("lists");
        let entries = listing.as_array().expect("array");
        assert_eq!(entries.len(), 21);
        let price = entries
            .iter()
            .find(|entry| entry["key"] == "price")
            .expect("price listed");
        assert_eq!(price["identifiers"], "token_id (comma-separated)");
        assert_eq!(price["timeout_ms"], Value::Null);
    }

    #[test]
    fn generalized_listing_uses_screaming_case() {
        let listing = run(&MetricsArgs { generalized: true }).expect("lists");
        let keys: Vec<&str> = listing
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|entry| entry["key"].as_str())
            .collect();
        assert!(keys.contains(&"INDICES_PERFORMANCE"));
        assert_eq!(keys.len(), 20);
    }
}
