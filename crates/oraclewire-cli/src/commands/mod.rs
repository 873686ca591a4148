mod decode;
mod fetch;
mod metrics;

use oraclewire_core::{decode_text, from_fixed_point, EncodedResult, U256};
use serde_json::{json, Value};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        Command::Fetch(args) => fetch::run(args).await,
        Command::Metrics(args) => metrics::run(args),
        Command::Decode(args) => decode::run(args),
    }
}

/// A word is shown both raw and read as 18-decimal fixed point; only the
/// metric knows which reading applies.
fn describe_word(value: U256) -> Value {
    json!({
        "raw": value.to_string(),
        "fixed_point": from_fixed_point(value),
    })
}

fn describe(result: &EncodedResult) -> Value {
    match result {
        EncodedResult::FixedPointUint(value) => describe_word(*value),
        EncodedResult::EncodedString(bytes) => Value::String(decode_text(bytes)),
        EncodedResult::OrderedArray(values) => {
            Value::Array(values.iter().copied().map(describe_word).collect())
        }
    }
}
