use oraclewire_core::{decode_hex, decode_ordered_array, decode_text, decode_uint256};
use serde_json::{json, Value};

use crate::cli::{DecodeArgs, DecodeLayout};
use crate::error::CliError;

use super::describe_word;

pub fn run(args: &DecodeArgs) -> Result<Value, CliError> {
    let bytes = decode_hex(&args.hex)?;
    let (encoding, decoded) = match args.layout {
        DecodeLayout::Uint => ("uint256", describe_word(decode_uint256(&bytes)?)),
        DecodeLayout::Array => {
            let values = decode_ordered_array(&bytes)?;
            (
                "uint256[]",
                Value::Array(values.into_iter().map(describe_word).collect()),
            )
        }
        DecodeLayout::Text => ("string", Value::String(decode_text(&bytes))),
    };

    Ok(json!({
        "encoding": encoding,
        "byte_len": bytes.len(),
        "decoded": decoded,
    }))
}
