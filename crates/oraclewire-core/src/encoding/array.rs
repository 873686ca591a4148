//! Flat 256-bit word encodings.
//!
//! A single value is one 32-byte big-endian word. An ordered array is a
//! 32-byte big-endian length word followed by one word per value, in input
//! order. There is no dynamic-offset head as in a standard ABI `uint256[]`;
//! the layout is flat so that consumers can index words directly.

use ethabi::ethereum_types::U256;
use ethabi::{ParamType, Token};

use crate::error::DecodeError;

pub const WORD_BYTES: usize = 32;

pub fn encode_uint256(value: U256) -> Vec<u8> {
    ethabi::encode(&[Token::Uint(value)])
}

pub fn decode_uint256(bytes: &[u8]) -> Result<U256, DecodeError> {
    if bytes.len() != WORD_BYTES {
        return Err(DecodeError::Truncated {
            expected: WORD_BYTES,
            actual: bytes.len(),
        });
    }
    Ok(U256::from_big_endian(bytes))
}

pub fn encode_ordered_array(values: &[U256]) -> Vec<u8> {
    let mut tokens = Vec::with_capacity(values.len() + 1);
    tokens.push(Token::Uint(U256::from(values.len() as u64)));
    tokens.extend(values.iter().copied().map(Token::Uint));
    ethabi::encode(&tokens)
}

pub fn decode_ordered_array(bytes: &[u8]) -> Result<Vec<U256>, DecodeError> {
    if bytes.len() < WORD_BYTES {
        return Err(DecodeError::Truncated {
            expected: WORD_BYTES,
            actual: bytes.len(),
        });
    }

    let (head, payload) = bytes.split_at(WORD_BYTES);
    let declared = U256::from_big_endian(head);
    let payload_words = payload.len() / WORD_BYTES;
    if payload.len() % WORD_BYTES != 0 || declared != U256::from(payload_words as u64) {
        return Err(DecodeError::LengthMismatch {
            declared: declared.to_string(),
            payload_words,
        });
    }

    let types = vec![ParamType::Uint(256); payload_words];
    let tokens =
        ethabi::decode(&types, payload).map_err(|error| DecodeError::Abi(error.to_string()))?;

    tokens
        .into_iter()
        .map(|token| {
            token
                .into_uint()
                .ok_or_else(|| DecodeError::Abi(String::from("expected uint256 word")))
        })
        .collect()
}
