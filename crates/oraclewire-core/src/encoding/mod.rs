//! Binary result encodings consumed by the on-chain side.
//!
//! | Encoding | Layout |
//! |----------|--------|
//! | `uint256` | one 32-byte big-endian word (fixed-point ×10^18, or a raw count) |
//! | `string` | UTF-8 bytes, capped at 256 bytes for free-text metrics |
//! | `uint256[]` | 32-byte length word followed by one word per value |

mod array;
mod fixed_point;
mod text;

use std::fmt::{Display, Formatter};

use ethabi::ethereum_types::U256;

use crate::error::DecodeError;

pub use array::{
    decode_ordered_array, decode_uint256, encode_ordered_array, encode_uint256, WORD_BYTES,
};
pub use fixed_point::{
    from_fixed_point, number_to_fixed_point, to_fixed_point, PlainDecimal, FIXED_POINT_DECIMALS,
};
pub use text::{encode_text, TEXT_CAP_BYTES};

/// Final result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedResult {
    FixedPointUint(U256),
    EncodedString(Vec<u8>),
    OrderedArray(Vec<U256>),
}

/// Layout tag of an [`EncodedResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingKind {
    Uint256,
    String,
    Uint256Array,
}

impl EncodingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uint256 => "uint256",
            Self::String => "string",
            Self::Uint256Array => "uint256[]",
        }
    }
}

impl Display for EncodingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EncodedResult {
    pub const fn kind(&self) -> EncodingKind {
        match self {
            Self::FixedPointUint(_) => EncodingKind::Uint256,
            Self::EncodedString(_) => EncodingKind::String,
            Self::OrderedArray(_) => EncodingKind::Uint256Array,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::FixedPointUint(value) => encode_uint256(*value),
            Self::EncodedString(bytes) => bytes.clone(),
            Self::OrderedArray(values) => encode_ordered_array(values),
        }
    }

    /// `0x`-prefixed lowercase hex of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

/// Parse `0x`-prefixed or bare hex into bytes.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|error| DecodeError::InvalidHex(error.to_string()))
}

/// Decode text bytes. A character split by the byte cap becomes U+FFFD.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
