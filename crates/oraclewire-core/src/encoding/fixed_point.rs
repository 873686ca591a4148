//! Decimal text to 18-digit fixed-point conversion.
//!
//! All arithmetic happens on decimal digit strings; the value never passes
//! through binary floating point. Exponent notation (`1.5e-7`, `3.2E+12`) is
//! normalized to plain digits first, then the integer part and the first 18
//! fractional digits form the scaled integer. Fractional digits beyond the
//! 18th are truncated.

use ethabi::ethereum_types::U256;
use serde_json::Number;

use crate::error::OracleError;

pub const FIXED_POINT_DECIMALS: u32 = 18;

/// Bound on the decimal point's distance from the first significant digit.
/// Beyond it a value either overflows 256 bits or truncates to zero at 18
/// decimals.
const MAX_MAGNITUDE: i64 = 400;

/// Non-negative-or-signed decimal in plain notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainDecimal {
    negative: bool,
    integer: String,
    fraction: String,
}

impl PlainDecimal {
    /// Parse a JSON-style decimal literal, with optional sign and exponent.
    pub fn parse(text: &str) -> Result<Self, OracleError> {
        let non_numeric = || OracleError::NonNumeric {
            value: text.to_owned(),
        };

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            Some(_) => (false, trimmed),
            None => return Err(non_numeric()),
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(index) => {
                let exponent = unsigned[index + 1..]
                    .parse::<i64>()
                    .map_err(|_| non_numeric())?;
                (&unsigned[..index], exponent)
            }
            None => (unsigned, 0),
        };

        let (integer_digits, fraction_digits) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (mantissa, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if (integer_digits.is_empty() && fraction_digits.is_empty())
            || !all_digits(integer_digits)
            || !all_digits(fraction_digits)
        {
            return Err(non_numeric());
        }

        let digits = format!("{integer_digits}{fraction_digits}");
        let is_zero = digits.bytes().all(|byte| byte == b'0');
        if is_zero {
            return Ok(Self::zero());
        }

        let leading_zeros = digits.len() - digits.trim_start_matches('0').len();
        let digits = &digits[leading_zeros..];
        // Integer digits of the value, counted from the first significant one.
        let point = (integer_digits.len() as i64 - leading_zeros as i64).saturating_add(exponent);
        if point > MAX_MAGNITUDE {
            return Err(OracleError::OutOfRange {
                value: text.to_owned(),
                reason: "exceeds 256-bit fixed-point range",
            });
        }
        if point < -MAX_MAGNITUDE {
            return Ok(Self::zero());
        }

        let (integer, fraction) = if point <= 0 {
            let padding = "0".repeat(point.unsigned_abs() as usize);
            (String::from("0"), format!("{padding}{digits}"))
        } else if point as usize >= digits.len() {
            let padding = "0".repeat(point as usize - digits.len());
            (format!("{digits}{padding}"), String::new())
        } else {
            let (integer, fraction) = digits.split_at(point as usize);
            (integer.to_owned(), fraction.to_owned())
        };

        Ok(Self {
            negative,
            integer,
            fraction,
        }
        .trimmed())
    }

    pub fn zero() -> Self {
        Self {
            negative: false,
            integer: String::from("0"),
            fraction: String::new(),
        }
    }

    fn trimmed(mut self) -> Self {
        let integer = self.integer.trim_start_matches('0');
        self.integer = if integer.is_empty() {
            String::from("0")
        } else {
            integer.to_owned()
        };
        self.fraction = self.fraction.trim_end_matches('0').to_owned();
        if self.integer == "0" && self.fraction.is_empty() {
            self.negative = false;
        }
        self
    }

    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Plain decimal notation, e.g. `0.00000015` or `-12.5`.
    pub fn to_plain_string(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        if self.fraction.is_empty() {
            format!("{sign}{}", self.integer)
        } else {
            format!("{sign}{}.{}", self.integer, self.fraction)
        }
    }

    /// `floor(value × 10^decimals)` for a non-negative value.
    pub fn scale(&self, decimals: u32) -> Result<U256, OracleError> {
        if self.negative {
            return Err(OracleError::OutOfRange {
                value: self.to_plain_string(),
                reason: "negative values cannot be encoded as unsigned integers",
            });
        }

        let decimals = decimals as usize;
        let mut digits = self.integer.clone();
        if self.fraction.len() >= decimals {
            digits.push_str(&self.fraction[..decimals]);
        } else {
            digits.push_str(&self.fraction);
            digits.push_str(&"0".repeat(decimals - self.fraction.len()));
        }

        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(U256::zero());
        }

        U256::from_dec_str(digits).map_err(|_| OracleError::OutOfRange {
            value: self.to_plain_string(),
            reason: "exceeds 256-bit fixed-point range",
        })
    }
}

/// Convert decimal text to `value × 10^18`.
pub fn to_fixed_point(text: &str) -> Result<U256, OracleError> {
    PlainDecimal::parse(text)?.scale(FIXED_POINT_DECIMALS)
}

/// Convert a JSON number to `value × 10^18`.
pub fn number_to_fixed_point(number: &Number) -> Result<U256, OracleError> {
    to_fixed_point(&number.to_string())
}

/// Render a fixed-point integer back to decimal text, dropping trailing zeros.
pub fn from_fixed_point(value: U256) -> String {
    let decimals = FIXED_POINT_DECIMALS as usize;
    let digits = value.to_string();
    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits
    };

    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_owned()
    } else {
        format!("{integer}.{fraction}")
    }
}
