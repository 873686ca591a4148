use crate::error::OracleError;

/// Byte cap applied to free-text answers.
pub const TEXT_CAP_BYTES: usize = 256;

/// UTF-8 encode `text`, keeping at most `cap` bytes.
///
/// The cut is byte-oriented and can split a multi-byte character at the
/// boundary; consumers decode the prefix lossily.
pub fn encode_text(text: &str, cap: Option<usize>) -> Result<Vec<u8>, OracleError> {
    if text.is_empty() {
        return Err(OracleError::EmptyText);
    }

    let bytes = text.as_bytes();
    let end = cap.map_or(bytes.len(), |cap| cap.min(bytes.len()));
    Ok(bytes[..end].to_vec())
}
