//! Cairo string decoding for contract call responses.
//!
//! A single-element response is a short string: one hex word holding ASCII
//! bytes. Anything longer is a long string: `[len, part_0, ..., part_len-1]`
//! where every part is itself a short string.

use crate::{hex_to_bytes, hex_to_felt, CodecError};

/// Decode one hex word as ASCII text.
pub fn decode_short_string(value: &str) -> Result<String, CodecError> {
    let bytes = hex_to_bytes(value)?;
    if !bytes.is_ascii() {
        return Err(CodecError::NotAscii {
            value: value.to_string(),
        });
    }
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Decode a short or long string from a raw call response.
pub fn decode_string_response<S: AsRef<str>>(response: &[S]) -> Result<String, CodecError> {
    if let [single] = response {
        return decode_short_string(single.as_ref());
    }

    let (len, parts) = response.split_first().ok_or(CodecError::EmptyString)?;
    let len_felt = hex_to_felt(len.as_ref())?;
    let truncated = || CodecError::TruncatedString {
        len: format!("{len_felt:#x}"),
        available: parts.len(),
    };
    let count = usize::try_from(u64::try_from(len_felt).map_err(|_| truncated())?)
        .map_err(|_| truncated())?;
    let parts = parts.get(..count).ok_or_else(truncated)?;

    let mut decoded = String::new();
    for part in parts {
        decoded.push_str(&decode_short_string(part.as_ref())?);
    }
    Ok(decoded)
}
