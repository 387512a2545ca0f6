//! Common codecs for the Starknet ID indexer
//!
//! Provides conversions between the wire formats used by the chain (hex strings,
//! 32-byte big-endian words) and the typed values the decoders work with, plus
//! the label and short-string codecs.

pub mod label;
pub mod string;

use starknet::core::types::{Felt, U256};

pub use label::{decode_label, domain_from_labels, DOMAIN_SUFFIX};
pub use string::{decode_short_string, decode_string_response};

/// Errors raised while converting raw chain values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid hex string {value:?}: {source}")]
    InvalidHex {
        value: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("value is {len} bytes wide, a field element holds at most 32")]
    TooWide { len: usize },
    #[error("value 0x{value} is not below the field prime")]
    OutOfField { value: String },
    #[error("uint256 half {value} does not fit in 128 bits")]
    HalfTooWide { value: String },
    #[error("label digit {digit} has no extended alphabet symbol")]
    LabelDigit { digit: u64 },
    #[error("short string {value:?} is not ASCII")]
    NotAscii { value: String },
    #[error("string response is empty")]
    EmptyString,
    #[error("string length {len} is larger than the {available} parts returned")]
    TruncatedString { len: String, available: usize },
}

// ===== Hex / bytes =====

/// Decode a hex string into bytes.
///
/// The `0x` prefix is optional, and an odd number of digits is left-padded with
/// a zero nibble, so `"0x1"` and `"0x01"` decode to the same byte.
pub fn hex_to_bytes(value: &str) -> Result<Vec<u8>, CodecError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    decoded.map_err(|source| CodecError::InvalidHex {
        value: value.to_string(),
        source,
    })
}

/// Parse a hex string straight to a Felt.
pub fn hex_to_felt(value: &str) -> Result<Felt, CodecError> {
    bytes_to_felt(&hex_to_bytes(value)?)
}

// ===== Felt conversions =====

/// Big-endian decode into a Felt.
///
/// Leading zero bytes are ignored, so any width is accepted as long as the
/// integer fits in 32 bytes. Values at or above the field prime are rejected
/// rather than reduced.
pub fn bytes_to_felt(bytes: &[u8]) -> Result<Felt, CodecError> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    if significant.len() > 32 {
        return Err(CodecError::TooWide { len: significant.len() });
    }
    let mut arr = [0u8; 32];
    arr[32 - significant.len()..].copy_from_slice(significant);

    let felt = Felt::from_bytes_be(&arr);
    if felt.to_bytes_be() != arr {
        return Err(CodecError::OutOfField {
            value: hex::encode(significant),
        });
    }
    Ok(felt)
}

/// Encode a Felt as exactly 32 big-endian bytes.
pub fn felt_to_bytes(felt: Felt) -> [u8; 32] {
    felt.to_bytes_be()
}

/// Narrow a Felt to one 128-bit half of a uint256.
pub fn felt_to_u128(felt: Felt) -> Result<u128, CodecError> {
    u128::try_from(felt).map_err(|_| CodecError::HalfTooWide {
        value: format!("{felt:#x}"),
    })
}

// ===== U256 conversions =====

/// Combine `(low, high)` into `high * 2^128 + low`.
pub fn pack_uint256(low: Felt, high: Felt) -> Result<U256, CodecError> {
    Ok(U256::from_words(felt_to_u128(low)?, felt_to_u128(high)?))
}

/// Split a uint256 into its `(low, high)` felts.
pub fn unpack_uint256(value: U256) -> (Felt, Felt) {
    (Felt::from(value.low()), Felt::from(value.high()))
}

/// Encode a U256 as exactly 32 big-endian bytes.
pub fn uint256_to_bytes(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[..16].copy_from_slice(&value.high().to_be_bytes());
    out[16..].copy_from_slice(&value.low().to_be_bytes());
    out
}

/// Big-endian decode of 32 bytes into a U256.
pub fn bytes_to_uint256(bytes: &[u8; 32]) -> U256 {
    let mut high = [0u8; 16];
    let mut low = [0u8; 16];
    high.copy_from_slice(&bytes[..16]);
    low.copy_from_slice(&bytes[16..]);
    U256::from_words(u128::from_be_bytes(low), u128::from_be_bytes(high))
}

/// Widen a Felt into a U256 holding the same integer.
pub fn felt_to_uint256(felt: Felt) -> U256 {
    bytes_to_uint256(&felt.to_bytes_be())
}

/// Minimal `0x`-prefixed hex for a U256, matching `{:#x}` on Felt.
pub fn uint256_to_hex(value: U256) -> String {
    if value.high() == 0 {
        format!("{:#x}", value.low())
    } else {
        format!("{:#x}{:032x}", value.high(), value.low())
    }
}
