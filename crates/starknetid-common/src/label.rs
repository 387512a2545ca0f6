//! Domain label codec.
//!
//! Each label of a `.stark` domain is stored on-chain as one felt written in a
//! base-38 numeral system. Digits 0..=36 index the basic alphabet; digit 37 is
//! an escape whose following digit indexes the extended alphabet. Digits are
//! emitted least significant first and the text is kept in emission order.

use primitive_types::U256 as Word;
use starknet::core::types::Felt;

use crate::CodecError;

/// Suffix appended to every decoded domain.
pub const DOMAIN_SUFFIX: &str = "stark";

const BASIC_ALPHABET: &[u8; 37] = b"abcdefghijklmnopqrstuvwxyz0123456789-";
const BIG_ALPHABET: [char; 2] = ['这', '来'];
const BASE: u64 = BASIC_ALPHABET.len() as u64 + 1;
const ESCAPE: u64 = BASIC_ALPHABET.len() as u64;

/// Decode one label felt into text. Zero decodes to the empty string.
pub fn decode_label(felt: Felt) -> Result<String, CodecError> {
    let base = Word::from(BASE);
    let mut value = Word::from_big_endian(&felt.to_bytes_be());
    let mut decoded = String::new();

    while !value.is_zero() {
        let (rest, digit) = value.div_mod(base);
        value = rest;
        let digit = digit.low_u64();

        if digit == ESCAPE {
            let (rest, extended) = value.div_mod(base);
            value = rest;
            let extended = extended.low_u64();
            let symbol = BIG_ALPHABET
                .get(extended as usize)
                .ok_or(CodecError::LabelDigit { digit: extended })?;
            decoded.push(*symbol);
        } else {
            decoded.push(char::from(BASIC_ALPHABET[digit as usize]));
        }
    }

    Ok(decoded)
}

/// Join decoded labels into a domain: every label is followed by a dot, then the
/// suffix. No labels gives the bare suffix.
pub fn domain_from_labels<I, S>(labels: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut domain = String::new();
    for label in labels {
        domain.push_str(label.as_ref());
        domain.push('.');
    }
    domain.push_str(DOMAIN_SUFFIX);
    domain
}
