use std::cell::RefCell;

use starknet::core::types::{Felt, U256};
use starknetid_common::CodecError;
use starknetid_decoder::{
    decode_addr_to_domain, decode_domain_to_addr, decode_record, decode_starknet_id_update,
    decode_transfer_event, decode_verifier_data, DecodeError, RawFelt, Record, RecordKind,
    TokenId,
};

/// Raw value that records the order in which the decoder reads it.
struct Tracked<'a> {
    index: usize,
    value: Felt,
    reads: &'a RefCell<Vec<usize>>,
}

impl RawFelt for Tracked<'_> {
    fn to_felt(&self) -> Result<Felt, CodecError> {
        self.reads.borrow_mut().push(self.index);
        Ok(self.value)
    }
}

fn tracked<'a>(values: &[u64], reads: &'a RefCell<Vec<usize>>) -> Vec<Tracked<'a>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Tracked {
            index,
            value: Felt::from(*value),
            reads,
        })
        .collect()
}

#[test]
fn test_hex_transfer_layouts() {
    let felt_id = decode_transfer_event(&["0x1", "0x2", "0x2a"]).unwrap().unwrap();
    assert_eq!(felt_id.token_id, TokenId::Felt(Felt::from(42u64)));

    let uint_id = decode_transfer_event(&["0x1", "0x2", "0x2a", "0x0"])
        .unwrap()
        .unwrap();
    assert_eq!(uint_id.token_id, TokenId::Uint256(U256::from_words(42, 0)));

    assert!(decode_transfer_event(&["0x1", "0x2"]).unwrap().is_none());
}

#[test]
fn test_odd_length_hex_values() {
    let a = decode_domain_to_addr(&["0x1", "0x49ed", "0x123"]).unwrap();
    let b = decode_domain_to_addr(&["1", "49ed", "0123"]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.domain, "ben.stark");
}

#[test]
fn test_byte_values() {
    let values: Vec<Vec<u8>> = vec![vec![0x04, 0x56], vec![0x00], vec![]];
    let update = decode_addr_to_domain(&values).unwrap();
    assert_eq!(update.address, Felt::from(0x456u64));
    assert_eq!(update.domain, "stark");
}

#[test]
fn test_invalid_hex_propagates() {
    let err = decode_domain_to_addr(&["0x1", "0xnot-hex", "0x123"]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Codec(CodecError::InvalidHex { .. })
    ));
}

#[test]
fn test_values_past_the_prime_propagate() {
    let max = format!("0x{}", "f".repeat(64));
    let err = decode_domain_to_addr(&["0x0", max.as_str()]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Codec(CodecError::OutOfField { .. })
    ));

    let word: [u8; 32] = [0xff; 32];
    assert!(matches!(
        decode_addr_to_domain(&[word, [0u8; 32]]),
        Err(DecodeError::Codec(CodecError::OutOfField { .. }))
    ));
}

#[test]
fn test_zero_padded_values_wider_than_a_word() {
    let padded = format!("0x{}0456", "00".repeat(8));
    let update = decode_domain_to_addr(&["0x0", padded.as_str()]).unwrap();
    assert_eq!(update.address, Felt::from(0x456u64));
}

#[test]
fn test_uint256_half_overflow_propagates() {
    let wide = format!("0x1{}", "0".repeat(32));
    let err = decode_verifier_data(&[wide.as_str(), "0x0", "0x1", "0x2", "0x3"]).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Codec(CodecError::HalfTooWide { .. })
    ));
}

#[test]
fn test_fields_are_read_in_order() {
    let reads = RefCell::new(Vec::new());
    let values = tracked(&[7, 0, 0x11, 0x22, 0x33], &reads);
    decode_verifier_data(&values).unwrap();
    assert_eq!(*reads.borrow(), vec![0, 1, 2, 3, 4]);

    let reads = RefCell::new(Vec::new());
    let values = tracked(&[2, 38, 18925, 9, 0, 100], &reads);
    let update = decode_starknet_id_update(&values).unwrap();
    assert_eq!(update.domain, "ab.ben.stark");
    assert_eq!(*reads.borrow(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_short_input_fails_without_skipping_ahead() {
    let reads = RefCell::new(Vec::new());
    let values = tracked(&[0x456, 1], &reads);
    let err = decode_addr_to_domain(&values).unwrap_err();

    assert!(matches!(
        err,
        DecodeError::MissingValue {
            field: "domain",
            position: 2
        }
    ));
    assert_eq!(*reads.borrow(), vec![0, 1]);
}

#[test]
fn test_every_kind_rejects_empty_input() {
    let empty: [&str; 0] = [];
    for kind in RecordKind::ALL {
        let result = decode_record(kind, &empty);
        match kind {
            RecordKind::Transfer => assert!(result.unwrap().is_none()),
            _ => assert!(matches!(
                result,
                Err(DecodeError::MissingValue { position: 0, .. })
            )),
        }
    }
}

#[test]
fn test_record_serializes_for_storage() {
    let record = decode_record(RecordKind::DomainToAddr, &["0x1", "0x49ed", "0x123"])
        .unwrap()
        .unwrap();
    assert!(matches!(record, Record::DomainToAddr(_)));

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["kind"], "domain_to_addr");
    assert_eq!(json["domain"], "ben.stark");
    assert_eq!(json["address"], "0x123");
}
