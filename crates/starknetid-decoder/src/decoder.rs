//! Starknet ID registry event decoder
//!
//! Every decoder reads its input strictly front to back through a cursor.
//! Running out of values is a fatal [`DecodeError::MissingValue`]; nothing is
//! defaulted or truncated.
//!
//! Layouts (legacy Cairo 0 events, every member in `data`):
//! - Transfer: `from, to, token_id` or `from, to, token_id_low, token_id_high`
//! - VerifierDataUpdate: `token_id_low, token_id_high, field, data, verifier`
//! - domain_to_addr_update: `domain_len, domain[domain_len], address`
//! - addr_to_domain_update: `address, domain_len, domain[domain_len]`
//! - starknet_id_update: `domain_len, domain[domain_len], owner_low, owner_high, expiry`

use starknet::core::types::{EmittedEvent, Felt, U256};
use starknetid_common::{
    bytes_to_felt, decode_label, domain_from_labels, hex_to_felt, pack_uint256, CodecError,
};

use crate::error::{DecodeError, Result};
use crate::records::{
    AddrToDomainUpdate, DomainToAddrUpdate, Record, RecordKind, StarknetIdUpdate, TokenId,
    TransferEvent, VerifierDataUpdate,
};

/// A raw value that stands for one field element.
pub trait RawFelt {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError>;
}

impl RawFelt for Felt {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        Ok(*self)
    }
}

impl RawFelt for str {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        hex_to_felt(self)
    }
}

impl RawFelt for String {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        hex_to_felt(self)
    }
}

impl RawFelt for [u8] {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        bytes_to_felt(self)
    }
}

impl RawFelt for Vec<u8> {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        bytes_to_felt(self)
    }
}

impl RawFelt for [u8; 32] {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        bytes_to_felt(self)
    }
}

impl<T: RawFelt + ?Sized> RawFelt for &T {
    fn to_felt(&self) -> std::result::Result<Felt, CodecError> {
        (**self).to_felt()
    }
}

/// Forward-only reader over a raw value sequence.
struct FeltCursor<'a, V> {
    values: &'a [V],
    position: usize,
}

impl<'a, V: RawFelt> FeltCursor<'a, V> {
    fn new(values: &'a [V]) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.values.len() - self.position
    }

    fn next_felt(&mut self, field: &'static str) -> Result<Felt> {
        let value = self
            .values
            .get(self.position)
            .ok_or(DecodeError::MissingValue {
                field,
                position: self.position,
            })?;
        let felt = value.to_felt()?;
        self.position += 1;
        Ok(felt)
    }

    /// Two consecutive values read as `(low, high)`.
    fn next_uint256(&mut self, field: &'static str) -> Result<U256> {
        let low = self.next_felt(field)?;
        let high = self.next_felt(field)?;
        Ok(pack_uint256(low, high)?)
    }

    /// A length-prefixed label array, joined into a `.stark` domain.
    fn next_domain(&mut self) -> Result<String> {
        let count = self.next_felt("domain_len")?;
        let count: u64 = count
            .try_into()
            .map_err(|_| DecodeError::LabelCountOverflow {
                count: format!("{count:#x}"),
            })?;

        let mut labels = Vec::with_capacity((count as usize).min(self.remaining()));
        for _ in 0..count {
            labels.push(decode_label(self.next_felt("domain")?)?);
        }
        Ok(domain_from_labels(labels))
    }
}

/// Decode a Transfer event.
///
/// Three values carry a felt token id, four carry a uint256 one. Any other
/// length is not a Transfer this registry emits and yields `Ok(None)`.
pub fn decode_transfer_event<V: RawFelt>(values: &[V]) -> Result<Option<TransferEvent>> {
    let mut cursor = FeltCursor::new(values);

    let event = match values.len() {
        3 => {
            let from = cursor.next_felt("from")?;
            let to = cursor.next_felt("to")?;
            let token_id = TokenId::Felt(cursor.next_felt("token_id")?);
            TransferEvent { from, to, token_id }
        }
        4 => {
            let from = cursor.next_felt("from")?;
            let to = cursor.next_felt("to")?;
            let token_id = TokenId::Uint256(cursor.next_uint256("token_id")?);
            TransferEvent { from, to, token_id }
        }
        data_len => {
            tracing::warn!(
                target: "starknetid_decoder::decoder",
                data_len,
                "Unrecognized Transfer layout"
            );
            return Ok(None);
        }
    };

    Ok(Some(event))
}

pub fn decode_verifier_data<V: RawFelt>(values: &[V]) -> Result<VerifierDataUpdate> {
    let mut cursor = FeltCursor::new(values);

    let token_id = TokenId::Uint256(cursor.next_uint256("token_id")?);
    let field = cursor.next_felt("field")?;
    let data = cursor.next_felt("data")?;
    let verifier = cursor.next_felt("verifier")?;

    Ok(VerifierDataUpdate {
        token_id,
        field,
        data,
        verifier,
    })
}

pub fn decode_domain_to_addr<V: RawFelt>(values: &[V]) -> Result<DomainToAddrUpdate> {
    let mut cursor = FeltCursor::new(values);

    let domain = cursor.next_domain()?;
    let address = cursor.next_felt("address")?;

    Ok(DomainToAddrUpdate { domain, address })
}

pub fn decode_addr_to_domain<V: RawFelt>(values: &[V]) -> Result<AddrToDomainUpdate> {
    let mut cursor = FeltCursor::new(values);

    let address = cursor.next_felt("address")?;
    let domain = cursor.next_domain()?;

    Ok(AddrToDomainUpdate { address, domain })
}

pub fn decode_starknet_id_update<V: RawFelt>(values: &[V]) -> Result<StarknetIdUpdate> {
    let mut cursor = FeltCursor::new(values);

    let domain = cursor.next_domain()?;
    let owner = TokenId::Uint256(cursor.next_uint256("owner")?);
    let expiry = cursor.next_felt("expiry")?;

    Ok(StarknetIdUpdate {
        domain,
        owner,
        expiry,
    })
}

/// Decode `values` with the layout of `kind`. Only Transfer can yield `None`.
pub fn decode_record<V: RawFelt>(kind: RecordKind, values: &[V]) -> Result<Option<Record>> {
    let record = match kind {
        RecordKind::Transfer => decode_transfer_event(values)?.map(Record::Transfer),
        RecordKind::VerifierData => Some(Record::VerifierData(decode_verifier_data(values)?)),
        RecordKind::DomainToAddr => Some(Record::DomainToAddr(decode_domain_to_addr(values)?)),
        RecordKind::AddrToDomain => Some(Record::AddrToDomain(decode_addr_to_domain(values)?)),
        RecordKind::StarknetIdUpdate => Some(Record::StarknetIdUpdate(
            decode_starknet_id_update(values)?,
        )),
    };
    Ok(record)
}

/// Resolve the record kind from `keys[0]` and decode the event data.
///
/// Events with no keys or an unknown selector are skipped.
pub fn decode_emitted_event(event: &EmittedEvent) -> Result<Option<Record>> {
    let Some(&selector) = event.keys.first() else {
        return Ok(None);
    };

    let Some(kind) = RecordKind::from_selector(selector) else {
        tracing::trace!(
            target: "starknetid_decoder::decoder",
            contract = %format!("{:#x}", event.from_address),
            selector = %format!("{:#x}", selector),
            keys_len = event.keys.len(),
            data_len = event.data.len(),
            block_number = event.block_number.unwrap_or(0),
            tx_hash = %format!("{:#x}", event.transaction_hash),
            "Unhandled event selector"
        );
        return Ok(None);
    };

    decode_record(kind, &event.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn felts(values: &[u64]) -> Vec<Felt> {
        values.iter().map(|v| Felt::from(*v)).collect()
    }

    #[test]
    fn test_transfer_with_felt_token_id() {
        let event = decode_transfer_event(&felts(&[0x1, 0x2, 42]))
            .unwrap()
            .unwrap();
        assert_eq!(event.from, Felt::from(0x1u64));
        assert_eq!(event.to, Felt::from(0x2u64));
        assert_eq!(event.token_id, TokenId::Felt(Felt::from(42u64)));
    }

    #[test]
    fn test_transfer_with_uint256_token_id() {
        let event = decode_transfer_event(&felts(&[0xa, 0xb, 100, 1]))
            .unwrap()
            .unwrap();
        assert_eq!(event.token_id, TokenId::Uint256(U256::from_words(100, 1)));
    }

    #[test]
    fn test_transfer_unrecognized_lengths() {
        for len in [0usize, 1, 2, 5, 6] {
            let values = vec![Felt::ONE; len];
            assert!(decode_transfer_event(&values).unwrap().is_none());
        }
    }

    #[test]
    fn test_verifier_data() {
        let update = decode_verifier_data(&felts(&[7, 0, 0x11, 0x22, 0x33])).unwrap();
        assert_eq!(update.token_id, TokenId::Uint256(U256::from_words(7, 0)));
        assert_eq!(update.field, Felt::from(0x11u64));
        assert_eq!(update.data, Felt::from(0x22u64));
        assert_eq!(update.verifier, Felt::from(0x33u64));
    }

    #[test]
    fn test_verifier_data_missing_verifier() {
        let err = decode_verifier_data(&felts(&[7, 0, 0x11, 0x22])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingValue {
                field: "verifier",
                position: 4
            }
        ));
    }

    #[test]
    fn test_domain_to_addr() {
        let update = decode_domain_to_addr(&felts(&[1, 18925, 0x123])).unwrap();
        assert_eq!(update.domain, "ben.stark");
        assert_eq!(update.address, Felt::from(0x123u64));
    }

    #[test]
    fn test_zero_labels_is_bare_suffix() {
        let update = decode_domain_to_addr(&felts(&[0, 0x123])).unwrap();
        assert_eq!(update.domain, "stark");
        assert_eq!(update.address, Felt::from(0x123u64));
    }

    #[test]
    fn test_addr_to_domain_reads_address_first() {
        let update = decode_addr_to_domain(&felts(&[0x456, 2, 38, 18925])).unwrap();
        assert_eq!(update.address, Felt::from(0x456u64));
        assert_eq!(update.domain, "ab.ben.stark");
    }

    #[test]
    fn test_starknet_id_update() {
        let update = decode_starknet_id_update(&felts(&[1, 18925, 9, 0, 1_700_000_000])).unwrap();
        assert_eq!(update.domain, "ben.stark");
        assert_eq!(update.owner, TokenId::Uint256(U256::from_words(9, 0)));
        assert_eq!(update.expiry, Felt::from(1_700_000_000u64));
    }

    #[test]
    fn test_label_count_past_end_is_missing_value() {
        let err = decode_domain_to_addr(&felts(&[3, 18925])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingValue {
                field: "domain",
                position: 2
            }
        ));
    }

    #[test]
    fn test_huge_label_count() {
        let values = vec![Felt::from(u128::MAX), Felt::ONE];
        assert!(matches!(
            decode_domain_to_addr(&values),
            Err(DecodeError::LabelCountOverflow { .. })
        ));
    }

    #[test]
    fn test_decode_record_dispatch() {
        let record = decode_record(RecordKind::AddrToDomain, &felts(&[0x456, 0]))
            .unwrap()
            .unwrap();
        assert_eq!(record.kind(), RecordKind::AddrToDomain);
        assert_eq!(record.key(), "stark");

        assert!(decode_record(RecordKind::Transfer, &felts(&[1, 2]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_emitted_event() {
        let event = EmittedEvent {
            from_address: Felt::from(0x789u64),
            keys: vec![RecordKind::DomainToAddr.selector()],
            data: felts(&[1, 18925, 0xabc]),
            block_hash: None,
            block_number: Some(300),
            transaction_hash: Felt::from(0x2345u64),
        };

        let record = decode_emitted_event(&event).unwrap().unwrap();
        assert_eq!(
            record,
            Record::DomainToAddr(DomainToAddrUpdate {
                domain: "ben.stark".to_string(),
                address: Felt::from(0xabcu64),
            })
        );
    }

    #[test]
    fn test_decode_emitted_event_unknown_selector() {
        let event = EmittedEvent {
            from_address: Felt::from(0x789u64),
            keys: vec![Felt::from(0xdeadu64)],
            data: felts(&[1, 2, 3]),
            block_hash: None,
            block_number: None,
            transaction_hash: Felt::ZERO,
        };
        assert!(decode_emitted_event(&event).unwrap().is_none());
    }
}
