//! Update records produced by the decoder.
//!
//! Records are plain values: built once per decode call and handed to the
//! persistence layer, which owns versioning.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use starknet::core::types::{Felt, U256};
use starknet::macros::selector;
use starknetid_common::uint256_to_hex;
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Token identifier, either a single felt or a `(low, high)` uint256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenId {
    Felt(Felt),
    Uint256(U256),
}

impl TokenId {
    /// Minimal `0x` hex of the integer value.
    pub fn to_hex(&self) -> String {
        match self {
            Self::Felt(felt) => format!("{felt:#x}"),
            Self::Uint256(value) => uint256_to_hex(*value),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Felt(_) => "felt",
            Self::Uint256(_) => "uint256",
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TokenId", 2)?;
        state.serialize_field("type", self.type_name())?;
        state.serialize_field("id", &self.to_hex())?;
        state.end()
    }
}

/// Transfer(from, to, token_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEvent {
    pub from: Felt,
    pub to: Felt,
    pub token_id: TokenId,
}

/// VerifierDataUpdate(token_id, field, data, verifier). The token id is always a uint256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifierDataUpdate {
    pub token_id: TokenId,
    pub field: Felt,
    pub data: Felt,
    pub verifier: Felt,
}

/// User-written identity data. No registry event decodes into this yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDataUpdate {
    pub token_id: TokenId,
    pub field: Felt,
    pub data: Felt,
}

/// domain_to_addr_update(domain_len, domain, address)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainToAddrUpdate {
    pub domain: String,
    pub address: Felt,
}

/// addr_to_domain_update(address, domain_len, domain)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddrToDomainUpdate {
    pub address: Felt,
    pub domain: String,
}

/// starknet_id_update(domain_len, domain, owner, expiry). The owner is always a uint256.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarknetIdUpdate {
    pub domain: String,
    pub owner: TokenId,
    pub expiry: Felt,
}

/// Any record the decoder can produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Transfer(TransferEvent),
    VerifierData(VerifierDataUpdate),
    DomainToAddr(DomainToAddrUpdate),
    AddrToDomain(AddrToDomainUpdate),
    StarknetIdUpdate(StarknetIdUpdate),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Transfer(_) => RecordKind::Transfer,
            Self::VerifierData(_) => RecordKind::VerifierData,
            Self::DomainToAddr(_) => RecordKind::DomainToAddr,
            Self::AddrToDomain(_) => RecordKind::AddrToDomain,
            Self::StarknetIdUpdate(_) => RecordKind::StarknetIdUpdate,
        }
    }

    /// Conventional persistence key: the token id for identity records, the domain otherwise.
    pub fn key(&self) -> String {
        match self {
            Self::Transfer(event) => event.token_id.to_hex(),
            Self::VerifierData(update) => update.token_id.to_hex(),
            Self::DomainToAddr(update) => update.domain.clone(),
            Self::AddrToDomain(update) => update.domain.clone(),
            Self::StarknetIdUpdate(update) => update.domain.clone(),
        }
    }
}

/// Record layouts the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Transfer,
    VerifierData,
    DomainToAddr,
    AddrToDomain,
    StarknetIdUpdate,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Transfer,
        RecordKind::VerifierData,
        RecordKind::DomainToAddr,
        RecordKind::AddrToDomain,
        RecordKind::StarknetIdUpdate,
    ];

    /// Event name as declared by the registry contracts.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Transfer => "Transfer",
            Self::VerifierData => "VerifierDataUpdate",
            Self::DomainToAddr => "domain_to_addr_update",
            Self::AddrToDomain => "addr_to_domain_update",
            Self::StarknetIdUpdate => "starknet_id_update",
        }
    }

    /// Command line spelling.
    pub fn cli_name(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::VerifierData => "verifier-data",
            Self::DomainToAddr => "domain-to-addr",
            Self::AddrToDomain => "addr-to-domain",
            Self::StarknetIdUpdate => "starknet-id-update",
        }
    }

    /// Event selector: sn_keccak(event_name)
    pub fn selector(self) -> Felt {
        match self {
            Self::Transfer => selector!("Transfer"),
            Self::VerifierData => selector!("VerifierDataUpdate"),
            Self::DomainToAddr => selector!("domain_to_addr_update"),
            Self::AddrToDomain => selector!("addr_to_domain_update"),
            Self::StarknetIdUpdate => selector!("starknet_id_update"),
        }
    }

    pub fn from_selector(selector: Felt) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

impl FromStr for RecordKind {
    type Err = DecodeError;

    /// Accepts either the on-chain event name or the command line spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.event_name() == s || kind.cli_name() == s)
            .ok_or_else(|| DecodeError::UnknownKind(s.to_string()))
    }
}
