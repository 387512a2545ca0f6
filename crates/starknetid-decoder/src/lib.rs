//! Starknet ID registry decoder
//!
//! Turns the raw felt sequences emitted by the Starknet ID registry contracts
//! into typed update records, and probes remote contracts to tell whether they
//! behave like ERC721 collections.
//!
//! # Components
//!
//! - [`decoder`]: sequential decoders for each record layout, plus selector dispatch
//! - [`records`]: the record types handed to the persistence layer
//! - [`probe`]: [`InterfaceProbe`], trial-call classification and name resolution
//! - [`remote`]: the [`RemoteCall`] seam and its JSON-RPC implementation
//! - [`sink`]: the [`RecordSink`] seam for whatever stores decoded records
//!
//! # Example
//!
//! ```rust,ignore
//! use starknetid_decoder::{decode_record, RecordKind};
//!
//! let values = ["0x1", "0x49ed", "0x123"];
//! let record = decode_record(RecordKind::DomainToAddr, &values)?;
//! ```

pub mod decoder;
pub mod error;
pub mod probe;
pub mod records;
pub mod remote;
pub mod sink;

pub use decoder::{
    decode_addr_to_domain, decode_domain_to_addr, decode_emitted_event, decode_record,
    decode_starknet_id_update, decode_transfer_event, decode_verifier_data, RawFelt,
};
pub use error::DecodeError;
pub use probe::{InterfaceProbe, ProbeStep, DEFAULT_CALL_TIMEOUT, ERC721_INTERFACE_ID};
pub use records::{
    AddrToDomainUpdate, DomainToAddrUpdate, Record, RecordKind, StarknetIdUpdate, TokenId,
    TransferEvent, UserDataUpdate, VerifierDataUpdate,
};
pub use remote::{JsonRpcRemote, RemoteCall};
pub use sink::{LogSink, RecordSink};
