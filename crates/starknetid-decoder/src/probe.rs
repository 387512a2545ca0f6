//! ERC721 interface probe.
//!
//! Classifies a contract by trial calls instead of trusting its ABI:
//!
//! 1. `supportsInterface(ERC721_INTERFACE_ID)` answering exactly `0x1`
//! 2. `tokenURI(token_id)` returning without error (the content is ignored)
//!
//! Steps run in order and stop at the first success. A failed step is logged
//! and swallowed; callers only ever see `true`/`false` or `Some`/`None`.
//! The probe never writes, so dropping an in-flight future abandons it cleanly.
//!
//! This is a heuristic. Contracts that support the interface without answering
//! either call are missed, and contracts that accept the `tokenURI` arguments
//! without implementing ERC721 are accepted.

use starknet::core::types::Felt;
use starknetid_common::{decode_string_response, unpack_uint256};
use std::time::Duration;
use thiserror::Error;

use crate::records::TokenId;
use crate::remote::RemoteCall;

/// ERC165 interface id of ERC721.
pub const ERC721_INTERFACE_ID: &str = "0x80ac58cd";

/// Upper bound for a single remote call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

const TRUE_RESPONSE: &str = "0x1";

/// One trial call of [`InterfaceProbe::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStep {
    SupportsInterface,
    TokenUri,
}

impl ProbeStep {
    pub const ORDER: [ProbeStep; 2] = [ProbeStep::SupportsInterface, ProbeStep::TokenUri];

    pub fn method(self) -> &'static str {
        match self {
            Self::SupportsInterface => "supportsInterface",
            Self::TokenUri => "tokenURI",
        }
    }
}

#[derive(Debug, Error)]
enum ProbeFailure {
    #[error("call failed: {0:#}")]
    Call(anyhow::Error),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected response {0:?}")]
    UnexpectedResponse(Vec<String>),
}

/// Trial-call classifier over an injected [`RemoteCall`].
pub struct InterfaceProbe<R> {
    remote: R,
    interface_id: String,
    timeout: Duration,
}

impl<R: RemoteCall> InterfaceProbe<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            interface_id: ERC721_INTERFACE_ID.to_string(),
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Interface id passed to `supportsInterface`.
    pub fn with_interface_id(mut self, interface_id: impl Into<String>) -> Self {
        self.interface_id = interface_id.into();
        self
    }

    /// Timeout applied to each call separately.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether `contract` looks like an ERC721 collection holding `token_id`.
    pub async fn classify(&self, contract: Felt, token_id: &TokenId) -> bool {
        for step in ProbeStep::ORDER {
            match self.run_step(step, contract, token_id).await {
                Ok(()) => {
                    tracing::debug!(
                        target: "starknetid_decoder::probe",
                        contract = %format!("{:#x}", contract),
                        method = step.method(),
                        "Probe step succeeded"
                    );
                    return true;
                }
                Err(failure) => {
                    tracing::debug!(
                        target: "starknetid_decoder::probe",
                        contract = %format!("{:#x}", contract),
                        method = step.method(),
                        error = %failure,
                        "Probe step failed"
                    );
                }
            }
        }
        false
    }

    /// The contract's `name()`, or `None` if the call or its decoding fails.
    pub async fn resolve_name(&self, contract: Felt) -> Option<String> {
        let response = match self.call(contract, "name", &[]).await {
            Ok(response) => response,
            Err(failure) => {
                tracing::debug!(
                    target: "starknetid_decoder::probe",
                    contract = %format!("{:#x}", contract),
                    error = %failure,
                    "Failed to fetch name"
                );
                return None;
            }
        };

        match decode_string_response(response.as_slice()) {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!(
                    target: "starknetid_decoder::probe",
                    contract = %format!("{:#x}", contract),
                    error = %e,
                    "Failed to decode name"
                );
                None
            }
        }
    }

    async fn run_step(
        &self,
        step: ProbeStep,
        contract: Felt,
        token_id: &TokenId,
    ) -> Result<(), ProbeFailure> {
        match step {
            ProbeStep::SupportsInterface => {
                let args = [self.interface_id.clone()];
                let response = self.call(contract, step.method(), &args).await?;
                if response.len() == 1 && response[0] == TRUE_RESPONSE {
                    Ok(())
                } else {
                    Err(ProbeFailure::UnexpectedResponse(response))
                }
            }
            ProbeStep::TokenUri => {
                let args = match token_id {
                    TokenId::Felt(id) => vec![format!("{id:#x}")],
                    TokenId::Uint256(id) => {
                        let (low, high) = unpack_uint256(*id);
                        vec![format!("{low:#x}"), format!("{high:#x}")]
                    }
                };
                self.call(contract, step.method(), &args).await.map(|_| ())
            }
        }
    }

    async fn call(
        &self,
        contract: Felt,
        method: &str,
        args: &[String],
    ) -> Result<Vec<String>, ProbeFailure> {
        match tokio::time::timeout(self.timeout, self.remote.call(contract, method, args)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(ProbeFailure::Call(e)),
            Err(_) => Err(ProbeFailure::Timeout(self.timeout)),
        }
    }
}
