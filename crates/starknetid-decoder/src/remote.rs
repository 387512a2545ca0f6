//! Remote contract calls.
//!
//! [`RemoteCall`] is the only way the probe reaches a chain, so it can be
//! driven by a fake in tests. Arguments and results are `0x` hex words.

use anyhow::{Context, Result};
use async_trait::async_trait;
use starknet::core::types::{BlockId, BlockTag, Felt, FunctionCall};
use starknet::core::utils::get_selector_from_name;
use starknet::providers::jsonrpc::{HttpTransport, JsonRpcClient};
use starknet::providers::Provider;
use starknetid_common::hex_to_felt;
use std::sync::Arc;
use url::Url;

/// Read-only call into a deployed contract.
#[async_trait]
pub trait RemoteCall: Send + Sync {
    async fn call(&self, contract: Felt, method: &str, args: &[String]) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: RemoteCall + ?Sized> RemoteCall for &T {
    async fn call(&self, contract: Felt, method: &str, args: &[String]) -> Result<Vec<String>> {
        (**self).call(contract, method, args).await
    }
}

#[async_trait]
impl<T: RemoteCall + ?Sized> RemoteCall for Arc<T> {
    async fn call(&self, contract: Felt, method: &str, args: &[String]) -> Result<Vec<String>> {
        (**self).call(contract, method, args).await
    }
}

/// `starknet_call` over JSON-RPC.
pub struct JsonRpcRemote {
    provider: Arc<JsonRpcClient<HttpTransport>>,
    block_id: BlockId,
}

impl JsonRpcRemote {
    /// Calls are made against the latest block.
    pub fn new(provider: Arc<JsonRpcClient<HttpTransport>>) -> Self {
        Self {
            provider,
            block_id: BlockId::Tag(BlockTag::Latest),
        }
    }

    pub fn from_url(url: Url) -> Self {
        Self::new(Arc::new(JsonRpcClient::new(HttpTransport::new(url))))
    }
}

#[async_trait]
impl RemoteCall for JsonRpcRemote {
    async fn call(&self, contract: Felt, method: &str, args: &[String]) -> Result<Vec<String>> {
        let entry_point_selector = get_selector_from_name(method)
            .map_err(|_| anyhow::anyhow!("Invalid entry point name {method:?}"))?;
        let calldata = args
            .iter()
            .map(|arg| hex_to_felt(arg))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid calldata")?;

        let call = FunctionCall {
            contract_address: contract,
            entry_point_selector,
            calldata,
        };

        let result = self
            .provider
            .call(call, &self.block_id)
            .await
            .with_context(|| format!("starknet_call {method} on {contract:#x} failed"))?;

        Ok(result.iter().map(|felt| format!("{felt:#x}")).collect())
    }
}
