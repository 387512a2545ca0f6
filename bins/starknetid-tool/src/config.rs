//! Command line configuration

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use starknet::core::types::Felt;
use starknetid_decoder::{RecordKind, ERC721_INTERFACE_ID};
use std::time::Duration;

/// Where decoded records go.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum Output {
    /// Pretty-printed JSON on stdout
    #[default]
    Json,
    /// One `tracing` event per record
    Log,
}

/// Starknet ID toolbox
///
/// Decodes raw registry event data into typed records and probes contracts
/// for ERC721 behaviour.
///
/// # Examples
///
/// ```bash
/// # Decode a domain_to_addr_update carrying "ben.stark"
/// starknetid-tool decode --kind domain-to-addr 0x1 0x49ed 0x123
///
/// # Probe a contract with a uint256 token id
/// starknetid-tool probe --contract 0x05dbdedc... --token-id 0x1 --uint256
/// ```
#[derive(Parser, Debug)]
#[command(name = "starknetid-tool")]
#[command(about = "Decode Starknet ID registry events and probe NFT contracts", long_about = None)]
pub struct Config {
    /// Starknet RPC URL
    #[arg(
        long,
        global = true,
        env = "STARKNET_RPC_URL",
        default_value = "https://api.cartridge.gg/x/starknet/mainnet"
    )]
    pub rpc_url: String,

    /// Timeout for each remote call, in milliseconds
    #[arg(long, global = true, default_value = "10000")]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode raw event data (hex felts, in order) into a record
    Decode {
        /// Record layout: transfer, verifier-data, domain-to-addr, addr-to-domain,
        /// starknet-id-update (or the on-chain event name)
        #[arg(long)]
        kind: RecordKind,

        /// Output sink for the decoded record
        #[arg(long, value_enum, default_value = "json")]
        output: Output,

        /// Event data values
        values: Vec<String>,
    },
    /// Classify a contract as ERC721 and resolve its name
    Probe {
        /// Contract address
        #[arg(long)]
        contract: String,

        /// Token id used for the tokenURI trial call
        #[arg(long, default_value = "0x1")]
        token_id: String,

        /// Pass the token id as a (low, high) uint256
        #[arg(long)]
        uint256: bool,

        /// Interface id checked through supportsInterface
        #[arg(long, default_value = ERC721_INTERFACE_ID)]
        interface_id: String,
    },
}

impl Config {
    /// Parse a hex address string to Felt
    pub fn parse_address(addr: &str) -> Result<Felt> {
        Felt::from_hex(addr).map_err(|e| anyhow::anyhow!("Invalid address {addr}: {e}"))
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
