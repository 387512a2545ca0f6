//! Starknet ID toolbox
//!
//! - `decode`: turn raw registry event data into a typed record
//! - `probe`: classify a contract as ERC721 by trial calls and resolve its name
//!
//! # Usage
//!
//! ```bash
//! starknetid-tool decode --kind starknet-id-update 0x1 0x49ed 0x9 0x0 0x6553f100
//! RUST_LOG=debug starknetid-tool probe --contract 0x05dbdedc... --token-id 0x1 --uint256
//! ```

mod config;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use config::{Command, Config, Output};
use starknetid_common::{felt_to_uint256, hex_to_felt};
use starknetid_decoder::{
    decode_record, InterfaceProbe, JsonRpcRemote, LogSink, Record, RecordKind, RecordSink,
    TokenId,
};
use url::Url;

/// Prints records as pretty JSON on stdout.
struct StdoutSink;

#[async_trait]
impl RecordSink for StdoutSink {
    async fn store(&self, record: &Record) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(record)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let config = Config::parse();
    match &config.command {
        Command::Decode {
            kind,
            output,
            values,
        } => run_decode(*kind, *output, values).await,
        Command::Probe {
            contract,
            token_id,
            uint256,
            interface_id,
        } => {
            let contract = Config::parse_address(contract)?;
            let token_id = parse_token_id(token_id, *uint256)?;
            run_probe(&config, contract, token_id, interface_id).await
        }
    }
}

async fn run_decode(kind: RecordKind, output: Output, values: &[String]) -> Result<()> {
    let sink: Box<dyn RecordSink> = match output {
        Output::Json => Box::new(StdoutSink),
        Output::Log => Box::new(LogSink),
    };

    let record = decode_record(kind, values)
        .with_context(|| format!("Failed to decode {kind} from {} values", values.len()))?;

    match record {
        Some(record) => sink.store(&record).await,
        None => {
            tracing::warn!(
                target: "starknetid_tool",
                kind = %kind,
                values = values.len(),
                "Unrecognized layout, nothing to store"
            );
            Ok(())
        }
    }
}

async fn run_probe(
    config: &Config,
    contract: starknet::core::types::Felt,
    token_id: TokenId,
    interface_id: &str,
) -> Result<()> {
    let url = Url::parse(&config.rpc_url).context("Invalid RPC URL")?;
    tracing::info!(
        target: "starknetid_tool",
        rpc_url = %config.rpc_url,
        contract = %format!("{:#x}", contract),
        token_id = %token_id,
        "Probing contract"
    );

    let probe = InterfaceProbe::new(JsonRpcRemote::from_url(url))
        .with_interface_id(interface_id)
        .with_timeout(config.call_timeout());

    let is_erc721 = probe.classify(contract, &token_id).await;
    let name = probe.resolve_name(contract).await;

    let report = serde_json::json!({
        "contract": format!("{:#x}", contract),
        "erc721": is_erc721,
        "name": name,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_token_id(value: &str, uint256: bool) -> Result<TokenId> {
    let felt = hex_to_felt(value).with_context(|| format!("Invalid token id {value}"))?;
    Ok(if uint256 {
        TokenId::Uint256(felt_to_uint256(felt))
    } else {
        TokenId::Felt(felt)
    })
}
