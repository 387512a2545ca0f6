//! Record sinks.
//!
//! The decoder does not persist anything itself. Whatever stores records
//! (and tracks which version is current) implements [`RecordSink`].

use anyhow::Result;
use async_trait::async_trait;

use crate::records::Record;

#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn store(&self, record: &Record) -> Result<()>;
}

/// Emits every record as a JSON line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl RecordSink for LogSink {
    async fn store(&self, record: &Record) -> Result<()> {
        let json = serde_json::to_string(record)?;
        tracing::info!(
            target: "starknetid_decoder::sink",
            kind = %record.kind(),
            key = %record.key(),
            record = %json,
            "Decoded record"
        );
        Ok(())
    }
}
