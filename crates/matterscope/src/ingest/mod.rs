//! Telemetry ingest sources.
//!
//! Sources register a factory in the distributed slice below; each factory
//! inspects the config and may decline to start. The daemon spawns every
//! source that opts in and keeps running even when one of them fails.

use std::sync::Arc;

use async_trait::async_trait;
use linkme::distributed_slice;
use tokio::task::JoinHandle;
use tracing::error;
use tracing::warn;

use crate::config::Config;
use crate::store::DeviceStore;

#[cfg(feature = "ingest_mqtt")]
pub mod mqtt;

pub struct IngestContext<'a> {
    pub config: &'a Config,
    pub store: Arc<DeviceStore>,
}

/// Result type for ingest source factory functions
pub type IngestFactoryResult = anyhow::Result<Option<Box<dyn IngestSource>>>;

#[distributed_slice]
pub static REGISTRY: [fn(&IngestContext) -> IngestFactoryResult];

/// A telemetry source feeding device snapshots into the store.
#[async_trait]
pub trait IngestSource: Send + Sync {
    /// Get the name/identifier of this source
    fn name(&self) -> &str;

    /// Run until the source is exhausted or the task is aborted.
    async fn run(self: Box<Self>) -> anyhow::Result<()>;
}

/// Start every registered ingest source the config enables.
///
/// A factory or run-loop failure is logged and skipped; one broken source
/// never takes the daemon down.
pub fn spawn_sources_from_config(ctx: &IngestContext<'_>) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();
    for constructor in REGISTRY {
        let source = match constructor(ctx) {
            Ok(Some(source)) => source,
            Ok(None) => continue,
            Err(e) => {
                error!("failed to set up ingest source: {:#}", e);
                continue;
            }
        };
        let name = source.name().to_string();
        handles.push(tokio::spawn(async move {
            if let Err(e) = source.run().await {
                warn!("ingest source '{}' stopped: {:#}", name, e);
            }
        }));
    }
    handles
}
