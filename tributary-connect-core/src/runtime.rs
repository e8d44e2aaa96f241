//! Runtime for driving one connector sync pass.
//!
//! The runtime handles:
//! - Configuration validation
//! - Logging initialization
//! - Loading prior checkpoint state
//! - Schema validation and logging
//! - Driving the update pass with a file-backed operation sink

mod file_sink;

pub use file_sink::FileSink;

use crate::{ConnectorConfig, ConnectorMetrics, ConnectorResult, SourceConnector, SyncState};
use std::sync::Arc;
use tracing::{error, info};

/// Runtime for source connectors (External API → destination files)
///
/// One `run()` equals one incremental sync pass: the host scheduler decides
/// when the next pass happens, so there is no polling loop here. Records are
/// appended under the configured destination directory and the cursor state
/// file is replaced at every checkpoint.
pub struct ConnectorRuntime<C: SourceConnector> {
    connector: C,
    config: ConnectorConfig,
    metrics: Arc<ConnectorMetrics>,
}

impl<C: SourceConnector> ConnectorRuntime<C> {
    /// Create a new runtime
    pub fn new(connector: C, config: ConnectorConfig) -> ConnectorResult<Self> {
        // Validate configuration
        config.validate()?;

        // Initialize tracing
        Self::init_tracing(&config);

        info!("Initializing Connector Runtime");
        info!("Connector: {}", config.connector_name);
        info!("State path: {}", config.state_path);
        info!("Destination: {}", config.destination_dir);

        let metrics = Arc::new(ConnectorMetrics::new(&config.connector_name));

        Ok(Self {
            connector,
            config,
            metrics,
        })
    }

    /// Initialize tracing/logging
    fn init_tracing(config: &ConnectorConfig) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .ok(); // Ignore if already initialized
    }

    /// Run one sync pass
    pub async fn run(&mut self) -> ConnectorResult<()> {
        info!("Starting sync pass for {}", self.connector.name());

        // 1. Declare and validate the schema
        let tables = self.connector.schema(&self.config)?;
        for table in &tables {
            table.validate()?;
            info!(
                "Table '{}' (primary key: {}) with {} column(s)",
                table.name,
                table.primary_key.join(", "),
                table.columns.len()
            );
        }

        // 2. Load prior state
        let state = SyncState::load(&self.config.state_path)?;
        if state.is_empty() {
            info!("No prior state found, starting initial sync");
        } else {
            info!("Resuming from prior state ({} cursor entries)", state.len());
        }

        // 3. Drive the update pass
        let mut sink = FileSink::new(
            &self.config.destination_dir,
            &self.config.state_path,
            self.metrics.clone(),
        )?;

        self.metrics.set_health(true);

        let result = self.connector.update(&self.config, state, &mut sink).await;

        match &result {
            Ok(()) => {
                sink.flush()?;
                info!(
                    "Sync pass finished: {} upsert(s), {} checkpoint(s)",
                    sink.upserts(),
                    sink.checkpoints()
                );
            }
            Err(e) => {
                error!("Sync pass failed: {}", e);
                self.metrics.record_error(e.kind());
                self.metrics.set_health(false);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnType, ConnectorError, OperationSink, TableSchema};
    use async_trait::async_trait;
    use serde_json::json;

    /// Connector emitting a fixed set of operations
    struct FixedConnector {
        fail: bool,
    }

    #[async_trait]
    impl SourceConnector for FixedConnector {
        fn name(&self) -> &str {
            "fixed-source"
        }

        fn schema(&self, _config: &ConnectorConfig) -> ConnectorResult<Vec<TableSchema>> {
            Ok(vec![TableSchema::new("items")
                .with_primary_key(["id"])
                .with_column("id", ColumnType::String)
                .with_column("name", ColumnType::String)])
        }

        async fn update(
            &mut self,
            _config: &ConnectorConfig,
            mut state: SyncState,
            sink: &mut dyn OperationSink,
        ) -> ConnectorResult<()> {
            if self.fail {
                return Err(ConnectorError::transport("connection refused"));
            }

            sink.upsert("items", json!({"id": "1", "name": "first"}))?;
            sink.upsert("items", json!({"id": "2", "name": "second"}))?;
            state.set("last_id", "2");
            sink.checkpoint(&state)?;
            Ok(())
        }
    }

    fn test_config(dir: &std::path::Path) -> ConnectorConfig {
        ConnectorConfig {
            connector_name: "fixed-source".to_string(),
            state_path: dir.join("state.json").to_string_lossy().into_owned(),
            destination_dir: dir.join("destination").to_string_lossy().into_owned(),
            ..ConnectorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_run_writes_records_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let mut runtime = ConnectorRuntime::new(FixedConnector { fail: false }, config).unwrap();
        runtime.run().await.unwrap();

        let records =
            std::fs::read_to_string(dir.path().join("destination/items.jsonl")).unwrap();
        assert_eq!(records.lines().count(), 2);

        let state = SyncState::load(dir.path().join("state.json")).unwrap();
        assert_eq!(state.get("last_id"), Some("2"));
    }

    #[tokio::test]
    async fn test_run_propagates_update_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let mut runtime = ConnectorRuntime::new(FixedConnector { fail: true }, config).unwrap();
        let err = runtime.run().await.unwrap_err();
        assert!(matches!(err, ConnectorError::Transport { .. }));

        // Nothing was checkpointed
        assert!(!dir.path().join("state.json").exists());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ConnectorConfig {
            connector_name: "".to_string(),
            ..ConnectorConfig::default()
        };
        assert!(ConnectorRuntime::new(FixedConnector { fail: false }, config).is_err());
    }
}
