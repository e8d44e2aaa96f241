//! # Tributary Connect Core
//!
//! Core SDK for building Tributary ingestion connectors.
//!
//! This library provides the foundational framework for connectors that read
//! from external REST APIs and forward records to a managed ingestion host.
//! It handles configuration, checkpoint state, schema declarations, and the
//! run lifecycle, allowing connector developers to focus solely on the
//! request/transform/emit logic.
//!
//! ## Overview
//!
//! A connector implements two callbacks:
//! - **schema**: declare the delivered tables (name, primary key, columns)
//! - **update**: drive one incremental sync pass, emitting `upsert` and
//!   `checkpoint` operations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tributary_connect_core::{
//!     ColumnType, ConnectorConfig, ConnectorResult, OperationSink, SourceConnector,
//!     SyncState, TableSchema,
//! };
//! use async_trait::async_trait;
//! use serde_json::json;
//!
//! pub struct MyConnector;
//!
//! #[async_trait]
//! impl SourceConnector for MyConnector {
//!     fn name(&self) -> &str {
//!         "my-source"
//!     }
//!
//!     fn schema(&self, _config: &ConnectorConfig) -> ConnectorResult<Vec<TableSchema>> {
//!         Ok(vec![TableSchema::new("items")
//!             .with_primary_key(["id"])
//!             .with_column("id", ColumnType::String)])
//!     }
//!
//!     async fn update(
//!         &mut self,
//!         _config: &ConnectorConfig,
//!         mut state: SyncState,
//!         sink: &mut dyn OperationSink,
//!     ) -> ConnectorResult<()> {
//!         sink.upsert("items", json!({"id": "1"}))?;
//!         state.set("last_id", "1");
//!         sink.checkpoint(&state)
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Run Lifecycle**: the runtime validates configuration, loads prior
//!   state, and drives exactly one sync pass per run
//! - **Resumable Sync**: every checkpoint durably replaces the state file,
//!   so a restart resumes after the last emitted record
//! - **Observability**: structured logging via `tracing` and counters via
//!   the `metrics` facade
//! - **Configuration**: standard TOML file and environment variable loading

mod config;
mod error;
mod metrics;
mod operations;
mod runtime;
mod schema;
mod state;
mod traits;

// Re-export public API
pub use config::ConnectorConfig;
pub use error::{ConnectorError, ConnectorResult};
pub use metrics::ConnectorMetrics;
pub use operations::{Operation, OperationSink, RecordingSink};
pub use runtime::{ConnectorRuntime, FileSink};
pub use schema::{ColumnType, TableSchema};
pub use state::SyncState;
pub use traits::SourceConnector;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
