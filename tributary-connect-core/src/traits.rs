//! Connector trait.

use crate::{ConnectorConfig, ConnectorResult, OperationSink, SyncState, TableSchema};
use async_trait::async_trait;

/// A source connector: reads from an external API and emits operations
///
/// The runtime invokes `schema` once to learn the delivered tables, then
/// drives one incremental sync pass through `update`. A pass reads the prior
/// cursor state, issues its API calls sequentially, emits one upsert per
/// record in API response order, and checkpoints the advanced cursor so a
/// restart resumes after the last successfully emitted record.
#[async_trait]
pub trait SourceConnector: Send {
    /// Connector name, used for logging and metrics
    fn name(&self) -> &str;

    /// Declare the tables this connector delivers
    ///
    /// Pure function of configuration; no side effects.
    fn schema(&self, config: &ConnectorConfig) -> ConnectorResult<Vec<TableSchema>>;

    /// Run one incremental sync pass
    ///
    /// Configuration errors must be raised before any network call. HTTP and
    /// transport errors abort the pass and propagate; the host decides
    /// whether to fail or reschedule the run.
    async fn update(
        &mut self,
        config: &ConnectorConfig,
        state: SyncState,
        sink: &mut dyn OperationSink,
    ) -> ConnectorResult<()>;
}
