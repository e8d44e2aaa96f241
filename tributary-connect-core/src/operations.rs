//! Emitted sync operations.
//!
//! An update pass produces a sequence of two operations: `upsert` (one flat
//! record keyed by the table's primary key) and `checkpoint` (a durable save
//! of the cursor state). The host consumes them in emission order, which
//! gives at-least-once delivery with idempotent upserts.

use crate::{ConnectorError, ConnectorResult, SyncState};
use serde_json::Value;

/// One operation emitted by an update pass
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert-or-update one record into a table
    Upsert { table: String, row: Value },
    /// Durably save the incremental cursor state
    Checkpoint { state: SyncState },
}

/// Consumer of the operations emitted by an update pass
///
/// The production implementation writes records to the destination and
/// persists state; tests use [`RecordingSink`].
pub trait OperationSink: Send {
    /// Emit one record for a table
    fn upsert(&mut self, table: &str, row: Value) -> ConnectorResult<()>;

    /// Persist the current cursor state
    fn checkpoint(&mut self, state: &SyncState) -> ConnectorResult<()>;
}

/// Validate that an upserted row is a flat JSON object
///
/// Shared by sink implementations; rows must be objects so each column maps
/// to a value.
pub(crate) fn ensure_row_object<'a>(
    table: &str,
    row: &'a Value,
) -> ConnectorResult<&'a serde_json::Map<String, Value>> {
    row.as_object().ok_or_else(|| {
        ConnectorError::InvalidData(format!(
            "row upserted into table '{}' is not a JSON object",
            table
        ))
    })
}

/// Sink that records operations in memory
///
/// Used by connector tests and examples to assert on the exact sequence of
/// emitted operations.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub operations: Vec<Operation>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded upserts as (table, row) pairs, in emission order
    pub fn upserts(&self) -> Vec<(&str, &Value)> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Upsert { table, row } => Some((table.as_str(), row)),
                Operation::Checkpoint { .. } => None,
            })
            .collect()
    }

    /// All recorded checkpoints, in emission order
    pub fn checkpoints(&self) -> Vec<&SyncState> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Checkpoint { state } => Some(state),
                Operation::Upsert { .. } => None,
            })
            .collect()
    }

    /// The most recent checkpoint, if any
    pub fn last_checkpoint(&self) -> Option<&SyncState> {
        self.checkpoints().pop()
    }
}

impl OperationSink for RecordingSink {
    fn upsert(&mut self, table: &str, row: Value) -> ConnectorResult<()> {
        ensure_row_object(table, &row)?;
        self.operations.push(Operation::Upsert {
            table: table.to_string(),
            row,
        });
        Ok(())
    }

    fn checkpoint(&mut self, state: &SyncState) -> ConnectorResult<()> {
        self.operations.push(Operation::Checkpoint {
            state: state.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_sink_order() {
        let mut sink = RecordingSink::new();
        sink.upsert("events", json!({"id": "evt_1"})).unwrap();
        sink.upsert("events", json!({"id": "evt_2"})).unwrap();

        let mut state = SyncState::new();
        state.set("last_event_id", "evt_2");
        sink.checkpoint(&state).unwrap();

        assert_eq!(sink.operations.len(), 3);
        assert_eq!(sink.upserts().len(), 2);
        assert_eq!(sink.upserts()[1].1["id"], "evt_2");
        assert_eq!(
            sink.last_checkpoint().unwrap().get("last_event_id"),
            Some("evt_2")
        );
    }

    #[test]
    fn test_non_object_row_rejected() {
        let mut sink = RecordingSink::new();
        let err = sink.upsert("events", json!("not a record")).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidData(_)));
        assert!(sink.operations.is_empty());
    }
}
