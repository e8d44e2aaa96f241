//! File-backed operation sink used by the runtime.
//!
//! Upserted records are appended as JSON lines to one file per table under
//! the destination directory; every checkpoint durably replaces the state
//! file. Restarting after a crash therefore replays at most the records
//! emitted since the last checkpoint, and idempotent upserts absorb the
//! duplicates.

use crate::operations::ensure_row_object;
use crate::{ConnectorError, ConnectorMetrics, ConnectorResult, OperationSink, SyncState};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Operation sink writing records as per-table JSONL files
pub struct FileSink {
    destination_dir: PathBuf,
    state_path: PathBuf,
    writers: HashMap<String, BufWriter<File>>,
    upserts: u64,
    checkpoints: u64,
    metrics: Arc<ConnectorMetrics>,
}

impl FileSink {
    /// Create a sink writing under `destination_dir` and checkpointing to
    /// `state_path`
    pub fn new(
        destination_dir: impl Into<PathBuf>,
        state_path: impl Into<PathBuf>,
        metrics: Arc<ConnectorMetrics>,
    ) -> ConnectorResult<Self> {
        let destination_dir = destination_dir.into();

        std::fs::create_dir_all(&destination_dir).map_err(|e| {
            ConnectorError::state_with_source(
                format!(
                    "Failed to create destination directory {}",
                    destination_dir.display()
                ),
                e,
            )
        })?;

        Ok(Self {
            destination_dir,
            state_path: state_path.into(),
            writers: HashMap::new(),
            upserts: 0,
            checkpoints: 0,
            metrics,
        })
    }

    /// Records written so far
    pub fn upserts(&self) -> u64 {
        self.upserts
    }

    /// Checkpoints persisted so far
    pub fn checkpoints(&self) -> u64 {
        self.checkpoints
    }

    /// Flush all table writers
    pub fn flush(&mut self) -> ConnectorResult<()> {
        for (table, writer) in &mut self.writers {
            writer.flush().map_err(|e| {
                ConnectorError::state_with_source(
                    format!("Failed to flush records for table '{}'", table),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn writer_for(&mut self, table: &str) -> ConnectorResult<&mut BufWriter<File>> {
        if !self.writers.contains_key(table) {
            let path = self.destination_dir.join(format!("{}.jsonl", table));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    ConnectorError::state_with_source(
                        format!("Failed to open destination file {}", path.display()),
                        e,
                    )
                })?;
            debug!(table, path = %path.display(), "opened destination file");
            self.writers
                .insert(table.to_string(), BufWriter::new(file));
        }

        Ok(self.writers.get_mut(table).expect("writer just inserted"))
    }
}

impl OperationSink for FileSink {
    fn upsert(&mut self, table: &str, row: Value) -> ConnectorResult<()> {
        if table.is_empty() || table.contains(['/', '\\']) {
            return Err(ConnectorError::InvalidData(format!(
                "invalid table name '{}'",
                table
            )));
        }
        ensure_row_object(table, &row)?;

        let line = serde_json::to_string(&row)?;
        let writer = self.writer_for(table)?;
        writeln!(writer, "{}", line).map_err(|e| {
            ConnectorError::state_with_source(
                format!("Failed to write record to table '{}'", table),
                e,
            )
        })?;

        self.upserts += 1;
        self.metrics.record_upsert(table);
        Ok(())
    }

    fn checkpoint(&mut self, state: &SyncState) -> ConnectorResult<()> {
        // Records emitted before this checkpoint must be on disk before the
        // cursor advances.
        self.flush()?;
        state.save(&self.state_path)?;

        self.checkpoints += 1;
        self.metrics.record_checkpoint();
        debug!(checkpoints = self.checkpoints, "state checkpointed");
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
