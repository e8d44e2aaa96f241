//! Incremental sync state.
//!
//! A connector checkpoints a small string-keyed cursor map (last-synced
//! timestamp or last-seen event identifier). The map is opaque to the host:
//! it is persisted verbatim at checkpoint time and handed back unchanged on
//! the next run, so a restart resumes after the last emitted record.

use crate::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// String-keyed cursor state, round-tripped between runs as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState(BTreeMap<String, String>);

impl SyncState {
    /// Create an empty state (first sync or full re-sync)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cursor value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set a cursor value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// True when no cursor has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of cursor entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Load state from a JSON file
    ///
    /// A missing file is not an error: it means this is the first sync and an
    /// empty state is returned.
    pub fn load(path: impl AsRef<Path>) -> ConnectorResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConnectorError::state_with_source(
                format!("Failed to read state file {}", path.display()),
                e,
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ConnectorError::state_with_source(
                format!("Failed to parse state file {}", path.display()),
                e,
            )
        })
    }

    /// Durably save state to a JSON file (write to a temp file, then rename)
    pub fn save(&self, path: impl AsRef<Path>) -> ConnectorResult<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, content).map_err(|e| {
            ConnectorError::state_with_source(
                format!("Failed to write state file {}", tmp_path.display()),
                e,
            )
        })?;

        std::fs::rename(&tmp_path, path).map_err(|e| {
            ConnectorError::state_with_source(
                format!("Failed to replace state file {}", path.display()),
                e,
            )
        })
    }
}

impl FromIterator<(String, String)> for SyncState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
