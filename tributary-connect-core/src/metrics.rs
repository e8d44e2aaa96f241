//! Connector metrics.
//!
//! Thin wrapper over the `metrics` facade. Counters are labelled with the
//! connector name so several connectors can share one exporter.

use metrics::{counter, gauge};

/// Metrics recorded by the runtime and sinks for one connector
#[derive(Debug, Clone)]
pub struct ConnectorMetrics {
    connector_name: String,
}

impl ConnectorMetrics {
    pub fn new(connector_name: &str) -> Self {
        Self {
            connector_name: connector_name.to_string(),
        }
    }

    /// Record one emitted upsert
    pub fn record_upsert(&self, table: &str) {
        counter!(
            "tributary_upserts_total",
            "connector" => self.connector_name.clone(),
            "table" => table.to_string()
        )
        .increment(1);
    }

    /// Record one emitted checkpoint
    pub fn record_checkpoint(&self) {
        counter!(
            "tributary_checkpoints_total",
            "connector" => self.connector_name.clone()
        )
        .increment(1);
    }

    /// Record a failed sync pass
    pub fn record_error(&self, kind: &str) {
        counter!(
            "tributary_errors_total",
            "connector" => self.connector_name.clone(),
            "kind" => kind.to_string()
        )
        .increment(1);
    }

    /// Set connector health status
    pub fn set_health(&self, healthy: bool) {
        gauge!(
            "tributary_connector_health",
            "connector" => self.connector_name.clone()
        )
        .set(if healthy { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_noop_without_recorder() {
        // Without an installed recorder the facade is a no-op; recording
        // must not panic.
        let metrics = ConnectorMetrics::new("test-connector");
        metrics.record_upsert("events");
        metrics.record_checkpoint();
        metrics.record_error("Transport");
        metrics.set_health(true);
    }
}
