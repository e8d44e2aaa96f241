//! Page-number pagination example
//!
//! This example demonstrates the checkpoint pattern for a REST API paginated
//! by page number: upsert every item of a page, advance the
//! `last_updated_at` cursor to the item's timestamp, and checkpoint at each
//! page boundary so an interrupted sync resumes from the right place. The
//! API is simulated in memory.
//!
//! Usage:
//!   cargo run --example page_number_source

use async_trait::async_trait;
use serde_json::{json, Value};
use tributary_connect_core::{
    ColumnType, ConnectorConfig, ConnectorResult, Operation, OperationSink, RecordingSink,
    SourceConnector, SyncState, TableSchema,
};

/// Cursor used when no state has been checkpointed yet
const INITIAL_CURSOR: &str = "0001-01-01T00:00:00Z";

/// Simulated page-number API: `page` is 1-based
struct PagedApi {
    pages: Vec<Vec<Value>>,
}

impl PagedApi {
    fn page(&self, page: usize) -> (Vec<Value>, usize) {
        let items = self.pages.get(page - 1).cloned().unwrap_or_default();
        (items, self.pages.len())
    }
}

/// Source connector paging through the simulated API
struct PageNumberSourceConnector {
    api: PagedApi,
}

#[async_trait]
impl SourceConnector for PageNumberSourceConnector {
    fn name(&self) -> &str {
        "page-number-source"
    }

    fn schema(&self, _config: &ConnectorConfig) -> ConnectorResult<Vec<TableSchema>> {
        Ok(vec![TableSchema::new("user")
            .with_primary_key(["id"])
            .with_column("id", ColumnType::String)
            .with_column("name", ColumnType::String)
            .with_column("updatedAt", ColumnType::UtcDatetime)])
    }

    async fn update(
        &mut self,
        _config: &ConnectorConfig,
        mut state: SyncState,
        sink: &mut dyn OperationSink,
    ) -> ConnectorResult<()> {
        let cursor = state
            .get("last_updated_at")
            .unwrap_or(INITIAL_CURSOR)
            .to_string();

        let mut page = 1;
        loop {
            let (items, total_pages) = self.api.page(page);
            if items.is_empty() {
                break;
            }

            println!("page {}: {} item(s)", page, items.len());

            for item in items {
                // RFC3339 timestamps compare correctly as strings
                let updated_at = item["updatedAt"].as_str().unwrap_or_default().to_string();
                if updated_at.as_str() <= cursor.as_str() {
                    continue;
                }

                sink.upsert("user", item)?;
                state.set("last_updated_at", updated_at);
            }

            // Checkpoint at every page boundary so an interrupted sync
            // resumes from the last full page.
            sink.checkpoint(&state)?;

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> ConnectorResult<()> {
    let api = PagedApi {
        pages: vec![
            vec![
                json!({"id": "u1", "name": "Mark Taylor", "updatedAt": "2024-09-22T19:35:41Z"}),
                json!({"id": "u2", "name": "Alan Taylor", "updatedAt": "2024-09-22T20:28:11Z"}),
            ],
            vec![
                json!({"id": "u3", "name": "Dana Reyes", "updatedAt": "2024-09-23T08:02:55Z"}),
            ],
        ],
    };

    let mut connector = PageNumberSourceConnector { api };
    let config = ConnectorConfig {
        connector_name: "page-number-source".to_string(),
        ..ConnectorConfig::default()
    };

    // Record operations in memory so the emitted sequence is visible
    let mut sink = RecordingSink::new();
    connector
        .update(&config, SyncState::new(), &mut sink)
        .await?;

    for operation in &sink.operations {
        match operation {
            Operation::Upsert { table, row } => {
                println!("upsert {} <- {}", table, row);
            }
            Operation::Checkpoint { state } => {
                println!(
                    "checkpoint last_updated_at={}",
                    state.get("last_updated_at").unwrap_or("<none>")
                );
            }
        }
    }

    Ok(())
}
