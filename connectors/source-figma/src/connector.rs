//! Figma Source Connector implementation
//!
//! Syncs the projects of a Figma team and the files within each project.
//! The files API has no server-side modification filter, so files not newer
//! than the `last_synced` cursor are skipped client-side.

use crate::api::{FigmaApi, HttpFigmaApi};
use crate::config::FigmaParams;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};
use tributary_connect_core::{
    ColumnType, ConnectorConfig, ConnectorResult, OperationSink, SourceConnector, SyncState,
    TableSchema,
};

const PROJECTS_TABLE: &str = "projects";
const FILES_TABLE: &str = "files";
const LAST_SYNCED_KEY: &str = "last_synced";

/// Figma source connector
pub struct FigmaSourceConnector<A> {
    api: A,
}

impl FigmaSourceConnector<HttpFigmaApi> {
    /// Create a connector backed by the real Figma API
    pub fn new() -> Self {
        Self::with_api(HttpFigmaApi::new())
    }
}

impl Default for FigmaSourceConnector<HttpFigmaApi> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: FigmaApi> FigmaSourceConnector<A> {
    /// Create a connector with a custom API implementation
    pub fn with_api(api: A) -> Self {
        Self { api }
    }
}

/// Parse an RFC3339 cursor, dropping the filter when the value is malformed
fn parse_cursor(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!(
                "Invalid {} cursor '{}': {}. Syncing without the modification filter.",
                LAST_SYNCED_KEY, raw, err
            );
            None
        }
    }
}

#[async_trait]
impl<A: FigmaApi> SourceConnector for FigmaSourceConnector<A> {
    fn name(&self) -> &str {
        "figma-source"
    }

    fn schema(&self, _config: &ConnectorConfig) -> ConnectorResult<Vec<TableSchema>> {
        Ok(vec![
            TableSchema::new(PROJECTS_TABLE)
                .with_primary_key(["id"])
                .with_column("id", ColumnType::String)
                .with_column("name", ColumnType::String),
            TableSchema::new(FILES_TABLE)
                .with_primary_key(["key"])
                .with_column("key", ColumnType::String)
                .with_column("name", ColumnType::String)
                .with_column("last_modified", ColumnType::UtcDatetime)
                .with_column("thumbnail_url", ColumnType::String)
                .with_column("version", ColumnType::String)
                .with_column("project_id", ColumnType::String),
        ])
    }

    async fn update(
        &mut self,
        config: &ConnectorConfig,
        mut state: SyncState,
        sink: &mut dyn OperationSink,
    ) -> ConnectorResult<()> {
        // Credentials are checked before any network call
        let params = FigmaParams::from_config(config)?;

        let last_synced = state.get(LAST_SYNCED_KEY).and_then(parse_cursor);

        info!("Fetching projects for team {}", params.team_id);
        let projects = self.api.team_projects(&params).await?;
        info!("Team has {} project(s)", projects.projects.len());

        for project in projects.projects {
            sink.upsert(
                PROJECTS_TABLE,
                json!({
                    "id": project.id,
                    "name": project.name,
                }),
            )?;

            let files = self.api.project_files(&params, &project.id).await?;

            for file in files.files {
                // Skip files not newer than the cursor; files without a
                // modification time are always emitted.
                if let (Some(cursor), Some(raw)) = (last_synced, file.last_modified.as_deref()) {
                    if let Ok(modified) = DateTime::parse_from_rfc3339(raw) {
                        if modified.with_timezone(&Utc) <= cursor {
                            continue;
                        }
                    }
                }

                sink.upsert(
                    FILES_TABLE,
                    json!({
                        "key": file.key,
                        "name": file.name,
                        "last_modified": file.last_modified,
                        "thumbnail_url": file.thumbnail_url,
                        "version": file.version,
                        "project_id": project.id,
                    }),
                )?;
            }
        }

        // Cursor at second precision, matching the API's timestamp format
        let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        state.set(LAST_SYNCED_KEY, now);
        sink.checkpoint(&state)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FileEntry, FilesResponse, MockFigmaApi, Project, ProjectsResponse};
    use tributary_connect_core::RecordingSink;

    fn config_with_credentials() -> ConnectorConfig {
        let mut config = ConnectorConfig::default();
        config
            .connector_config
            .insert("figma_api_token".to_string(), "figd_abc".to_string());
        config
            .connector_config
            .insert("team_id".to_string(), "123456".to_string());
        config
    }

    fn file(key: &str, last_modified: &str) -> FileEntry {
        FileEntry {
            key: key.to_string(),
            name: format!("{}-design", key),
            last_modified: Some(last_modified.to_string()),
            thumbnail_url: None,
            version: Some("1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_api_call() {
        let mut api = MockFigmaApi::new();
        api.expect_team_projects().times(0);
        api.expect_project_files().times(0);

        let mut connector = FigmaSourceConnector::with_api(api);
        let mut sink = RecordingSink::new();

        let err = connector
            .update(&ConnectorConfig::default(), SyncState::new(), &mut sink)
            .await
            .unwrap_err();

        assert!(err.is_config());
        assert!(sink.operations.is_empty());
    }

    #[tokio::test]
    async fn test_files_at_or_before_cursor_are_skipped() {
        let mut api = MockFigmaApi::new();
        api.expect_team_projects().times(1).returning(|_| {
            Ok(ProjectsResponse {
                projects: vec![Project {
                    id: "101".to_string(),
                    name: "Website".to_string(),
                }],
            })
        });
        api.expect_project_files()
            .times(1)
            .withf(|_, project_id| project_id == "101")
            .returning(|_, _| {
                Ok(FilesResponse {
                    files: vec![
                        file("older", "2024-04-30T00:00:00Z"),
                        file("boundary", "2024-05-01T12:00:00Z"),
                        file("newer", "2024-05-02T08:30:00Z"),
                    ],
                })
            });

        let mut connector = FigmaSourceConnector::with_api(api);
        let mut state = SyncState::new();
        state.set("last_synced", "2024-05-01T12:00:00Z");

        let mut sink = RecordingSink::new();
        connector
            .update(&config_with_credentials(), state, &mut sink)
            .await
            .unwrap();

        let file_rows: Vec<_> = sink
            .upserts()
            .into_iter()
            .filter(|(table, _)| *table == FILES_TABLE)
            .collect();

        // Modification times at or before the cursor are filtered out
        assert_eq!(file_rows.len(), 1);
        assert_eq!(file_rows[0].1["key"], "newer");
        assert_eq!(file_rows[0].1["project_id"], "101");
    }

    #[tokio::test]
    async fn test_full_sync_emits_all_records_and_one_checkpoint() {
        let mut api = MockFigmaApi::new();
        api.expect_team_projects().times(1).returning(|_| {
            Ok(ProjectsResponse {
                projects: vec![
                    Project {
                        id: "101".to_string(),
                        name: "Website".to_string(),
                    },
                    Project {
                        id: "102".to_string(),
                        name: "Mobile App".to_string(),
                    },
                ],
            })
        });
        api.expect_project_files().times(2).returning(|_, project_id| {
            Ok(FilesResponse {
                files: vec![file(
                    &format!("file-{}", project_id),
                    "2024-05-02T08:30:00Z",
                )],
            })
        });

        let mut connector = FigmaSourceConnector::with_api(api);
        let mut sink = RecordingSink::new();
        connector
            .update(&config_with_credentials(), SyncState::new(), &mut sink)
            .await
            .unwrap();

        // Every record carries a non-empty primary key
        for (table, row) in sink.upserts() {
            let key_column = if table == PROJECTS_TABLE { "id" } else { "key" };
            let key = row[key_column].as_str().unwrap();
            assert!(!key.is_empty());
        }

        assert_eq!(sink.upserts().len(), 4); // 2 projects + 2 files

        // Exactly one checkpoint, carrying the advanced cursor
        let checkpoints = sink.checkpoints();
        assert_eq!(checkpoints.len(), 1);
        let cursor = checkpoints[0].get("last_synced").unwrap();
        assert!(DateTime::parse_from_rfc3339(cursor).is_ok());
    }

    #[tokio::test]
    async fn test_malformed_cursor_disables_filter() {
        let mut api = MockFigmaApi::new();
        api.expect_team_projects().times(1).returning(|_| {
            Ok(ProjectsResponse {
                projects: vec![Project {
                    id: "101".to_string(),
                    name: "Website".to_string(),
                }],
            })
        });
        api.expect_project_files().times(1).returning(|_, _| {
            Ok(FilesResponse {
                files: vec![file("any", "2020-01-01T00:00:00Z")],
            })
        });

        let mut connector = FigmaSourceConnector::with_api(api);
        let mut state = SyncState::new();
        state.set("last_synced", "not-a-timestamp");

        let mut sink = RecordingSink::new();
        connector
            .update(&config_with_credentials(), state, &mut sink)
            .await
            .unwrap();

        // With the filter dropped, even old files are emitted
        let file_rows: Vec<_> = sink
            .upserts()
            .into_iter()
            .filter(|(table, _)| *table == FILES_TABLE)
            .collect();
        assert_eq!(file_rows.len(), 1);
    }

    #[test]
    fn test_schema_declares_primary_keys() {
        let connector = FigmaSourceConnector::with_api(MockFigmaApi::new());
        let tables = connector.schema(&ConnectorConfig::default()).unwrap();

        assert_eq!(tables.len(), 2);
        for table in &tables {
            table.validate().unwrap();
        }
        assert_eq!(tables[0].primary_key, vec!["id"]);
        assert_eq!(tables[1].primary_key, vec!["key"]);
    }
}
