//! Figma REST API client.
//!
//! Two endpoints are used: team projects and per-project file listings.
//! Neither is paginated by the API, so each call returns a single page.

use crate::config::FigmaParams;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;
use tributary_connect_core::{ConnectorError, ConnectorResult};

/// A project belonging to the configured team
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Response of `GET /teams/{team_id}/projects`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A file within a project
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub key: String,
    pub name: String,
    pub last_modified: Option<String>,
    pub thumbnail_url: Option<String>,
    pub version: Option<String>,
}

/// Response of `GET /projects/{project_id}/files`
#[derive(Debug, Clone, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Figma API surface used by the connector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FigmaApi: Send + Sync {
    /// List the projects of the configured team
    async fn team_projects(&self, params: &FigmaParams) -> ConnectorResult<ProjectsResponse>;

    /// List the files of one project
    async fn project_files(
        &self,
        params: &FigmaParams,
        project_id: &str,
    ) -> ConnectorResult<FilesResponse>;
}

/// `reqwest`-backed Figma API client
///
/// Authentication uses the `X-Figma-Token` header. Non-2xx responses abort
/// the sync pass; there is no local retry.
pub struct HttpFigmaApi {
    client: reqwest::Client,
}

impl HttpFigmaApi {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        params: &FigmaParams,
        url: String,
    ) -> ConnectorResult<T> {
        info!("Fetching {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("X-Figma-Token", &params.api_token);

        if let Some(secs) = params.request_timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConnectorError::transport_with_source(format!("GET {} failed", url), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Http {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ConnectorError::Serialization(e.to_string()))
    }
}

impl Default for HttpFigmaApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FigmaApi for HttpFigmaApi {
    async fn team_projects(&self, params: &FigmaParams) -> ConnectorResult<ProjectsResponse> {
        let url = format!("{}/teams/{}/projects", params.base_url, params.team_id);
        self.get_json(params, url).await
    }

    async fn project_files(
        &self,
        params: &FigmaParams,
        project_id: &str,
    ) -> ConnectorResult<FilesResponse> {
        let url = format!("{}/projects/{}/files", params.base_url, project_id);
        self.get_json(params, url).await
    }
}
