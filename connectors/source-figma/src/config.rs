//! Configuration for the Figma Source Connector

use tributary_connect_core::{ConnectorConfig, ConnectorError, ConnectorResult};

const DEFAULT_BASE_URL: &str = "https://api.figma.com/v1";

/// Settings resolved from the connector configuration map
///
/// Recognized keys:
/// - `figma_api_token`: required, Figma personal access token
/// - `team_id`: required, team whose projects are synced
/// - `figma_base_url`: optional API base URL override (used in tests)
/// - `request_timeout_secs`: optional per-request timeout
#[derive(Debug, Clone)]
pub struct FigmaParams {
    pub api_token: String,
    pub team_id: String,
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl FigmaParams {
    /// Resolve and validate connector settings
    ///
    /// Missing credentials fail here, before any network call is issued.
    pub fn from_config(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let api_token = config.require("figma_api_token")?.to_string();
        let team_id = config.require("team_id")?.to_string();

        let base_url = config
            .get("figma_base_url")
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs = match config.get("request_timeout_secs") {
            Some(raw) => Some(raw.parse().map_err(|_| {
                ConnectorError::config(format!(
                    "request_timeout_secs must be a positive integer, got '{}'",
                    raw
                ))
            })?),
            None => None,
        };

        Ok(Self {
            api_token,
            team_id,
            base_url,
            request_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(entries: &[(&str, &str)]) -> ConnectorConfig {
        let mut config = ConnectorConfig::default();
        for (key, value) in entries {
            config
                .connector_config
                .insert(key.to_string(), value.to_string());
        }
        config
    }

    #[test]
    fn test_params_from_config() {
        let config = config_with(&[("figma_api_token", "figd_abc"), ("team_id", "123456")]);
        let params = FigmaParams::from_config(&config).unwrap();
        assert_eq!(params.api_token, "figd_abc");
        assert_eq!(params.team_id, "123456");
        assert_eq!(params.base_url, DEFAULT_BASE_URL);
        assert_eq!(params.request_timeout_secs, None);
    }

    #[test]
    fn test_missing_credentials_fail() {
        let config = config_with(&[("team_id", "123456")]);
        assert!(FigmaParams::from_config(&config).unwrap_err().is_config());

        let config = config_with(&[("figma_api_token", "figd_abc")]);
        assert!(FigmaParams::from_config(&config).unwrap_err().is_config());
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let config = config_with(&[
            ("figma_api_token", "figd_abc"),
            ("team_id", "123456"),
            ("figma_base_url", "http://127.0.0.1:9090/v1/"),
        ]);
        let params = FigmaParams::from_config(&config).unwrap();
        assert_eq!(params.base_url, "http://127.0.0.1:9090/v1");
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let config = config_with(&[
            ("figma_api_token", "figd_abc"),
            ("team_id", "123456"),
            ("request_timeout_secs", "soon"),
        ]);
        assert!(FigmaParams::from_config(&config).unwrap_err().is_config());
    }
}
