//! Configuration management for connectors.

use crate::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Environment variable prefix for connector-specific settings.
///
/// `CONNECTOR_CFG_FIGMA_API_TOKEN=...` becomes the `figma_api_token` key in
/// [`ConnectorConfig::connector_config`].
const CONNECTOR_CFG_PREFIX: &str = "CONNECTOR_CFG_";

/// Main configuration for connectors
///
/// Common runtime settings live as typed fields; connector-specific
/// credentials and parameters (API tokens, team identifiers, start dates)
/// live in the string-keyed `connector_config` map and are validated by each
/// connector with presence checks only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Connector name (must be unique)
    pub connector_name: String,

    /// Path of the checkpoint state file persisted between runs
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Directory where upserted records are written
    #[serde(default = "default_destination_dir")]
    pub destination_dir: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Connector-specific key/value settings
    #[serde(default, rename = "connector")]
    pub connector_config: HashMap<String, String>,
}

fn default_state_path() -> String {
    "state.json".to_string()
}

fn default_destination_dir() -> String {
    "destination".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConnectorConfig {
    /// Load configuration from a single TOML file with optional ENV overrides
    ///
    /// Priority: TOML file → Environment variables
    ///
    /// # Example
    ///
    /// ```toml
    /// # connector.toml - Single file for everything
    /// connector_name = "figma-source"
    /// state_path = "state.json"
    ///
    /// [connector]
    /// figma_api_token = "figd_..."
    /// team_id = "123456"
    /// ```
    pub fn load() -> ConnectorResult<Self> {
        let mut config = if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_file(&config_file)?
        } else {
            Self::from_env()?
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> ConnectorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConnectorError::config(format!("Failed to read config file {}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConnectorError::config(format!("Failed to parse config file {}: {}", path, e))
        })
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CONNECTOR_NAME`: Required, unique connector name
    /// - `STATE_PATH`: Checkpoint state file (default: state.json)
    /// - `DESTINATION_DIR`: Record output directory (default: destination)
    /// - `LOG_LEVEL`: Log level (default: info)
    ///
    /// Variables prefixed with `CONNECTOR_CFG_` are lowercased (prefix
    /// stripped) and added to `connector_config`.
    pub fn from_env() -> ConnectorResult<Self> {
        let connector_name = env::var("CONNECTOR_NAME")
            .map_err(|_| ConnectorError::config("CONNECTOR_NAME is required"))?;

        let state_path = env::var("STATE_PATH").unwrap_or_else(|_| default_state_path());

        let destination_dir =
            env::var("DESTINATION_DIR").unwrap_or_else(|_| default_destination_dir());

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| default_log_level());

        Ok(Self {
            connector_name,
            state_path,
            destination_dir,
            log_level,
            connector_config: Self::connector_config_from_env(),
        })
    }

    fn connector_config_from_env() -> HashMap<String, String> {
        env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(CONNECTOR_CFG_PREFIX)
                    .map(|stripped| (stripped.to_lowercase(), value))
            })
            .collect()
    }

    /// Apply environment variable overrides to configuration
    ///
    /// This is a helper for connectors to apply ENV overrides after loading
    /// from TOML.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("CONNECTOR_NAME") {
            self.connector_name = val;
        }
        if let Ok(val) = env::var("STATE_PATH") {
            self.state_path = val;
        }
        if let Ok(val) = env::var("DESTINATION_DIR") {
            self.destination_dir = val;
        }
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.log_level = val;
        }
        self.connector_config
            .extend(Self::connector_config_from_env());
    }

    /// Get a connector-specific setting
    pub fn get(&self, key: &str) -> Option<&str> {
        self.connector_config.get(key).map(String::as_str)
    }

    /// Get a required connector-specific setting
    ///
    /// Missing or empty values yield a fatal configuration error, raised by
    /// connectors before any network call is issued.
    pub fn require(&self, key: &str) -> ConnectorResult<&str> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ConnectorError::config(format!("Missing required configuration value: {}", key))
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.connector_name.is_empty() {
            return Err(ConnectorError::config("connector_name cannot be empty"));
        }

        if self.state_path.is_empty() {
            return Err(ConnectorError::config("state_path cannot be empty"));
        }

        if self.destination_dir.is_empty() {
            return Err(ConnectorError::config("destination_dir cannot be empty"));
        }

        Ok(())
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            connector_name: "default-connector".to_string(),
            state_path: default_state_path(),
            destination_dir: default_destination_dir(),
            log_level: default_log_level(),
            connector_config: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ConnectorConfig::default();
        assert_eq!(config.connector_name, "default-connector");
        assert_eq!(config.state_path, "state.json");
        assert_eq!(config.destination_dir, "destination");
        assert!(config.connector_config.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConnectorConfig::default();
        assert!(config.validate().is_ok());

        config.connector_name = "".to_string();
        assert!(config.validate().is_err());

        config.connector_name = "events-source".to_string();
        config.destination_dir = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require() {
        let mut config = ConnectorConfig::default();
        config
            .connector_config
            .insert("api_token".to_string(), "tok_123".to_string());
        config
            .connector_config
            .insert("empty".to_string(), "".to_string());

        assert_eq!(config.require("api_token").unwrap(), "tok_123");
        assert!(config.require("missing").unwrap_err().is_config());
        assert!(config.require("empty").unwrap_err().is_config());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
connector_name = "figma-source"
state_path = "/var/lib/figma/state.json"

[connector]
figma_api_token = "figd_abc"
team_id = "123456"
"#
        )
        .unwrap();

        let config = ConnectorConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.connector_name, "figma-source");
        assert_eq!(config.state_path, "/var/lib/figma/state.json");
        assert_eq!(config.destination_dir, "destination");
        assert_eq!(config.get("figma_api_token"), Some("figd_abc"));
        assert_eq!(config.get("team_id"), Some("123456"));
    }
}
