//! Error types for connectors.

use thiserror::Error;

/// Result type used throughout the connector SDK
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Errors that can occur while loading configuration or running a sync pass
///
/// The taxonomy is deliberately small: configuration errors are raised before
/// any network call, transport and HTTP errors abort the pass and propagate to
/// the host runner, which decides whether to fail or reschedule the run.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Missing or malformed configuration (fatal, raised before any I/O)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The upstream API returned a non-2xx status
    #[error("HTTP status {status} from {url}")]
    Http { status: u16, url: String },

    /// Request-level failure (connection refused, timeout, TLS, ...)
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to serialize or deserialize a payload
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An API entity that cannot be turned into a valid record
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Persisting or loading checkpoint state failed
    #[error("State error: {message}")]
    State {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConnectorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a transport error without an underlying cause
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a state persistence error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
            source: None,
        }
    }

    /// Create a state persistence error wrapping an underlying cause
    pub fn state_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::State {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for configuration-validation errors
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Stable variant name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Http { .. } => "http",
            Self::Transport { .. } => "transport",
            Self::Serialization(_) => "serialization",
            Self::InvalidData(_) => "invalid_data",
            Self::State { .. } => "state",
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConnectorError::config("team_id is required");
        assert_eq!(err.to_string(), "Configuration error: team_id is required");

        let err = ConnectorError::Http {
            status: 401,
            url: "https://api.example.com/v1/events".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP status 401 from https://api.example.com/v1/events"
        );
    }

    #[test]
    fn test_is_config() {
        assert!(ConnectorError::config("missing key").is_config());
        assert!(!ConnectorError::transport("connection refused").is_config());
    }
}
