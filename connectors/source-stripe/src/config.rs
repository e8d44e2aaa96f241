//! Configuration for the Stripe Events Source Connector

use tributary_connect_core::{ConnectorConfig, ConnectorError, ConnectorResult};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com/v1";

/// The events API caps `limit` at 100 per page
const MAX_PAGE_LIMIT: u64 = 100;

/// Settings resolved from the connector configuration map
///
/// Recognized keys:
/// - `stripe_api_key`: required, secret API key
/// - `start_date`: optional RFC3339 lower bound for the first sync
/// - `stripe_base_url`: optional API base URL override (used in tests)
/// - `page_limit`: optional page size, 1..=100 (default 100)
#[derive(Debug, Clone)]
pub struct StripeParams {
    pub api_key: String,
    pub start_date: Option<String>,
    pub base_url: String,
    pub page_limit: u64,
}

impl StripeParams {
    /// Resolve and validate connector settings
    ///
    /// A missing API key fails here, before any network call is issued.
    pub fn from_config(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let api_key = config.require("stripe_api_key")?.to_string();

        let start_date = config.get("start_date").map(str::to_string);

        let base_url = config
            .get("stripe_base_url")
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let page_limit = match config.get("page_limit") {
            Some(raw) => {
                let limit: u64 = raw.parse().map_err(|_| {
                    ConnectorError::config(format!(
                        "page_limit must be a positive integer, got '{}'",
                        raw
                    ))
                })?;
                if limit == 0 || limit > MAX_PAGE_LIMIT {
                    return Err(ConnectorError::config(format!(
                        "page_limit must be between 1 and {}, got {}",
                        MAX_PAGE_LIMIT, limit
                    )));
                }
                limit
            }
            None => MAX_PAGE_LIMIT,
        };

        Ok(Self {
            api_key,
            start_date,
            base_url,
            page_limit,
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
        let config = config_with(&[("stripe_api_key", "sk_test_abc")]);
        let params = StripeParams::from_config(&config).unwrap();
        assert_eq!(params.api_key, "sk_test_abc");
        assert_eq!(params.start_date, None);
        assert_eq!(params.base_url, DEFAULT_BASE_URL);
        assert_eq!(params.page_limit, 100);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let config = config_with(&[("start_date", "2024-01-01T00:00:00Z")]);
        assert!(StripeParams::from_config(&config).unwrap_err().is_config());
    }

    #[test]
    fn test_page_limit_bounds() {
        let config = config_with(&[("stripe_api_key", "sk_test_abc"), ("page_limit", "25")]);
        assert_eq!(StripeParams::from_config(&config).unwrap().page_limit, 25);

        let config = config_with(&[("stripe_api_key", "sk_test_abc"), ("page_limit", "0")]);
        assert!(StripeParams::from_config(&config).unwrap_err().is_config());

        let config = config_with(&[("stripe_api_key", "sk_test_abc"), ("page_limit", "500")]);
        assert!(StripeParams::from_config(&config).unwrap_err().is_config());

        let config = config_with(&[("stripe_api_key", "sk_test_abc"), ("page_limit", "many")]);
        assert!(StripeParams::from_config(&config).unwrap_err().is_config());
    }
}
