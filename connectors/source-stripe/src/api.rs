//! Stripe events API client.
//!
//! One endpoint is used: `GET /events`, paginated with `starting_after` and
//! a `has_more` flag in the response.

use crate::config::StripeParams;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use tributary_connect_core::{ConnectorError, ConnectorResult};

/// Query parameters of one `GET /events` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEventsQuery {
    /// Page size (capped at 100 by the API)
    pub limit: u64,
    /// Return events after this event id (exclusive)
    pub starting_after: Option<String>,
    /// Return events created at or after this Unix timestamp
    pub created_gte: Option<i64>,
}

/// One event as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub api_version: Option<String>,
    /// Creation time in Unix seconds
    pub created: i64,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub pending_webhooks: i64,
    /// Request that caused the event; null for automatic events
    pub request: Option<Value>,
}

/// One page of events
#[derive(Debug, Clone, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub data: Vec<Event>,
    #[serde(default)]
    pub has_more: bool,
}

/// Events API surface used by the connector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Fetch one page of events
    async fn list_events(
        &self,
        params: &StripeParams,
        query: &ListEventsQuery,
    ) -> ConnectorResult<EventPage>;
}

/// `reqwest`-backed events API client
///
/// Authentication uses a bearer token. Non-2xx responses abort the sync
/// pass; there is no local retry.
pub struct HttpEventsApi {
    client: reqwest::Client,
}

impl HttpEventsApi {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpEventsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn list_events(
        &self,
        params: &StripeParams,
        query: &ListEventsQuery,
    ) -> ConnectorResult<EventPage> {
        let url = format!("{}/events", params.base_url);
        info!(
            "Fetching {} (limit={}, starting_after={:?})",
            url, query.limit, query.starting_after
        );

        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&params.api_key)
            .query(&[("limit", query.limit.to_string())]);

        if let Some(id) = &query.starting_after {
            request = request.query(&[("starting_after", id)]);
        }
        if let Some(created) = query.created_gte {
            request = request.query(&[("created[gte]", created.to_string())]);
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
            .json::<EventPage>()
            .await
            .map_err(|e| ConnectorError::Serialization(e.to_string()))
    }
}
