//! Monitor store client using the monitor REST API.
//!
//! ## Endpoints
//!
//! - `GET {endpoint}/monitor` - monitors of the session
//! - `POST {endpoint}/monitor` - register a monitor (`{"url", "interval"}`)
//! - `DELETE {endpoint}/monitor/{id}` - delete a monitor
//! - `GET {endpoint}/monitor/{id}/history?limit=N` - newest-first records
//!
//! Failed requests carry a JSON body of the form `{"error": "..."}`; its
//! message ends up in the returned [`StoreError`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitewatch_store::{HttpStore, MonitorStore, NewMonitor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = HttpStore::builder()
//!         .endpoint("https://monitor.example.com/api")
//!         .token("session-token")
//!         .build()?;
//!
//!     let monitor = store
//!         .create_monitor(&NewMonitor::new("https://example.com", 300))
//!         .await?;
//!     let history = store.fetch_history(&monitor.id, 50).await?;
//!     println!("{} has {} checks", monitor.url, history.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{HealthRecord, Monitor, MonitorId, MonitorStore, NewMonitor, StoreError};

/// Client for the monitor REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
    description: String,
}

impl HttpStore {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpStoreBuilder {
        HttpStoreBuilder::default()
    }

    /// The base URL requests are made against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        warn!("Store request failed ({}): {}", status, message);

        Err(StoreError::from_status(status.as_u16(), message))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MonitorStore for HttpStore {
    async fn list_monitors(&self) -> Result<Vec<Monitor>, StoreError> {
        let url = self.url("/monitor");
        debug!("Listing monitors from {}", url);
        self.json(self.client.get(&url)).await
    }

    async fn create_monitor(&self, monitor: &NewMonitor) -> Result<Monitor, StoreError> {
        let url = self.url("/monitor");
        debug!("Creating monitor for {}", monitor.url);
        self.json(self.client.post(&url).json(monitor)).await
    }

    async fn delete_monitor(&self, id: &MonitorId) -> Result<(), StoreError> {
        let url = self.url(&format!("/monitor/{}", path_segment(&id.to_string())));
        debug!("Deleting monitor {}", id);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }

    async fn fetch_history(
        &self,
        id: &MonitorId,
        limit: usize,
    ) -> Result<Vec<HealthRecord>, StoreError> {
        let url = self.url(&format!(
            "/monitor/{}/history",
            path_segment(&id.to_string())
        ));
        debug!("Fetching {} records for monitor {}", limit, id);
        self.json(self.client.get(&url).query(&[("limit", limit)]))
            .await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpStore.
#[derive(Debug, Default)]
pub struct HttpStoreBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpStoreBuilder {
    /// Set the API base URL (e.g., "http://localhost:3001/api").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the opaque session token sent as a bearer credential.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpStore, StoreError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:3001".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(HttpStore {
            client,
            description: format!("http: {}", endpoint),
            endpoint,
            token: self.token.filter(|t| !t.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Extract the server's message from an error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return Some(parsed.error);
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// Escape characters that would break a path segment
fn path_segment(s: &str) -> String {
    s.replace('%', "%25")
        .replace('/', "%2F")
        .replace('?', "%3F")
        .replace('#', "%23")
}
