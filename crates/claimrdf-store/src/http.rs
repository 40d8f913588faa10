//! SPARQL 1.1 Protocol client
//!
//! Talks to any endpoint implementing the W3C protocol (Fuseki, GraphDB,
//! Virtuoso, Blazegraph, ...). Queries and updates are both sent as
//! url-encoded `POST` bodies.
//!
//! # Examples
//!
//! ```no_run
//! use claimrdf_store::{HttpSparqlStore, StoreConfig};
//!
//! let config = StoreConfig::new("http://localhost:3030/claims/sparql");
//! let store = HttpSparqlStore::from_config(&config).unwrap();
//! ```

use crate::{ResultSet, SparqlStore, StoreConfig, StoreError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, warn};

/// Media type of SPARQL JSON results
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Store reached over HTTP
pub struct HttpSparqlStore {
    query_endpoint: String,
    update_endpoint: String,
    client: reqwest::Client,
}

impl HttpSparqlStore {
    /// Create a store for an endpoint that serves both queries and updates
    pub fn new(endpoint: impl Into<String>) -> Result<Self, StoreError> {
        let endpoint = endpoint.into();
        Self::build(endpoint.clone(), endpoint, Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS))
    }

    /// Create a store from configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        config
            .validate()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::build(
            config.query_endpoint.clone(),
            config.update_endpoint().to_string(),
            config.timeout(),
        )
    }

    /// Send updates to a separate endpoint
    pub fn with_update_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.update_endpoint = endpoint.into();
        self
    }

    /// Query endpoint URL
    pub fn query_endpoint(&self) -> &str {
        &self.query_endpoint
    }

    /// Update endpoint URL
    pub fn update_endpoint(&self) -> &str {
        &self.update_endpoint
    }

    fn build(
        query_endpoint: String,
        update_endpoint: String,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            query_endpoint,
            update_endpoint,
            client,
        })
    }
}

/// Turn a non-success response into [`StoreError::Endpoint`]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    warn!(status = status.as_u16(), "SPARQL endpoint rejected request");
    Err(StoreError::Endpoint {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SparqlStore for HttpSparqlStore {
    async fn query(&self, query: &str) -> Result<ResultSet, StoreError> {
        debug!(endpoint = %self.query_endpoint, "Sending SPARQL query");

        let response = self
            .client
            .post(&self.query_endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.text().await?;
        ResultSet::from_json(&body)
    }

    async fn update(&self, update: &str) -> Result<(), StoreError> {
        debug!(endpoint = %self.update_endpoint, "Sending SPARQL update");

        let response = self
            .client
            .post(&self.update_endpoint)
            .form(&[("update", update)])
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
