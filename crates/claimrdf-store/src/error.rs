//! Error types for store operations

use thiserror::Error;

/// Errors raised by a [`SparqlStore`](crate::SparqlStore)
///
/// These are passed through the claim protocol unchanged; nothing in this
/// workspace retries them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Endpoint unreachable or timed out
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request could not be built or sent
    #[error("Request error: {0}")]
    Request(String),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned HTTP {status}: {body}")]
    Endpoint {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Response could not be decoded as SPARQL results
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Query or update rejected or failed during evaluation
    #[error("Query error: {0}")]
    Query(String),

    /// Embedded storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            StoreError::Connection(e.to_string())
        } else if e.is_decode() {
            StoreError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            StoreError::Endpoint {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            StoreError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}

impl From<oxigraph::sparql::EvaluationError> for StoreError {
    fn from(e: oxigraph::sparql::EvaluationError) -> Self {
        StoreError::Query(e.to_string())
    }
}

impl From<oxigraph::store::StorageError> for StoreError {
    fn from(e: oxigraph::store::StorageError) -> Self {
        StoreError::Storage(e.to_string())
    }
}
