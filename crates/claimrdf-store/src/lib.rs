//! claimrdf Storage Layer
//!
//! The store collaborator the claim protocol runs against: something that
//! can evaluate SPARQL query text into a result set and apply SPARQL update
//! text.
//!
//! # Stores
//!
//! - `HttpSparqlStore`: any SPARQL 1.1 Protocol endpoint, over HTTP
//! - `MemoryStore`: an embedded oxigraph dataset, for tests and in-process use
//!
//! # Examples
//!
//! ```
//! use claimrdf_store::{MemoryStore, SparqlStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn SparqlStore> = Arc::new(MemoryStore::new().unwrap());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod results;

use async_trait::async_trait;

pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use http::HttpSparqlStore;
pub use memory::MemoryStore;
pub use results::{Binding, BindingKind, ResultSet, Row};

/// A SPARQL store: the only I/O boundary of the claim protocol
///
/// Implementations must tolerate concurrent outstanding requests. Errors are
/// reported as-is; callers decide whether to retry.
#[async_trait]
pub trait SparqlStore: Send + Sync {
    /// Evaluate a SELECT query
    async fn query(&self, query: &str) -> Result<ResultSet, StoreError>;

    /// Apply an update (INSERT DATA, DELETE WHERE, ...)
    async fn update(&self, update: &str) -> Result<(), StoreError>;
}
