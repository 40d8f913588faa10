//! In-process store backed by oxigraph
//!
//! Evaluates the same SPARQL text an HTTP endpoint would receive, which makes
//! it the store of choice for tests and for embedding claims in a process.
//! Clones share the underlying dataset and request counters.

use crate::{Binding, ResultSet, Row, SparqlStore, StoreError};
use async_trait::async_trait;
use claimrdf_domain::term::XSD_STRING;
use oxigraph::model::Term as OxTerm;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// In-memory SPARQL store
///
/// # Examples
///
/// ```
/// use claimrdf_store::{MemoryStore, SparqlStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new().unwrap();
/// store.update("INSERT DATA { <http://t/a> <http://t/b> <http://t/c> }").await.unwrap();
///
/// let results = store.query("SELECT ?o WHERE { <http://t/a> <http://t/b> ?o }").await.unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(store.query_count(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    store: Store,
    queries: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Result<Self, StoreError> {
        Ok(Self {
            store: Store::new()?,
            queries: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Number of queries evaluated so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of updates applied so far
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Reset both request counters
    pub fn reset_counts(&self) {
        self.queries.store(0, Ordering::SeqCst);
        self.updates.store(0, Ordering::SeqCst);
    }

    /// Remove every triple
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        Ok(())
    }

    /// Number of triples held
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.store.len()?)
    }

    /// Whether the store holds no triples
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.store.is_empty()?)
    }

    fn evaluate(&self, query: &str) -> Result<ResultSet, StoreError> {
        match self.store.query(query)? {
            QueryResults::Solutions(solutions) => {
                let vars = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let mut results = ResultSet::new(vars);

                for solution in solutions {
                    let solution = solution?;
                    let mut row = Row::new();
                    for (var, term) in solution.iter() {
                        row.insert(var.as_str().to_string(), to_binding(term)?);
                    }
                    results.push(row);
                }

                Ok(results)
            }
            QueryResults::Boolean(_) | QueryResults::Graph(_) => Err(StoreError::Query(
                "only SELECT queries are supported".to_string(),
            )),
        }
    }
}

fn to_binding(term: &OxTerm) -> Result<Binding, StoreError> {
    match term {
        OxTerm::NamedNode(node) => Ok(Binding::uri(node.as_str())),
        OxTerm::Literal(literal) => {
            let mut binding = Binding::literal(literal.value());
            if let Some(language) = literal.language() {
                binding.language = Some(language.to_string());
            } else if literal.datatype().as_str() != XSD_STRING {
                binding.datatype = Some(literal.datatype().as_str().to_string());
            }
            Ok(binding)
        }
        OxTerm::BlankNode(node) => Err(StoreError::InvalidResponse(format!(
            "unexpected blank node _:{}",
            node.as_str()
        ))),
        #[allow(unreachable_patterns)]
        other => Err(StoreError::InvalidResponse(format!("unsupported term {}", other))),
    }
}

fn join_error(e: tokio::task::JoinError) -> StoreError {
    StoreError::Storage(format!("Task join error: {}", e))
}

// Evaluation is synchronous, so it runs on the blocking pool rather than a
// runtime worker.
#[async_trait]
impl SparqlStore for MemoryStore {
    async fn query(&self, query: &str) -> Result<ResultSet, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        debug!(chars = query.len(), "Evaluating query in memory store");

        let store = self.clone();
        let query = query.to_string();
        tokio::task::spawn_blocking(move || store.evaluate(&query))
            .await
            .map_err(join_error)?
    }

    async fn update(&self, update: &str) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        debug!(chars = update.len(), "Applying update to memory store");

        let store = self.store.clone();
        let update = update.to_string();
        tokio::task::spawn_blocking(move || store.update(update.as_str()))
            .await
            .map_err(join_error)??;
        Ok(())
    }
}
