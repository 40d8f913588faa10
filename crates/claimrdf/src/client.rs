//! Claim query protocol
//!
//! Translates the four claim operations into SPARQL text and runs them
//! against an injected store.

use crate::claim::Claim;
use crate::error::ClaimError;
use crate::query::{self, VAR_CLAIM, VAR_OBJECT, VAR_PREDICATE, VAR_SOURCE, VAR_SUBJECT};
use claimrdf_domain::{ClaimFields, ClaimFilter, ClaimUri, Term};
use claimrdf_store::{HttpSparqlStore, Row, SparqlStore, StoreConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stateless service exposing the claim operations over one store
///
/// Cloning is cheap; clones share the store handle.
#[derive(Clone)]
pub struct ClaimClient {
    store: Arc<dyn SparqlStore>,
}

impl ClaimClient {
    /// Create a client over a shared store handle
    pub fn new(store: Arc<dyn SparqlStore>) -> Self {
        Self { store }
    }

    /// Create a client owning `store`
    pub fn from_store<S: SparqlStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// Create a client for the HTTP endpoint described by `config`
    pub fn from_config(config: &StoreConfig) -> Result<Self, ClaimError> {
        Ok(Self::from_store(HttpSparqlStore::from_config(config)?))
    }

    /// The underlying store handle
    pub fn store(&self) -> &Arc<dyn SparqlStore> {
        &self.store
    }

    /// An unresolved handle for `uri`; does not touch the store
    pub fn claim(&self, uri: ClaimUri) -> Claim {
        Claim::new(Arc::clone(&self.store), uri)
    }

    /// Fetch the four fields of one claim
    ///
    /// Returns `Ok(None)` when no group exists for `uri`.
    ///
    /// # Errors
    ///
    /// [`ClaimError::TooManyClaims`] when the lookup returns more than one row.
    pub async fn fetch_claim(&self, uri: &ClaimUri) -> Result<Option<ClaimFields>, ClaimError> {
        fetch_one(self.store.as_ref(), uri).await
    }

    /// Handles for every claim matching `filter`, in store order
    ///
    /// The handles are unresolved; each fetches its own fields on first access.
    pub async fn fetch_claims(&self, filter: &ClaimFilter) -> Result<Vec<Claim>, ClaimError> {
        let query = query::select_claims(filter);
        debug!(%query, "Fetching claims");

        let results = self.store.query(&query).await?;
        let claims = results
            .into_rows()
            .into_iter()
            .map(|row| -> Result<Claim, ClaimError> {
                let uri = ClaimUri::from_term(bound_term(&row, VAR_CLAIM)?)?;
                Ok(self.claim(uri))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = claims.len(), "Fetched claims");
        Ok(claims)
    }

    /// Store a new claim under a fresh URI beginning with `prefix`
    ///
    /// All five triples are sent in one request. The returned handle is
    /// unresolved and will re-read the fields from the store on first access.
    pub async fn insert_claim(
        &self,
        prefix: &str,
        fields: &ClaimFields,
    ) -> Result<Claim, ClaimError> {
        let uri = ClaimUri::generate(prefix)?;
        let update = query::insert_claim(&uri, fields);
        debug!(%update, "Inserting claim");

        self.store.update(&update).await?;
        info!(uri = %uri, source = %fields.source, "Inserted claim");

        Ok(self.claim(uri))
    }

    /// Delete every complete reification group matching `filter`
    ///
    /// The empty filter deletes every claim. Success means the store accepted
    /// the request; no count is reported.
    pub async fn remove_claims(&self, filter: &ClaimFilter) -> Result<(), ClaimError> {
        let update = query::delete_claims(filter);
        debug!(%update, "Removing claims");

        if filter.is_empty() {
            warn!("Removing all claims: filter is unconstrained");
        }

        self.store.update(&update).await?;
        info!(filter = ?filter, "Removed matching claims");
        Ok(())
    }
}

/// fetch-one, shared by [`ClaimClient::fetch_claim`] and [`Claim`] resolution
pub(crate) async fn fetch_one(
    store: &dyn SparqlStore,
    uri: &ClaimUri,
) -> Result<Option<ClaimFields>, ClaimError> {
    let query = query::select_claim(uri);
    debug!(%query, "Fetching claim");

    let results = store.query(&query).await?;
    match results.rows() {
        [] => Ok(None),
        [row] => Ok(Some(ClaimFields::new(
            bound_term(row, VAR_SOURCE)?,
            bound_term(row, VAR_SUBJECT)?,
            bound_term(row, VAR_PREDICATE)?,
            bound_term(row, VAR_OBJECT)?,
        ))),
        rows => {
            warn!(uri = %uri, count = rows.len(), "Claim URI matches several groups");
            Err(ClaimError::TooManyClaims {
                count: rows.len(),
                uri: uri.clone(),
            })
        }
    }
}

fn bound_term(row: &Row, var: &str) -> Result<Term, ClaimError> {
    let binding = row
        .get(var)
        .ok_or_else(|| ClaimError::MissingBinding(var.to_string()))?;
    Ok(binding.to_term()?)
}
