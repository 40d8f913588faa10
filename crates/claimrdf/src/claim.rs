//! Lazy claim handle

use crate::client::fetch_one;
use crate::error::ClaimError;
use claimrdf_domain::{ClaimFields, ClaimUri, Term};
use claimrdf_store::SparqlStore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Why a resolution produced no fields
///
/// Both outcomes depend only on the store data, so they are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unresolvable {
    Missing,
    TooMany(usize),
}

type Resolution = Result<ClaimFields, Unresolvable>;

/// Handle to one reified statement in the store
///
/// Constructing a handle does not touch the store. The first field access
/// fetches all four fields in a single query and caches them for the life of
/// the handle; later accesses never go back to the store. Concurrent first
/// accesses share one in-flight fetch.
///
/// Handles do not share caches: two handles for the same URI each fetch once.
///
/// # Examples
///
/// ```
/// use claimrdf::{ClaimClient, ClaimFields};
/// use claimrdf_store::MemoryStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ClaimClient::from_store(MemoryStore::new()?);
/// let fields = ClaimFields::parse(
///     "<http://t/s>", "<http://t/subj>", "<http://t/pred>", "<http://t/obj>",
/// )?;
///
/// let claim = client.insert_claim("http://t/claims/", &fields).await?;
/// assert_eq!(claim.subject().await?.to_string(), "<http://t/subj>");
/// # Ok(())
/// # }
/// ```
pub struct Claim {
    store: Arc<dyn SparqlStore>,
    uri: ClaimUri,
    state: OnceCell<Resolution>,
}

impl Claim {
    /// Create an unresolved handle
    pub fn new(store: Arc<dyn SparqlStore>, uri: ClaimUri) -> Self {
        Self {
            store,
            uri,
            state: OnceCell::new(),
        }
    }

    /// The claim URI
    pub fn uri(&self) -> &ClaimUri {
        &self.uri
    }

    /// Whether the fields have been fetched successfully
    pub fn is_resolved(&self) -> bool {
        matches!(self.state.get(), Some(Ok(_)))
    }

    /// All four fields
    ///
    /// # Errors
    ///
    /// - [`ClaimError::ClaimNotFound`] if the store has no group for this URI
    /// - [`ClaimError::TooManyClaims`] if it has several
    /// - [`ClaimError::Store`] if the store request fails; the handle stays
    ///   unresolved and the next access tries again
    pub async fn fields(&self) -> Result<&ClaimFields, ClaimError> {
        let resolution = self
            .state
            .get_or_try_init(|| self.resolve())
            .await?;

        match resolution {
            Ok(fields) => Ok(fields),
            Err(Unresolvable::Missing) => Err(ClaimError::ClaimNotFound(self.uri.clone())),
            Err(Unresolvable::TooMany(count)) => Err(ClaimError::TooManyClaims {
                count: *count,
                uri: self.uri.clone(),
            }),
        }
    }

    /// Where the statement came from
    pub async fn source(&self) -> Result<&Term, ClaimError> {
        Ok(&self.fields().await?.source)
    }

    /// Subject of the statement
    pub async fn subject(&self) -> Result<&Term, ClaimError> {
        Ok(&self.fields().await?.subject)
    }

    /// Predicate of the statement
    pub async fn predicate(&self) -> Result<&Term, ClaimError> {
        Ok(&self.fields().await?.predicate)
    }

    /// Object of the statement
    pub async fn object(&self) -> Result<&Term, ClaimError> {
        Ok(&self.fields().await?.object)
    }

    async fn resolve(&self) -> Result<Resolution, ClaimError> {
        debug!(uri = %self.uri, "Resolving claim fields");

        match fetch_one(self.store.as_ref(), &self.uri).await {
            Ok(Some(fields)) => Ok(Ok(fields)),
            Ok(None) => {
                warn!(uri = %self.uri, "Claim handle refers to a missing claim");
                Ok(Err(Unresolvable::Missing))
            }
            Err(ClaimError::TooManyClaims { count, .. }) => Ok(Err(Unresolvable::TooMany(count))),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claim")
            .field("uri", &self.uri)
            .field("state", &self.state.get())
            .finish()
    }
}
