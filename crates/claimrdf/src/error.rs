//! Error types for the claim protocol

use claimrdf_domain::{ClaimUri, TermError};
use claimrdf_store::StoreError;
use thiserror::Error;

/// Claim protocol errors
#[derive(Debug, Error)]
pub enum ClaimError {
    /// A single-claim lookup matched more than one reification group
    ///
    /// The store data is malformed; retrying cannot help.
    #[error("Got too many claims ({count}) for {uri}")]
    TooManyClaims {
        /// Number of rows returned
        count: usize,
        /// Claim that was looked up
        uri: ClaimUri,
    },

    /// A claim handle points at a URI with no reification group
    #[error("Claim not found: {0}")]
    ClaimNotFound(ClaimUri),

    /// Store collaborator failure, passed through unchanged
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Caller input or store output is not a valid term
    #[error("Invalid term: {0}")]
    Term(#[from] TermError),

    /// A result row lacks a variable the query projects
    #[error("Result row has no binding for ?{0}")]
    MissingBinding(String),
}
