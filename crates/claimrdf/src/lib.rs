//! claimrdf
//!
//! Reified statements ("claims") in an RDF store. A claim is a statement -
//! subject, predicate, object - plus the source it came from, stored as five
//! triples under a generated claim URI.
//!
//! # Operations
//!
//! [`ClaimClient`] exposes the protocol:
//!
//! - `fetch_claim`: the four fields of one claim URI
//! - `fetch_claims`: handles for every claim matching any subset of the fields
//! - `insert_claim`: store a new claim under a fresh URI
//! - `remove_claims`: delete every claim matching a filter
//!
//! [`Claim`] handles fetch their fields lazily, once.
//!
//! # Example
//!
//! ```
//! use claimrdf::{ClaimClient, ClaimFields, ClaimFilter, Term};
//! use claimrdf_store::MemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClaimClient::from_store(MemoryStore::new()?);
//! let fields = ClaimFields::parse(
//!     "<http://t/s>", "<http://t/subj>", "<http://t/pred>", "<http://t/obj>",
//! )?;
//! client.insert_claim("http://t/claims/", &fields).await?;
//!
//! let filter = ClaimFilter::all().with_source("<http://t/s>".parse::<Term>()?);
//! let claims = client.fetch_claims(&filter).await?;
//! assert_eq!(claims.len(), 1);
//! assert_eq!(claims[0].subject().await?.to_string(), "<http://t/subj>");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod claim;
mod client;
mod error;
pub mod query;

pub use claim::Claim;
pub use client::ClaimClient;
pub use error::ClaimError;

pub use claimrdf_domain::{ClaimFields, ClaimFilter, ClaimUri, Term, TermError};
pub use claimrdf_store::{SparqlStore, StoreConfig, StoreError};
