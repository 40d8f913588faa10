//! claimrdf Domain Layer
//!
//! Value types shared by the store and protocol crates. Nothing in here
//! performs I/O.
//!
//! ## Key Concepts
//!
//! - **Claim**: a reified statement - (source, subject, predicate, object) -
//!   stored as a group of five triples keyed by a claim URI
//! - **Term**: a quoted RDF term (reference or literal), the only way caller
//!   text reaches generated query text
//! - **ClaimFilter**: any subset of the four claim fields, used for lookups
//!   and deletions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod term;

// Re-exports for convenience
pub use claim::{ClaimFields, ClaimFilter, ClaimUri};
pub use term::{Term, TermError};
