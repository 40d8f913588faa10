//! SPARQL text for the four claim operations
//!
//! Each claim is stored as five triples sharing one claim URI:
//!
//! ```text
//! <claim>  rdfs:isDefinedBy  <source>
//! <claim>  rdf:type          rdf:Statement
//! <claim>  rdf:subject       <subject>
//! <claim>  rdf:predicate     <predicate>
//! <claim>  rdf:object        <object>
//! ```
//!
//! Every position is either a fixed [`Term`] (rendered through its escaping
//! `Display`) or one of the named variables below. No other text is
//! interpolated.

use claimrdf_domain::{ClaimFields, ClaimFilter, ClaimUri, Term};
use std::fmt;

/// Namespace declarations every generated request starts with
pub const PREFIXES: &str = "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n\
                            PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n";

/// Variable bound to the claim URI
pub const VAR_CLAIM: &str = "claim";
/// Variable bound to the source
pub const VAR_SOURCE: &str = "claim_source";
/// Variable bound to the subject
pub const VAR_SUBJECT: &str = "claim_subject";
/// Variable bound to the predicate
pub const VAR_PREDICATE: &str = "claim_predicate";
/// Variable bound to the object
pub const VAR_OBJECT: &str = "claim_object";

/// One position of the reification pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTerm<'a> {
    /// Free variable, rendered as `?name`
    Var(&'static str),
    /// Concrete term
    Fixed(&'a Term),
}

impl<'a> PatternTerm<'a> {
    fn or_var(term: Option<&'a Term>, var: &'static str) -> Self {
        term.map_or(PatternTerm::Var(var), PatternTerm::Fixed)
    }
}

impl fmt::Display for PatternTerm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Var(name) => write!(f, "?{}", name),
            PatternTerm::Fixed(term) => write!(f, "{}", term),
        }
    }
}

/// The five-triple group describing one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReificationPattern<'a> {
    /// Claim URI position
    pub claim: PatternTerm<'a>,
    /// `rdfs:isDefinedBy` object
    pub source: PatternTerm<'a>,
    /// `rdf:subject` object
    pub subject: PatternTerm<'a>,
    /// `rdf:predicate` object
    pub predicate: PatternTerm<'a>,
    /// `rdf:object` object
    pub object: PatternTerm<'a>,
}

impl<'a> ReificationPattern<'a> {
    /// Fixed claim URI, all four fields free
    pub fn for_claim(uri: &'a ClaimUri) -> Self {
        Self {
            claim: PatternTerm::Fixed(uri.as_term()),
            source: PatternTerm::Var(VAR_SOURCE),
            subject: PatternTerm::Var(VAR_SUBJECT),
            predicate: PatternTerm::Var(VAR_PREDICATE),
            object: PatternTerm::Var(VAR_OBJECT),
        }
    }

    /// Free claim URI, fields fixed where the filter constrains them
    pub fn for_filter(filter: &'a ClaimFilter) -> Self {
        Self {
            claim: PatternTerm::Var(VAR_CLAIM),
            source: PatternTerm::or_var(filter.source.as_ref(), VAR_SOURCE),
            subject: PatternTerm::or_var(filter.subject.as_ref(), VAR_SUBJECT),
            predicate: PatternTerm::or_var(filter.predicate.as_ref(), VAR_PREDICATE),
            object: PatternTerm::or_var(filter.object.as_ref(), VAR_OBJECT),
        }
    }

    /// Everything fixed: ground triples for insertion
    pub fn ground(uri: &'a ClaimUri, fields: &'a ClaimFields) -> Self {
        Self {
            claim: PatternTerm::Fixed(uri.as_term()),
            source: PatternTerm::Fixed(&fields.source),
            subject: PatternTerm::Fixed(&fields.subject),
            predicate: PatternTerm::Fixed(&fields.predicate),
            object: PatternTerm::Fixed(&fields.object),
        }
    }
}

impl fmt::Display for ReificationPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {} rdfs:isDefinedBy {} ;", self.claim, self.source)?;
        writeln!(f, "      a rdf:Statement ;")?;
        writeln!(f, "      rdf:subject {} ;", self.subject)?;
        writeln!(f, "      rdf:predicate {} ;", self.predicate)?;
        writeln!(f, "      rdf:object {} .", self.object)
    }
}

/// fetch-one: bind all four fields of one claim
pub fn select_claim(uri: &ClaimUri) -> String {
    format!(
        "{}\nSELECT ?{} ?{} ?{} ?{}\nWHERE {{\n{}}}\n",
        PREFIXES,
        VAR_SOURCE,
        VAR_SUBJECT,
        VAR_PREDICATE,
        VAR_OBJECT,
        ReificationPattern::for_claim(uri)
    )
}

/// fetch-many: every claim URI whose group matches the filter
pub fn select_claims(filter: &ClaimFilter) -> String {
    format!(
        "{}\nSELECT DISTINCT ?{}\nWHERE {{\n{}}}\n",
        PREFIXES,
        VAR_CLAIM,
        ReificationPattern::for_filter(filter)
    )
}

/// insert: the full five-triple group in one request
pub fn insert_claim(uri: &ClaimUri, fields: &ClaimFields) -> String {
    format!(
        "{}\nINSERT DATA {{\n{}}}\n",
        PREFIXES,
        ReificationPattern::ground(uri, fields)
    )
}

/// remove: every complete group matching the filter
pub fn delete_claims(filter: &ClaimFilter) -> String {
    format!(
        "{}\nDELETE WHERE {{\n{}}}\n",
        PREFIXES,
        ReificationPattern::for_filter(filter)
    )
}
