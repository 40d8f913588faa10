//! Claim module - reified statements and the filters used to find them

use crate::term::{Term, TermError};
use std::fmt;

/// Identity of a claim: an IRI, unique per inserted reification group
///
/// Fresh URIs are built from a caller prefix and a UUIDv7 token, so generation
/// needs no coordination with the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimUri(Term);

impl ClaimUri {
    /// Generate a new claim URI under `prefix`
    ///
    /// # Examples
    ///
    /// ```
    /// use claimrdf_domain::ClaimUri;
    ///
    /// let uri = ClaimUri::generate("http://t/claims/").unwrap();
    /// assert!(uri.as_str().starts_with("http://t/claims/"));
    /// assert_ne!(uri, ClaimUri::generate("http://t/claims/").unwrap());
    /// ```
    pub fn generate(prefix: &str) -> Result<Self, TermError> {
        let token = uuid::Uuid::now_v7();
        Term::iri(format!("{}{}", prefix, token)).map(Self)
    }

    /// Wrap an existing reference term
    pub fn from_term(term: Term) -> Result<Self, TermError> {
        match term {
            Term::Iri(_) => Ok(Self(term)),
            Term::Literal { .. } => Err(TermError::InvalidIri {
                iri: term.to_string(),
                reason: "a claim URI must be a reference, not a literal".to_string(),
            }),
        }
    }

    /// Parse a quoted reference such as `<http://t/claims/1>`
    pub fn parse(quoted: &str) -> Result<Self, TermError> {
        Self::from_term(quoted.parse()?)
    }

    /// The IRI without brackets
    pub fn as_str(&self) -> &str {
        self.0.value()
    }

    /// The claim URI as a query term
    pub fn as_term(&self) -> &Term {
        &self.0
    }
}

impl fmt::Display for ClaimUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<ClaimUri> for Term {
    fn from(uri: ClaimUri) -> Self {
        uri.0
    }
}

/// The four fields of a claim
///
/// `source` is where the statement came from; the other three are the
/// statement itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimFields {
    /// Provenance of the statement
    pub source: Term,

    /// Subject of the statement
    pub subject: Term,

    /// Predicate of the statement
    pub predicate: Term,

    /// Object of the statement
    pub object: Term,
}

impl ClaimFields {
    /// Create a new set of claim fields
    pub fn new(source: Term, subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            source,
            subject,
            predicate,
            object,
        }
    }

    /// Parse four pre-quoted terms, e.g. `"<http://t/s>"`
    pub fn parse(
        source: &str,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<Self, TermError> {
        Ok(Self::new(
            source.parse()?,
            subject.parse()?,
            predicate.parse()?,
            object.parse()?,
        ))
    }
}

/// Any subset of the four claim fields
///
/// Unset fields are unconstrained. The empty filter matches every claim.
///
/// # Examples
///
/// ```
/// use claimrdf_domain::{ClaimFilter, Term};
///
/// let filter = ClaimFilter::all()
///     .with_source(Term::iri("http://t/s").unwrap());
/// assert!(!filter.is_empty());
/// assert!(filter.subject.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimFilter {
    /// Constrain by source
    pub source: Option<Term>,

    /// Constrain by subject
    pub subject: Option<Term>,

    /// Constrain by predicate
    pub predicate: Option<Term>,

    /// Constrain by object
    pub object: Option<Term>,
}

impl ClaimFilter {
    /// The unconstrained filter
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter pinning all four fields
    pub fn exact(fields: &ClaimFields) -> Self {
        Self {
            source: Some(fields.source.clone()),
            subject: Some(fields.subject.clone()),
            predicate: Some(fields.predicate.clone()),
            object: Some(fields.object.clone()),
        }
    }

    /// Constrain the source
    pub fn with_source(mut self, source: Term) -> Self {
        self.source = Some(source);
        self
    }

    /// Constrain the subject
    pub fn with_subject(mut self, subject: Term) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Constrain the predicate
    pub fn with_predicate(mut self, predicate: Term) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Constrain the object
    pub fn with_object(mut self, object: Term) -> Self {
        self.object = Some(object);
        self
    }

    /// Whether no field is constrained
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.subject.is_none()
            && self.predicate.is_none()
            && self.object.is_none()
    }
}

impl From<&ClaimFields> for ClaimFilter {
    fn from(fields: &ClaimFields) -> Self {
        Self::exact(fields)
    }
}
