//! SPARQL 1.1 Query Results JSON model
//!
//! Mirrors the W3C format so HTTP responses deserialize directly:
//!
//! ```json
//! { "head": { "vars": ["claim"] },
//!   "results": { "bindings": [ { "claim": { "type": "uri", "value": "http://t/c/1" } } ] } }
//! ```

use crate::StoreError;
use claimrdf_domain::Term;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One solution: variable name to bound value
///
/// Variables left unbound by the query are absent from the map.
pub type Row = HashMap<String, Binding>;

/// Ordered solutions of a SELECT query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Projected variables
    #[serde(default)]
    pub head: Head,

    /// Solution sequence
    #[serde(default)]
    pub results: Solutions,
}

/// Result header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Head {
    /// Variable names, without `?`
    #[serde(default)]
    pub vars: Vec<String>,
}

/// Result body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solutions {
    /// Rows in store order
    #[serde(default)]
    pub bindings: Vec<Row>,
}

/// Kind of a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    /// IRI reference
    Uri,
    /// Literal (possibly with language or datatype)
    Literal,
    /// Typed literal, as emitted by older endpoints
    TypedLiteral,
    /// Blank node
    Bnode,
}

/// A single bound value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Term kind
    #[serde(rename = "type")]
    pub kind: BindingKind,

    /// Raw value: IRI, lexical form or blank node label
    pub value: String,

    /// Language tag of a literal
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Datatype IRI of a literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl Binding {
    /// A bound IRI
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Uri,
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A bound simple literal
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: BindingKind::Literal,
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Convert into a quoted domain term
    ///
    /// Blank nodes are rejected: claim fields are always references or literals.
    pub fn to_term(&self) -> Result<Term, StoreError> {
        let term = match self.kind {
            BindingKind::Uri => Term::iri(self.value.clone()),
            BindingKind::Literal | BindingKind::TypedLiteral => {
                match (&self.language, &self.datatype) {
                    (Some(language), _) => Term::lang_literal(self.value.clone(), language),
                    (None, Some(datatype)) => {
                        Term::typed_literal(self.value.clone(), datatype.clone())
                    }
                    (None, None) => Ok(Term::literal(self.value.clone())),
                }
            }
            BindingKind::Bnode => {
                return Err(StoreError::InvalidResponse(format!(
                    "unexpected blank node _:{}",
                    self.value
                )))
            }
        };
        term.map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}

impl ResultSet {
    /// An empty result set projecting `vars`
    pub fn new(vars: Vec<String>) -> Self {
        Self {
            head: Head { vars },
            results: Solutions::default(),
        }
    }

    /// Parse the JSON results format
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a row
    pub fn push(&mut self, row: Row) {
        self.results.bindings.push(row);
    }

    /// Rows in store order
    pub fn rows(&self) -> &[Row] {
        &self.results.bindings
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<Row> {
        self.results.bindings
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.results.bindings.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }
}
