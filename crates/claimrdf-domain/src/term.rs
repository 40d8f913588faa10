//! RDF terms and their quoted SPARQL form
//!
//! Every value that ends up in generated query text passes through [`Term`].
//! IRIs are checked against the characters SPARQL forbids inside `<...>`, and
//! literal values are escaped when rendered, so caller-supplied text can never
//! close a term early and inject query syntax.

use std::fmt::{self, Write as _};
use std::str::FromStr;
use thiserror::Error;

/// Datatype of a simple literal
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Datatype of a language-tagged literal
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Errors produced while building or parsing a [`Term`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermError {
    /// The IRI contains characters that cannot appear in `<...>`, or is not absolute
    #[error("Invalid IRI {iri:?}: {reason}")]
    InvalidIri {
        /// Offending IRI (unquoted)
        iri: String,
        /// What is wrong with it
        reason: String,
    },

    /// Language tag is not of the form `en` / `en-GB`
    #[error("Invalid language tag: {0:?}")]
    InvalidLanguageTag(String),

    /// Quoted input could not be read as a term
    #[error("Cannot parse term {input:?}: {reason}")]
    Syntax {
        /// Original input
        input: String,
        /// What was expected
        reason: String,
    },
}

/// A concrete RDF term: a reference (IRI) or a literal
///
/// # Examples
///
/// ```
/// use claimrdf_domain::Term;
///
/// let subject: Term = "<http://t/subj>".parse().unwrap();
/// assert_eq!(subject.value(), "http://t/subj");
/// assert_eq!(subject.to_string(), "<http://t/subj>");
///
/// let label = Term::literal("say \"hi\"");
/// assert_eq!(label.to_string(), r#""say \"hi\"""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Reference term, stored without the angle brackets
    Iri(String),

    /// Literal term
    Literal {
        /// Lexical value, unescaped
        value: String,
        /// Lower-cased language tag, if any
        language: Option<String>,
        /// Datatype IRI; `None` for simple and language-tagged literals
        datatype: Option<String>,
    },
}

impl Term {
    /// Quote a raw identifier as a reference term
    ///
    /// The identifier must be an absolute IRI (`scheme:...`) free of the
    /// characters SPARQL reserves around IRI references.
    pub fn iri(raw: impl Into<String>) -> Result<Self, TermError> {
        let raw = raw.into();
        validate_iri(&raw)?;
        Ok(Term::Iri(raw))
    }

    /// A simple string literal
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged literal; the tag is normalized to lower case
    pub fn lang_literal(value: impl Into<String>, language: &str) -> Result<Self, TermError> {
        if !is_language_tag(language) {
            return Err(TermError::InvalidLanguageTag(language.to_string()));
        }
        Ok(Term::Literal {
            value: value.into(),
            language: Some(language.to_ascii_lowercase()),
            datatype: None,
        })
    }

    /// A typed literal
    ///
    /// `xsd:string` collapses to a simple literal, matching how stores report it.
    pub fn typed_literal(
        value: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Result<Self, TermError> {
        let datatype = datatype.into();
        validate_iri(&datatype)?;
        if datatype == RDF_LANG_STRING {
            return Err(TermError::InvalidIri {
                iri: datatype,
                reason: "rdf:langString requires a language tag".to_string(),
            });
        }
        let datatype = (datatype != XSD_STRING).then_some(datatype);
        Ok(Term::Literal {
            value: value.into(),
            language: None,
            datatype,
        })
    }

    /// Raw lexical value (IRI without brackets, literal without quotes)
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Literal { value, .. } => value,
        }
    }

    /// Whether this is a reference term
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

/// Quote a raw identifier into reference syntax: `http://x` becomes `<http://x>`
pub fn quote(raw: &str) -> Result<String, TermError> {
    Term::iri(raw).map(|term| term.to_string())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Literal {
                value,
                language,
                datatype,
            } => {
                write_escaped(f, value)?;
                if let Some(language) = language {
                    write!(f, "@{}", language)
                } else if let Some(datatype) = datatype {
                    write!(f, "^^<{}>", datatype)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl FromStr for Term {
    type Err = TermError;

    /// Parse the quoted form: `<iri>`, `"value"`, `"value"@lang` or `"value"^^<datatype>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Some(rest) = input.strip_prefix('<') {
            let iri = rest
                .strip_suffix('>')
                .ok_or_else(|| syntax_error(s, "unterminated IRI reference"))?;
            return Term::iri(iri);
        }
        if let Some(body) = input.strip_prefix('"') {
            return parse_literal(s, body);
        }
        Err(syntax_error(s, "expected <IRI> or a quoted literal"))
    }
}

impl TryFrom<&str> for Term {
    type Error = TermError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

fn parse_literal(input: &str, body: &str) -> Result<Term, TermError> {
    let mut value = String::new();
    let mut chars = body.char_indices();
    let mut end = None;

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => {
                end = Some(idx + 1);
                break;
            }
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| syntax_error(input, "dangling escape"))?;
                value.push(match escaped {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'b' => '\u{08}',
                    'f' => '\u{0C}',
                    '"' => '"',
                    '\'' => '\'',
                    '\\' => '\\',
                    other => {
                        return Err(syntax_error(input, &format!("unknown escape \\{}", other)))
                    }
                });
            }
            '\n' | '\r' => return Err(syntax_error(input, "raw line break in literal")),
            c => value.push(c),
        }
    }

    let end = end.ok_or_else(|| syntax_error(input, "unterminated literal"))?;
    let suffix = &body[end..];

    if suffix.is_empty() {
        Ok(Term::literal(value))
    } else if let Some(language) = suffix.strip_prefix('@') {
        Term::lang_literal(value, language)
    } else if let Some(datatype) = suffix.strip_prefix("^^") {
        let datatype = datatype
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .ok_or_else(|| syntax_error(input, "datatype must be an <IRI> reference"))?;
        Term::typed_literal(value, datatype)
    } else {
        Err(syntax_error(input, "unexpected text after literal"))
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn validate_iri(iri: &str) -> Result<(), TermError> {
    let invalid = |reason: String| TermError::InvalidIri {
        iri: iri.to_string(),
        reason,
    };

    if let Some(c) = iri.chars().find(|c| is_forbidden_iri_char(*c)) {
        return Err(invalid(format!("forbidden character {:?}", c)));
    }

    // Absolute IRIs only: scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
    let scheme = iri
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .ok_or_else(|| invalid("missing scheme".to_string()))?;
    let mut scheme_chars = scheme.chars();
    let starts_alpha = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_alpha
        || !scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return Err(invalid(format!("invalid scheme {:?}", scheme)));
    }

    Ok(())
}

fn is_forbidden_iri_char(c: char) -> bool {
    c <= '\u{20}' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

fn is_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| !p.is_empty() && p.len() <= 8 && p.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok
        && parts.all(|p| !p.is_empty() && p.len() <= 8 && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn syntax_error(input: &str, reason: &str) -> TermError {
    TermError::Syntax {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
