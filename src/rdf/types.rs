//! Constant values a query can mention
//!
//! Newtypes over the oxrdf primitives. Their `Display` output is the
//! N-Triples form, which both target syntaxes accept for IRIs, blank node
//! labels and literals.

use oxrdf::{BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode};
use std::fmt;
use thiserror::Error;

/// Rejected constant values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfError {
    #[error("Invalid IRI <{iri}>: {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("Invalid blank node label '{label}': {reason}")]
    InvalidBlankNode { label: String, reason: String },

    #[error("Invalid language tag '{tag}': {reason}")]
    InvalidLanguageTag { tag: String, reason: String },
}

pub type RdfResult<T> = Result<T, RdfError>;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    pub fn new(iri: &str) -> RdfResult<Self> {
        OxNamedNode::new(iri).map(Self).map_err(|e| RdfError::InvalidIri {
            iri: iri.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OxNamedNode> for NamedNode {
    fn from(iri: OxNamedNode) -> Self {
        Self(iri)
    }
}

/// Labelled blank node. In a pattern it behaves like a variable that
/// cannot be projected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    pub fn new(label: &str) -> RdfResult<Self> {
        OxBlankNode::new(label).map(Self).map_err(|e| RdfError::InvalidBlankNode {
            label: label.to_string(),
            reason: e.to_string(),
        })
    }

    /// Label without the `_:` marker
    pub fn label(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plain, language-tagged or typed literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    pub fn new_language_tagged_literal(value: impl Into<String>, language: impl Into<String>) -> RdfResult<Self> {
        let language = language.into();
        OxLiteral::new_language_tagged_literal(value, language.as_str())
            .map(Self)
            .map_err(|e| RdfError::InvalidLanguageTag {
                tag: language,
                reason: e.to_string(),
            })
    }

    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// Lexical form
    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Datatype IRI; `rdf:langString` for language-tagged literals
    pub fn datatype(&self) -> NamedNode {
        NamedNode(self.0.datatype().into_owned())
    }

    /// `xsd:string` without a language tag
    pub fn is_plain(&self) -> bool {
        self.language().is_none() && self.0.datatype().as_str() == XSD_STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::new_simple_literal(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self(value.into())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self(value.into())
    }
}

/// Any constant: IRI, blank node or literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfTerm {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl RdfTerm {
    pub fn iri(iri: &str) -> RdfResult<Self> {
        NamedNode::new(iri).map(Self::NamedNode)
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamedNode(iri) => write!(f, "{}", iri),
            Self::BlankNode(node) => write!(f, "{}", node),
            Self::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<NamedNode> for RdfTerm {
    fn from(iri: NamedNode) -> Self {
        Self::NamedNode(iri)
    }
}

impl From<BlankNode> for RdfTerm {
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<Literal> for RdfTerm {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}
