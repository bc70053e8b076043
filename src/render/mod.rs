//! Query text renderers
//!
//! Two targets share one traversal contract ([`QueryRenderer`]):
//! - [`SparqlRenderer`]: block-scoped syntax (`OPTIONAL { }`, `GRAPH <g> { }`)
//! - [`SerqlRenderer`]: path syntax with a from-clause and `[ ]` optionals
//!
//! Rendering is a pure recursive walk that returns owned strings. Nested
//! parts are rendered on their own and spliced into the caller's output.

pub mod serql;
pub mod shape;
pub mod sparql;

pub use serql::{SerqlExprRenderer, SerqlRenderer};
pub use shape::{QueryParts, QueryShape};
pub use sparql::{SparqlExprRenderer, SparqlRenderer};

use crate::algebra::{AlgebraNode, NodeKind, ValueExpr};
use crate::builder::Query;
use crate::config::RenderConfig;
use crate::context::ContextMap;
use crate::rdf::{Literal, Namespace, NamespaceManager, RdfTerm};
use rustc_hash::FxHashSet;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{target} renderer does not support {kind} nodes")]
    UnsupportedNode { target: &'static str, kind: NodeKind },

    #[error("{target} renderer cannot place a {kind} node here")]
    UnsupportedPosition { target: &'static str, kind: NodeKind },

    #[error("{target} renderer does not support {feature}")]
    UnsupportedQuery { target: &'static str, feature: String },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Turns algebra trees into query text
pub trait QueryRenderer {
    /// Render a compiled query. Graph contexts are collected from its tree.
    fn render(&self, query: &Query) -> RenderResult<String>;

    /// Render a bare tree as a select or construct query, using a context
    /// map collected from that same tree.
    fn render_tree(&self, tree: &AlgebraNode, contexts: &ContextMap<'_>) -> RenderResult<String>;
}

/// Writes constants, compacting IRIs when configured
#[derive(Debug, Clone)]
pub(crate) struct TermFormatter {
    namespaces: Option<NamespaceManager>,
}

impl TermFormatter {
    pub(crate) fn new(config: &RenderConfig) -> Self {
        Self {
            namespaces: config.compact_iris.then(|| config.namespace_manager()),
        }
    }

    pub(crate) fn iri(&self, iri: &str) -> String {
        self.namespaces
            .as_ref()
            .and_then(|ns| ns.compact(iri))
            .unwrap_or_else(|| format!("<{}>", iri))
    }

    pub(crate) fn constant(&self, value: &RdfTerm) -> String {
        match value {
            RdfTerm::NamedNode(node) => self.iri(node.as_str()),
            RdfTerm::BlankNode(node) => node.to_string(),
            RdfTerm::Literal(lit) if self.namespaces.is_some() && typed(lit) => format!(
                "{}^^{}",
                Literal::new_simple_literal(lit.value()),
                self.iri(lit.datatype().as_str())
            ),
            RdfTerm::Literal(lit) => lit.to_string(),
        }
    }

    /// Namespaces that compaction uses for the given IRIs, in registration
    /// order. Empty when compaction is off.
    pub(crate) fn declarations(&self, iris: impl IntoIterator<Item = String>) -> Vec<Namespace> {
        let Some(namespaces) = &self.namespaces else {
            return Vec::new();
        };
        let used: FxHashSet<String> = iris
            .into_iter()
            .filter_map(|iri| namespaces.namespace_for(&iri).map(|(prefix, _)| prefix.to_string()))
            .collect();
        namespaces
            .prefixes()
            .into_iter()
            .filter(|ns| used.contains(&ns.prefix))
            .collect()
    }
}

fn typed(lit: &Literal) -> bool {
    lit.language().is_none() && !lit.is_plain()
}

/// Every IRI a tree writes: pattern constants, expression constants,
/// literal datatypes and function names.
pub(crate) fn tree_iris(tree: &AlgebraNode) -> Vec<String> {
    let mut out = Vec::new();
    collect_iris(tree, &mut out);
    out
}

fn collect_iris(node: &AlgebraNode, out: &mut Vec<String>) {
    match node {
        AlgebraNode::Pattern(pattern) => {
            for term in pattern.terms() {
                if let Some(value) = term.as_const() {
                    push_constant_iri(value, out);
                }
            }
        }
        AlgebraNode::LeftJoin { condition: Some(expr), .. } | AlgebraNode::Filter { condition: expr, .. } => {
            expr_iris(expr, out)
        }
        AlgebraNode::Extension { elems, .. } => {
            for elem in elems {
                expr_iris(&elem.expr, out);
            }
        }
        AlgebraNode::Order { elems, .. } => {
            for elem in elems {
                expr_iris(&elem.expr, out);
            }
        }
        _ => {}
    }
    for child in node.children() {
        collect_iris(child, out);
    }
}

pub(crate) fn expr_iris(expr: &ValueExpr, out: &mut Vec<String>) {
    expr.walk(&mut |e| match e {
        ValueExpr::Const(value) => push_constant_iri(value, out),
        ValueExpr::FunctionCall { function, .. } => out.push(function.as_str().to_string()),
        _ => {}
    });
}

pub(crate) fn push_constant_iri(value: &RdfTerm, out: &mut Vec<String>) {
    match value {
        RdfTerm::NamedNode(node) => out.push(node.as_str().to_string()),
        RdfTerm::Literal(lit) if typed(lit) => out.push(lit.datatype().as_str().to_string()),
        RdfTerm::Literal(_) | RdfTerm::BlankNode(_) => {}
    }
}
