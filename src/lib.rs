//! Samyama Query Builder
//!
//! Fluent construction of RDF graph queries, compiled into a
//! syntax-independent algebra tree and rendered as SPARQL or SeRQL text.
//!
//! # Architecture
//!
//! Building flows one way:
//!
//! ```text
//! fluent calls → Group tree → compile → AlgebraNode tree
//!              → context collection → render → query text
//! ```
//!
//! - [`rdf`]: IRIs, blank nodes, literals (oxrdf) and namespace prefixes
//! - [`algebra`]: terms, value expressions and the operator tree
//! - [`builder`]: groups, the group compiler and [`QueryBuilder`]
//! - [`context`]: named-graph context collection
//! - [`render`]: the SPARQL and SeRQL renderers
//! - [`rewrite`]: limit/offset mutation and the describe rewrite
//! - [`config`]: renderer configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_querybuilder::{QueryBuilder, QueryRenderer, SparqlRenderer};
//! use samyama_querybuilder::rdf::NamedNode;
//!
//! let name = NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let mbox = NamedNode::new("http://xmlns.com/foaf/0.1/mbox").unwrap();
//!
//! let query = QueryBuilder::select()
//!     .add_projection_var(["name", "mbox"])
//!     .group(|g| g.atom("x", name, "name").atom("x", mbox, "mbox"))
//!     .build()
//!     .unwrap();
//!
//! let text = SparqlRenderer::new().render(&query).unwrap();
//! assert_eq!(
//!     text,
//!     "select ?name ?mbox\nwhere {\n  ?x <http://xmlns.com/foaf/0.1/name> ?name.\n  ?x <http://xmlns.com/foaf/0.1/mbox> ?mbox.\n}"
//! );
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algebra;
pub mod builder;
pub mod config;
pub mod context;
pub mod rdf;
pub mod render;
pub mod rewrite;

// Re-export main types for convenience
pub use algebra::{
    AlgebraNode, CompareOp, ExtensionElem, NodeKind, OrderElem, ProjectionElem,
    ProjectionElemList, Scope, Term, TriplePattern, TripleRole, ValueExpr, Variable,
};

pub use builder::{
    BuilderError, BuilderResult, Dataset, FilterBuilder, Group, GroupBuilder, Query,
    QueryBuilder, QueryKind, UnionBuilder,
};

pub use config::{ConfigError, ConfigResult, RenderConfig};

pub use context::{collect_contexts, ContextMap};

pub use rdf::{BlankNode, Literal, NamedNode, Namespace, NamespaceManager, RdfError, RdfTerm};

pub use render::{
    QueryParts, QueryRenderer, QueryShape, RenderError, RenderResult, SerqlRenderer,
    SparqlRenderer,
};

pub use rewrite::{DescribeScope, RewriteError, RewriteResult, Rewritten, SliceChange};

use thiserror::Error;

/// Any error raised by this crate
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Prefix(#[from] rdf::PrefixError),

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }

    #[test]
    fn test_errors_convert() {
        fn build() -> Result<Query> {
            Ok(QueryBuilder::select().build()?)
        }
        assert!(matches!(build(), Err(Error::Builder(BuilderError::EmptyGroup))));
    }
}
