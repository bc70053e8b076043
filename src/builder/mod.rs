//! Fluent query construction
//!
//! [`QueryBuilder`] collects groups, projections and modifiers and compiles
//! them into an [`AlgebraNode`](crate::algebra::AlgebraNode) tree:
//!
//! ```rust
//! use samyama_querybuilder::builder::QueryBuilder;
//! use samyama_querybuilder::rdf::NamedNode;
//!
//! let name = NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let mbox = NamedNode::new("http://xmlns.com/foaf/0.1/mbox").unwrap();
//!
//! let query = QueryBuilder::select()
//!     .add_projection_var(["name", "mbox"])
//!     .group(|g| {
//!         g.atom("x", name, "name")
//!             .optional(|o| o.atom("x", mbox, "mbox"))
//!     })
//!     .build()
//!     .unwrap();
//! assert_eq!(query.root().pattern_count(), 2);
//! ```

mod group;
mod group_builder;
mod query;

pub use group::Group;
pub use group_builder::{FilterBuilder, GroupBuilder, UnionBuilder};
pub use query::{Dataset, Query, QueryBuilder, QueryKind, CONST_VAR_PREFIX};

use thiserror::Error;

/// Builder errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Group has no patterns, sub-expressions or nested groups")]
    EmptyGroup,

    #[error("Union must have exactly 2 sides, got {sides}")]
    UnionArity { sides: usize },

    #[error("Query mixes variable projection with statement templates")]
    ProjectionConflict,
}

pub type BuilderResult<T> = Result<T, BuilderError>;
