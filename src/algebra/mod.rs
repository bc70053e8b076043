//! Query algebra
//!
//! The syntax-independent representation every builder call compiles into
//! and every renderer consumes:
//! - [`Term`] / [`TriplePattern`]: variables, constants and the pattern leaves
//! - [`ValueExpr`]: filter and left-join conditions
//! - [`AlgebraNode`]: the operator tree (join, left join, union, filter,
//!   projection, slice, ...)

mod term;
mod expr;
mod node;

pub use term::{Scope, Term, TriplePattern, Variable};
pub use expr::{CompareOp, ValueExpr};
pub use node::{
    AlgebraNode, ExtensionElem, NodeKind, OrderElem,
    ProjectionElem, ProjectionElemList, TripleRole,
};
