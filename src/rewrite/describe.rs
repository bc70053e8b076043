//! Describe simulation
//!
//! A describe query is encoded as a projection onto three reserved
//! variables targeting `subject`/`predicate`/`object`. The rewrite keeps that
//! projection (so the tree now reads as a construct) and joins the body with
//! a generic statement pattern filtered to statements mentioning a target:
//!
//! ```text
//! Join(body, Filter(?_descr_subj ?_descr_pred ?_descr_obj,
//!      OR over targets t: sameTerm(t, ?_descr_subj) || sameTerm(t, ?_descr_obj)))
//! ```
//!
//! With [`DescribeScope::NamedGraphs`] the generic pattern carries the
//! `?_descr_ctx` context. Context promotion then lifts that context onto the
//! join, so body patterns without a context of their own are matched inside
//! the `?_descr_ctx` graph too, not against the default graph.

use super::{RewriteError, RewriteResult};
use crate::algebra::{AlgebraNode, ProjectionElemList, Term, TriplePattern, ValueExpr, Variable};
use tracing::debug;

/// Reserved prefix of the internal describe variables
pub const DESCRIBE_PREFIX: &str = "_descr_";
pub const DESCRIBE_SUBJECT: &str = "_descr_subj";
pub const DESCRIBE_PREDICATE: &str = "_descr_pred";
pub const DESCRIBE_OBJECT: &str = "_descr_obj";
pub const DESCRIBE_CONTEXT: &str = "_descr_ctx";

/// Which statements the generic pattern matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescribeScope {
    /// Default graph only
    #[default]
    DefaultGraph,
    /// Any named graph, bound to `?_descr_ctx`
    NamedGraphs,
}

/// Result of a speculative rewrite
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub tree: AlgebraNode,
    /// `false` when the tree was returned unchanged
    pub applied: bool,
}

/// Projection list marking a describe query
pub fn describe_projection() -> ProjectionElemList {
    ProjectionElemList::spo(DESCRIBE_SUBJECT, DESCRIBE_PREDICATE, DESCRIBE_OBJECT)
}

/// Whether the tree carries the describe projection
pub fn is_describe_shaped(tree: &AlgebraNode) -> bool {
    find_describe_projection(tree).is_some()
}

/// Rewrite a describe-shaped tree. Unrecognized trees and an empty target
/// list come back unchanged with `applied == false`.
pub fn rewrite_describe(tree: AlgebraNode, targets: &[Term], scope: DescribeScope) -> Rewritten {
    match try_rewrite_describe(tree.clone(), targets, scope) {
        Ok(tree) => Rewritten { tree, applied: true },
        Err(e) => {
            debug!("Describe rewrite skipped: {}", e);
            Rewritten { tree, applied: false }
        }
    }
}

/// Rewrite a describe-shaped tree, failing on anything else
pub fn try_rewrite_describe(
    mut tree: AlgebraNode,
    targets: &[Term],
    scope: DescribeScope,
) -> RewriteResult<AlgebraNode> {
    let condition = ValueExpr::fold_or(targets.iter().map(mentions))
        .ok_or_else(|| RewriteError::UnsupportedRewrite("describe without targets".to_string()))?;

    let body = find_describe_projection_mut(&mut tree).ok_or_else(|| {
        RewriteError::UnsupportedRewrite("tree has no describe projection".to_string())
    })?;

    let filtered = AlgebraNode::filter(AlgebraNode::pattern(generic_pattern(scope)), condition);
    *body = Some(Box::new(match body.take() {
        Some(old) => AlgebraNode::join(*old, filtered),
        None => filtered,
    }));

    debug!("Rewrote describe of {} target(s), scope {:?}", targets.len(), scope);
    Ok(tree)
}

fn generic_pattern(scope: DescribeScope) -> TriplePattern {
    let pattern = TriplePattern::new(
        Variable::anonymous(DESCRIBE_SUBJECT),
        Variable::anonymous(DESCRIBE_PREDICATE),
        Variable::anonymous(DESCRIBE_OBJECT),
    );
    match scope {
        DescribeScope::DefaultGraph => pattern,
        DescribeScope::NamedGraphs => pattern.with_context(Variable::anonymous(DESCRIBE_CONTEXT)),
    }
}

/// `sameTerm(t, ?_descr_subj) || sameTerm(t, ?_descr_obj)`
fn mentions(target: &Term) -> ValueExpr {
    ValueExpr::or(
        ValueExpr::same_term(target, Variable::anonymous(DESCRIBE_SUBJECT)),
        ValueExpr::same_term(target, Variable::anonymous(DESCRIBE_OBJECT)),
    )
}

fn is_describe_list(list: &ProjectionElemList) -> bool {
    list.is_spo() && list.iter().all(|e| e.source.starts_with(DESCRIBE_PREFIX))
}

fn is_describe_projection(node: &AlgebraNode) -> bool {
    match node {
        AlgebraNode::Projection { elems, .. } => is_describe_list(elems),
        AlgebraNode::MultiProjection { lists, .. } => lists.iter().any(is_describe_list),
        _ => false,
    }
}

fn find_describe_projection(node: &AlgebraNode) -> Option<&AlgebraNode> {
    if is_describe_projection(node) {
        return Some(node);
    }
    node.children().into_iter().find_map(find_describe_projection)
}

/// The body slot of the describe projection
fn find_describe_projection_mut(node: &mut AlgebraNode) -> Option<&mut Option<Box<AlgebraNode>>> {
    // Checked immutably first so the recursive arm can reborrow `node`
    if is_describe_projection(node) {
        return match node {
            AlgebraNode::Projection { arg, .. } | AlgebraNode::MultiProjection { arg, .. } => Some(arg),
            _ => None,
        };
    }
    node.children_mut().into_iter().find_map(find_describe_projection_mut)
}
