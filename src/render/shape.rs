//! Query shape detection and wrapper peeling
//!
//! Projection, extension, ordering, distinct/reduced and slice nodes wrap the
//! query body. Renderers write them as a header and footer, so they are
//! peeled off the tree before the body is walked.

use crate::algebra::{AlgebraNode, OrderElem, ProjectionElemList, ValueExpr};
use indexmap::IndexMap;

/// Output shape derived from the projection lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// Named bindings
    Select,
    /// Statement templates (`subject`/`predicate`/`object` targets)
    Construct,
}

impl QueryShape {
    pub fn detect(root: &AlgebraNode) -> Self {
        QueryParts::peel(root).shape()
    }

    pub fn of_lists<'a>(lists: impl IntoIterator<Item = &'a ProjectionElemList>) -> Self {
        if lists.into_iter().any(ProjectionElemList::is_spo) {
            QueryShape::Construct
        } else {
            QueryShape::Select
        }
    }
}

/// Wrapper nodes of a query, split from its body
#[derive(Debug, Clone, Default)]
pub struct QueryParts<'t> {
    /// First node below the wrappers; `None` for a projection without input
    pub body: Option<&'t AlgebraNode>,
    /// One list for a projection, several for a multi-projection
    pub projections: Vec<&'t ProjectionElemList>,
    /// Extension bindings by name
    pub extensions: IndexMap<&'t str, &'t ValueExpr>,
    pub order: Vec<&'t OrderElem>,
    pub distinct: bool,
    pub reduced: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl<'t> QueryParts<'t> {
    /// Peel wrappers from the root down. Each wrapper kind is taken once;
    /// a repeated wrapper stays in the body.
    pub fn peel(root: &'t AlgebraNode) -> Self {
        let mut parts = QueryParts::default();
        let mut seen = Seen::default();
        let mut current = Some(root);

        while let Some(node) = current {
            current = match node {
                AlgebraNode::Slice { arg, limit, offset } if !seen.slice => {
                    seen.slice = true;
                    parts.limit = *limit;
                    parts.offset = *offset;
                    Some(arg.as_ref())
                }
                AlgebraNode::Distinct(arg) if !seen.modifier => {
                    seen.modifier = true;
                    parts.distinct = true;
                    Some(arg.as_ref())
                }
                AlgebraNode::Reduced(arg) if !seen.modifier => {
                    seen.modifier = true;
                    parts.reduced = true;
                    Some(arg.as_ref())
                }
                AlgebraNode::Projection { arg, elems } if !seen.projection => {
                    seen.projection = true;
                    parts.projections.push(elems);
                    arg.as_deref()
                }
                AlgebraNode::MultiProjection { arg, lists } if !seen.projection => {
                    seen.projection = true;
                    parts.projections.extend(lists.iter());
                    arg.as_deref()
                }
                AlgebraNode::Extension { arg, elems } if !seen.extension => {
                    seen.extension = true;
                    parts
                        .extensions
                        .extend(elems.iter().map(|e| (e.name.as_str(), &e.expr)));
                    Some(arg.as_ref())
                }
                AlgebraNode::Order { arg, elems } if !seen.order => {
                    seen.order = true;
                    parts.order.extend(elems.iter());
                    Some(arg.as_ref())
                }
                body => {
                    parts.body = Some(body);
                    None
                }
            };
        }
        parts
    }

    pub fn shape(&self) -> QueryShape {
        QueryShape::of_lists(self.projections.iter().copied())
    }

    /// Expression bound to `name` by the extension, if any
    pub fn extension(&self, name: &str) -> Option<&'t ValueExpr> {
        self.extensions.get(name).copied()
    }

    /// Extension bindings no projection element refers to
    pub fn unreferenced_extensions(&self) -> Vec<(&'t str, &'t ValueExpr)> {
        self.extensions
            .iter()
            .filter(|(name, _)| {
                !self
                    .projections
                    .iter()
                    .any(|list| list.iter().any(|e| e.source == **name))
            })
            .map(|(name, expr)| (*name, *expr))
            .collect()
    }
}

#[derive(Default)]
struct Seen {
    slice: bool,
    modifier: bool,
    projection: bool,
    extension: bool,
    order: bool,
}
