//! Query builder and compiled query

use super::group::Group;
use super::group_builder::GroupBuilder;
use super::{BuilderError, BuilderResult};
use crate::algebra::{
    AlgebraNode, ExtensionElem, OrderElem, ProjectionElem, ProjectionElemList, Term, ValueExpr,
};
use crate::rdf::NamedNode;
use crate::rewrite::{self, DescribeScope, RewriteResult, SliceChange};
use tracing::debug;

/// Prefix of the variables that carry constants of a construct template
pub const CONST_VAR_PREFIX: &str = "_const_";

/// Output shape of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Tuples of named bindings
    Select,
    /// Statements built from projection templates
    Construct,
    /// Boolean: does the pattern match at all
    Ask,
    /// Every statement about the given resources
    Describe { targets: Vec<Term> },
}

impl QueryKind {
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Select => "select",
            QueryKind::Construct => "construct",
            QueryKind::Ask => "ask",
            QueryKind::Describe { .. } => "describe",
        }
    }
}

/// Graphs the query is evaluated against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub default_graphs: Vec<NamedNode>,
    pub named_graphs: Vec<NamedNode>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.default_graphs.is_empty() && self.named_graphs.is_empty()
    }
}

/// A compiled query: algebra tree plus output shape
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    kind: QueryKind,
    root: AlgebraNode,
    dataset: Dataset,
}

impl Query {
    pub fn new(kind: QueryKind, root: AlgebraNode) -> Self {
        Self {
            kind,
            root,
            dataset: Dataset::default(),
        }
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = dataset;
        self
    }

    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    pub fn root(&self) -> &AlgebraNode {
        &self.root
    }

    pub fn into_root(self) -> AlgebraNode {
        self.root
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Set the limit, reusing an existing slice node when there is one
    pub fn set_limit(&mut self, limit: u64) -> RewriteResult<SliceChange> {
        rewrite::set_limit(&mut self.root, limit)
    }

    pub fn set_offset(&mut self, offset: u64) -> RewriteResult<SliceChange> {
        rewrite::set_offset(&mut self.root, offset)
    }

    pub fn set_limit_and_offset(&mut self, limit: u64, offset: u64) -> RewriteResult<SliceChange> {
        rewrite::set_limit_and_offset(&mut self.root, limit, offset)
    }

    /// Turn a describe query into the equivalent construct query. Returns
    /// `false` and leaves the query untouched when it is not a describe.
    pub fn rewrite_describe(&mut self, scope: DescribeScope) -> bool {
        let QueryKind::Describe { targets } = &self.kind else {
            return false;
        };
        let root = std::mem::replace(&mut self.root, AlgebraNode::SingletonSet);
        let rewritten = rewrite::rewrite_describe(root, targets, scope);
        self.root = rewritten.tree;
        if rewritten.applied {
            self.kind = QueryKind::Construct;
        }
        rewritten.applied
    }
}

/// Fluent query builder
///
/// ```rust
/// use samyama_querybuilder::builder::QueryBuilder;
/// use samyama_querybuilder::rdf::NamedNode;
///
/// let name = NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap();
/// let query = QueryBuilder::select()
///     .add_projection_var(["name"])
///     .group(|g| g.atom("x", name, "name"))
///     .build()
///     .unwrap();
/// assert_eq!(query.root().pattern_count(), 1);
/// ```
#[derive(Debug)]
pub struct QueryBuilder {
    kind: QueryKind,
    groups: Vec<Group>,
    projection: Vec<String>,
    templates: Vec<[Term; 3]>,
    distinct: bool,
    reduced: bool,
    limit: Option<u64>,
    offset: Option<u64>,
    order: Vec<OrderElem>,
    dataset: Dataset,
    error: Option<BuilderError>,
}

impl QueryBuilder {
    fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            groups: Vec::new(),
            projection: Vec::new(),
            templates: Vec::new(),
            distinct: false,
            reduced: false,
            limit: None,
            offset: None,
            order: Vec::new(),
            dataset: Dataset::default(),
            error: None,
        }
    }

    pub fn select() -> Self {
        Self::new(QueryKind::Select)
    }

    pub fn construct() -> Self {
        Self::new(QueryKind::Construct)
    }

    pub fn ask() -> Self {
        Self::new(QueryKind::Ask)
    }

    /// Describe the given resources; strings name variables bound by the
    /// query's groups.
    pub fn describe<T: Into<Term>>(targets: impl IntoIterator<Item = T>) -> Self {
        Self::new(QueryKind::Describe {
            targets: targets.into_iter().map(Into::into).collect(),
        })
    }

    /// Project variables by name
    pub fn add_projection_var<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.projection.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add a statement template to a construct-shaped projection
    pub fn add_projection_statement(
        mut self,
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        self.templates.push([subject.into(), predicate.into(), object.into()]);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn reduced(mut self) -> Self {
        self.reduced = true;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order_by(mut self, expr: impl Into<ValueExpr>) -> Self {
        self.order.push(OrderElem::asc(expr));
        self
    }

    pub fn order_by_desc(mut self, expr: impl Into<ValueExpr>) -> Self {
        self.order.push(OrderElem::desc(expr));
        self
    }

    /// Add a graph to the default dataset
    pub fn from_graph(mut self, graph: NamedNode) -> Self {
        self.dataset.default_graphs.push(graph);
        self
    }

    /// Add a named graph to the dataset
    pub fn from_named(mut self, graph: NamedNode) -> Self {
        self.dataset.named_graphs.push(graph);
        self
    }

    /// Add a top-level group. Several groups are joined in order.
    pub fn group(mut self, build: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        match build(GroupBuilder::new(false)).finish() {
            Ok(group) => self.groups.push(group),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Compile into a [`Query`]
    pub fn build(self) -> BuilderResult<Query> {
        let kind = self.kind.clone();
        let dataset = self.dataset.clone();
        let root = self.compile()?;
        debug!("Built {} query with {} pattern(s)", kind.name(), root.pattern_count());
        Ok(Query::new(kind, root).with_dataset(dataset))
    }

    /// Alias of [`QueryBuilder::build`]
    pub fn query(self) -> BuilderResult<Query> {
        self.build()
    }

    /// Compile into the bare algebra tree
    pub fn compile(self) -> BuilderResult<AlgebraNode> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if !self.projection.is_empty() && !self.templates.is_empty() {
            return Err(BuilderError::ProjectionConflict);
        }
        let describing = matches!(self.kind, QueryKind::Describe { .. });
        if describing && (!self.projection.is_empty() || !self.templates.is_empty()) {
            return Err(BuilderError::ProjectionConflict);
        }

        let mut body = None;
        for group in self.groups {
            let node = group.compile()?;
            body = Some(match body {
                Some(left) => AlgebraNode::join(left, node),
                None => node,
            });
        }
        // Only a describe of constants may go without a where clause.
        if body.is_none() && !describing {
            return Err(BuilderError::EmptyGroup);
        }

        if !self.order.is_empty() {
            body = body.map(|node| AlgebraNode::order(node, self.order));
        }

        let mut root = match self.kind {
            QueryKind::Ask => body.ok_or(BuilderError::EmptyGroup)?,
            QueryKind::Describe { .. } => {
                AlgebraNode::projection(body, rewrite::describe_projection())
            }
            QueryKind::Select | QueryKind::Construct if !self.templates.is_empty() => {
                template_projection(body, self.templates)
            }
            QueryKind::Select | QueryKind::Construct => {
                let elems = self.projection.into_iter().map(ProjectionElem::same).collect();
                AlgebraNode::projection(body, ProjectionElemList::new(elems))
            }
        };

        if self.distinct {
            root = AlgebraNode::distinct(root);
        } else if self.reduced {
            root = AlgebraNode::reduced(root);
        }
        if self.limit.is_some() || self.offset.is_some() {
            root = AlgebraNode::slice(root, self.limit, self.offset);
        }
        Ok(root)
    }
}

/// Statement templates: variables project directly, constants are bound to
/// `_const_N` variables through an extension.
fn template_projection(body: Option<AlgebraNode>, templates: Vec<[Term; 3]>) -> AlgebraNode {
    let mut constants = Vec::new();
    let mut lists = Vec::with_capacity(templates.len());

    for template in templates {
        let [s, p, o] = template.map(|term| match term {
            Term::Var(v) => v.name().to_string(),
            Term::Const(value) => {
                let name = format!("{}{}", CONST_VAR_PREFIX, constants.len() + 1);
                constants.push(ExtensionElem::new(name.clone(), ValueExpr::Const(value)));
                name
            }
        });
        lists.push(ProjectionElemList::spo(s, p, o));
    }

    let body = match body {
        Some(node) if !constants.is_empty() => Some(AlgebraNode::extension(node, constants)),
        other => other,
    };

    if lists.len() == 1 {
        let list = lists.pop().unwrap_or_default();
        AlgebraNode::projection(body, list)
    } else {
        AlgebraNode::multi_projection(body, lists)
    }
}
