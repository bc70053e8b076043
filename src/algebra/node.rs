//! Algebra tree (tuple expressions)
//!
//! A closed sum type: every renderer and rewrite matches on it exhaustively,
//! so adding a node kind is a compile error until all passes handle it.

use super::expr::ValueExpr;
use super::term::TriplePattern;
use std::fmt;

/// The role a construct-template element plays in the produced statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripleRole {
    Subject,
    Predicate,
    Object,
}

impl TripleRole {
    /// Canonical target name used in projection element lists
    pub fn target_name(&self) -> &'static str {
        match self {
            TripleRole::Subject => "subject",
            TripleRole::Predicate => "predicate",
            TripleRole::Object => "object",
        }
    }

    fn from_target(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("subject") {
            Some(TripleRole::Subject)
        } else if name.eq_ignore_ascii_case("predicate") {
            Some(TripleRole::Predicate)
        } else if name.eq_ignore_ascii_case("object") {
            Some(TripleRole::Object)
        } else {
            None
        }
    }
}

/// Maps an internal binding name to an output name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionElem {
    pub source: String,
    pub target: String,
}

impl ProjectionElem {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Projection of a variable under its own name
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            target: name,
        }
    }

    /// Triple role derived from the target name (`subject`/`predicate`/`object`,
    /// case-insensitive)
    pub fn role(&self) -> Option<TripleRole> {
        TripleRole::from_target(&self.target)
    }
}

/// Ordered list of projection elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProjectionElemList {
    elems: Vec<ProjectionElem>,
}

impl ProjectionElemList {
    pub fn new(elems: Vec<ProjectionElem>) -> Self {
        Self { elems }
    }

    /// Construct-template list: `source → subject/predicate/object`
    pub fn spo(subject: impl Into<String>, predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Self::new(vec![
            ProjectionElem::new(subject, TripleRole::Subject.target_name()),
            ProjectionElem::new(predicate, TripleRole::Predicate.target_name()),
            ProjectionElem::new(object, TripleRole::Object.target_name()),
        ])
    }

    pub fn push(&mut self, elem: ProjectionElem) {
        self.elems.push(elem);
    }

    pub fn elems(&self) -> &[ProjectionElem] {
        &self.elems
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionElem> {
        self.elems.iter()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Exactly three elements targeting subject, predicate and object, in
    /// that order. This naming convention is the only signal that a
    /// projection describes a statement template.
    pub fn is_spo(&self) -> bool {
        self.elems.len() == 3
            && self.elems[0].role() == Some(TripleRole::Subject)
            && self.elems[1].role() == Some(TripleRole::Predicate)
            && self.elems[2].role() == Some(TripleRole::Object)
    }

    /// Element for a role, if the list is a statement template
    pub fn by_role(&self, role: TripleRole) -> Option<&ProjectionElem> {
        self.elems.iter().find(|e| e.role() == Some(role))
    }
}

impl<'a> IntoIterator for &'a ProjectionElemList {
    type Item = &'a ProjectionElem;
    type IntoIter = std::slice::Iter<'a, ProjectionElem>;

    fn into_iter(self) -> Self::IntoIter {
        self.elems.iter()
    }
}

/// Binds a name to a computed value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionElem {
    pub name: String,
    pub expr: ValueExpr,
}

impl ExtensionElem {
    pub fn new(name: impl Into<String>, expr: ValueExpr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderElem {
    pub expr: ValueExpr,
    pub ascending: bool,
}

impl OrderElem {
    pub fn asc(expr: impl Into<ValueExpr>) -> Self {
        Self {
            expr: expr.into(),
            ascending: true,
        }
    }

    pub fn desc(expr: impl Into<ValueExpr>) -> Self {
        Self {
            expr: expr.into(),
            ascending: false,
        }
    }
}

/// Node kinds, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SingletonSet,
    Pattern,
    Join,
    LeftJoin,
    Union,
    Difference,
    Intersection,
    Filter,
    Projection,
    MultiProjection,
    Extension,
    Order,
    Distinct,
    Reduced,
    Slice,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Query algebra operator. Each inner node owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlgebraNode {
    /// One empty solution; neutral element of join
    SingletonSet,
    Pattern(TriplePattern),
    Join {
        left: Box<AlgebraNode>,
        right: Box<AlgebraNode>,
    },
    LeftJoin {
        left: Box<AlgebraNode>,
        right: Box<AlgebraNode>,
        condition: Option<ValueExpr>,
    },
    Union {
        left: Box<AlgebraNode>,
        right: Box<AlgebraNode>,
    },
    Difference {
        left: Box<AlgebraNode>,
        right: Box<AlgebraNode>,
    },
    Intersection {
        left: Box<AlgebraNode>,
        right: Box<AlgebraNode>,
    },
    Filter {
        arg: Box<AlgebraNode>,
        condition: ValueExpr,
    },
    Projection {
        arg: Option<Box<AlgebraNode>>,
        elems: ProjectionElemList,
    },
    MultiProjection {
        arg: Option<Box<AlgebraNode>>,
        lists: Vec<ProjectionElemList>,
    },
    Extension {
        arg: Box<AlgebraNode>,
        elems: Vec<ExtensionElem>,
    },
    Order {
        arg: Box<AlgebraNode>,
        elems: Vec<OrderElem>,
    },
    Distinct(Box<AlgebraNode>),
    Reduced(Box<AlgebraNode>),
    Slice {
        arg: Box<AlgebraNode>,
        limit: Option<u64>,
        offset: Option<u64>,
    },
}

impl AlgebraNode {
    pub fn pattern(pattern: TriplePattern) -> Self {
        AlgebraNode::Pattern(pattern)
    }

    pub fn join(left: AlgebraNode, right: AlgebraNode) -> Self {
        AlgebraNode::Join {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn left_join(left: AlgebraNode, right: AlgebraNode, condition: Option<ValueExpr>) -> Self {
        AlgebraNode::LeftJoin {
            left: Box::new(left),
            right: Box::new(right),
            condition,
        }
    }

    pub fn union(left: AlgebraNode, right: AlgebraNode) -> Self {
        AlgebraNode::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn difference(left: AlgebraNode, right: AlgebraNode) -> Self {
        AlgebraNode::Difference {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn intersection(left: AlgebraNode, right: AlgebraNode) -> Self {
        AlgebraNode::Intersection {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn filter(arg: AlgebraNode, condition: ValueExpr) -> Self {
        AlgebraNode::Filter {
            arg: Box::new(arg),
            condition,
        }
    }

    pub fn projection(arg: Option<AlgebraNode>, elems: ProjectionElemList) -> Self {
        AlgebraNode::Projection {
            arg: arg.map(Box::new),
            elems,
        }
    }

    pub fn multi_projection(arg: Option<AlgebraNode>, lists: Vec<ProjectionElemList>) -> Self {
        AlgebraNode::MultiProjection {
            arg: arg.map(Box::new),
            lists,
        }
    }

    pub fn extension(arg: AlgebraNode, elems: Vec<ExtensionElem>) -> Self {
        AlgebraNode::Extension {
            arg: Box::new(arg),
            elems,
        }
    }

    pub fn order(arg: AlgebraNode, elems: Vec<OrderElem>) -> Self {
        AlgebraNode::Order {
            arg: Box::new(arg),
            elems,
        }
    }

    pub fn distinct(arg: AlgebraNode) -> Self {
        AlgebraNode::Distinct(Box::new(arg))
    }

    pub fn reduced(arg: AlgebraNode) -> Self {
        AlgebraNode::Reduced(Box::new(arg))
    }

    pub fn slice(arg: AlgebraNode, limit: Option<u64>, offset: Option<u64>) -> Self {
        AlgebraNode::Slice {
            arg: Box::new(arg),
            limit,
            offset,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            AlgebraNode::SingletonSet => NodeKind::SingletonSet,
            AlgebraNode::Pattern(_) => NodeKind::Pattern,
            AlgebraNode::Join { .. } => NodeKind::Join,
            AlgebraNode::LeftJoin { .. } => NodeKind::LeftJoin,
            AlgebraNode::Union { .. } => NodeKind::Union,
            AlgebraNode::Difference { .. } => NodeKind::Difference,
            AlgebraNode::Intersection { .. } => NodeKind::Intersection,
            AlgebraNode::Filter { .. } => NodeKind::Filter,
            AlgebraNode::Projection { .. } => NodeKind::Projection,
            AlgebraNode::MultiProjection { .. } => NodeKind::MultiProjection,
            AlgebraNode::Extension { .. } => NodeKind::Extension,
            AlgebraNode::Order { .. } => NodeKind::Order,
            AlgebraNode::Distinct(_) => NodeKind::Distinct,
            AlgebraNode::Reduced(_) => NodeKind::Reduced,
            AlgebraNode::Slice { .. } => NodeKind::Slice,
        }
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&AlgebraNode> {
        match self {
            AlgebraNode::SingletonSet | AlgebraNode::Pattern(_) => Vec::new(),
            AlgebraNode::Join { left, right }
            | AlgebraNode::LeftJoin { left, right, .. }
            | AlgebraNode::Union { left, right }
            | AlgebraNode::Difference { left, right }
            | AlgebraNode::Intersection { left, right } => vec![left.as_ref(), right.as_ref()],
            AlgebraNode::Filter { arg, .. }
            | AlgebraNode::Extension { arg, .. }
            | AlgebraNode::Order { arg, .. }
            | AlgebraNode::Distinct(arg)
            | AlgebraNode::Reduced(arg)
            | AlgebraNode::Slice { arg, .. } => vec![arg.as_ref()],
            AlgebraNode::Projection { arg, .. } | AlgebraNode::MultiProjection { arg, .. } => {
                arg.as_deref().into_iter().collect()
            }
        }
    }

    /// Direct children, mutable
    pub fn children_mut(&mut self) -> Vec<&mut AlgebraNode> {
        match self {
            AlgebraNode::SingletonSet | AlgebraNode::Pattern(_) => Vec::new(),
            AlgebraNode::Join { left, right }
            | AlgebraNode::LeftJoin { left, right, .. }
            | AlgebraNode::Union { left, right }
            | AlgebraNode::Difference { left, right }
            | AlgebraNode::Intersection { left, right } => vec![left.as_mut(), right.as_mut()],
            AlgebraNode::Filter { arg, .. }
            | AlgebraNode::Extension { arg, .. }
            | AlgebraNode::Order { arg, .. }
            | AlgebraNode::Distinct(arg)
            | AlgebraNode::Reduced(arg)
            | AlgebraNode::Slice { arg, .. } => vec![arg.as_mut()],
            AlgebraNode::Projection { arg, .. } | AlgebraNode::MultiProjection { arg, .. } => {
                arg.as_deref_mut().into_iter().collect()
            }
        }
    }

    /// Triple pattern leaves in left-to-right order
    pub fn patterns(&self) -> Vec<&TriplePattern> {
        let mut out = Vec::new();
        self.collect_patterns(&mut out);
        out
    }

    fn collect_patterns<'a>(&'a self, out: &mut Vec<&'a TriplePattern>) {
        if let AlgebraNode::Pattern(p) = self {
            out.push(p);
        }
        for child in self.children() {
            child.collect_patterns(out);
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.count_kind(NodeKind::Pattern)
    }

    /// Number of nodes of the given kind in the subtree, self included
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        let own = usize::from(self.kind() == kind);
        own + self
            .children()
            .into_iter()
            .map(|c| c.count_kind(kind))
            .sum::<usize>()
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "   ".repeat(depth);
        match self {
            AlgebraNode::Pattern(p) => writeln!(f, "{}Pattern({})", pad, p)?,
            AlgebraNode::LeftJoin { condition: Some(c), .. } => {
                writeln!(f, "{}LeftJoin [{:?}]", pad, c)?
            }
            AlgebraNode::Filter { condition, .. } => writeln!(f, "{}Filter [{:?}]", pad, condition)?,
            AlgebraNode::Projection { elems, .. } => {
                let names: Vec<_> = elems
                    .iter()
                    .map(|e| format!("{}->{}", e.source, e.target))
                    .collect();
                writeln!(f, "{}Projection ({})", pad, names.join(", "))?
            }
            AlgebraNode::MultiProjection { lists, .. } => {
                writeln!(f, "{}MultiProjection ({} lists)", pad, lists.len())?
            }
            AlgebraNode::Slice { limit, offset, .. } => {
                writeln!(f, "{}Slice (limit={:?}, offset={:?})", pad, limit, offset)?
            }
            other => writeln!(f, "{}{}", pad, other.kind())?,
        }
        for child in self.children() {
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented operator tree, one node per line
impl fmt::Display for AlgebraNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
