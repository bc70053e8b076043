//! Group compiler
//!
//! A [`Group`] accumulates patterns, nested groups and filters while a query
//! is being built, then folds them into a binary join tree:
//!
//! 1. own patterns/sub-expressions are joined left to right;
//! 2. own filters wrap that node, in insertion order;
//! 3. each child is attached with `Join`, or with `LeftJoin` when optional.
//!
//! An optional child holding only patterns and exactly one filter does not get
//! a `Filter` node: the filter becomes the `LeftJoin` condition instead, the
//! same scoping as a `FILTER` written inside `OPTIONAL { }`.

use super::{BuilderError, BuilderResult};
use crate::algebra::{AlgebraNode, TriplePattern, ValueExpr};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Basic,
    /// Exactly two child groups combined with `Union`
    Union,
}

/// Builder-time group of graph patterns
#[derive(Debug, Clone)]
pub struct Group {
    kind: GroupKind,
    optional: bool,
    body: Vec<AlgebraNode>,
    children: Vec<Group>,
    filters: Vec<ValueExpr>,
}

impl Group {
    /// Create an empty group
    pub fn new(optional: bool) -> Self {
        Self {
            kind: GroupKind::Basic,
            optional,
            body: Vec::new(),
            children: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Create an empty union; its two sides are added with [`Group::add_child`]
    pub fn new_union() -> Self {
        Self {
            kind: GroupKind::Union,
            ..Self::new(false)
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_union(&self) -> bool {
        self.kind == GroupKind::Union
    }

    pub fn add_pattern(&mut self, pattern: TriplePattern) {
        self.body.push(AlgebraNode::Pattern(pattern));
    }

    /// Add an already built sub-expression to the group's own body
    pub fn add_expr(&mut self, expr: AlgebraNode) {
        self.body.push(expr);
    }

    /// Add a nested group. A union accepts exactly two sides.
    pub fn add_child(&mut self, child: Group) -> BuilderResult<()> {
        if self.is_union() && self.children.len() >= 2 {
            return Err(BuilderError::UnionArity {
                sides: self.children.len() + 1,
            });
        }
        self.children.push(child);
        Ok(())
    }

    pub fn add_filter(&mut self, filter: ValueExpr) {
        self.filters.push(filter);
    }

    /// No patterns, sub-expressions or children
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.children.is_empty()
    }

    /// Pattern leaves added to this group and all its descendants
    pub fn pattern_count(&self) -> usize {
        self.body.iter().map(AlgebraNode::pattern_count).sum::<usize>()
            + self.children.iter().map(Group::pattern_count).sum::<usize>()
    }

    /// Compile the group into an algebra tree
    pub fn compile(self) -> BuilderResult<AlgebraNode> {
        if self.is_empty() {
            return Err(BuilderError::EmptyGroup);
        }

        let patterns = self.pattern_count();
        let node = match self.kind {
            GroupKind::Union => self.compile_union()?,
            GroupKind::Basic => self.compile_basic()?,
        };
        debug!("Compiled group with {} pattern(s) into {}", patterns, node.kind());
        Ok(node)
    }

    fn compile_union(self) -> BuilderResult<AlgebraNode> {
        let Group { children, filters, .. } = self;
        let sides = children.len();
        let [left, right]: [Group; 2] = children
            .try_into()
            .map_err(|_| BuilderError::UnionArity { sides })?;

        let node = AlgebraNode::union(left.compile()?, right.compile()?);
        Ok(wrap_filters(node, filters))
    }

    fn compile_basic(self) -> BuilderResult<AlgebraNode> {
        let Group { body, children, mut filters, .. } = self;

        // Own filters scope over own patterns. Without own patterns they are
        // applied once all children are attached.
        let mut acc = fold_join(body).map(|node| wrap_filters(node, std::mem::take(&mut filters)));

        for child in children {
            let optional = child.optional;
            let (right, condition) = child.compile_as_child()?;
            acc = Some(match acc {
                Some(left) if optional => AlgebraNode::left_join(left, right, condition),
                Some(left) => AlgebraNode::join(left, right),
                None if optional => AlgebraNode::left_join(AlgebraNode::SingletonSet, right, condition),
                None => right,
            });
        }

        acc.map(|node| wrap_filters(node, filters))
            .ok_or(BuilderError::EmptyGroup)
    }

    /// Compile a child, lifting its filter into a join condition when the
    /// child qualifies.
    fn compile_as_child(mut self) -> BuilderResult<(AlgebraNode, Option<ValueExpr>)> {
        if self.folds_filter_into_condition() {
            let condition = self.filters.pop();
            let node = fold_join(self.body).ok_or(BuilderError::EmptyGroup)?;
            return Ok((node, condition));
        }
        Ok((self.compile()?, None))
    }

    fn folds_filter_into_condition(&self) -> bool {
        self.optional
            && self.kind == GroupKind::Basic
            && self.filters.len() == 1
            && self.children.is_empty()
            && !self.body.is_empty()
            && self.body.iter().all(|n| matches!(n, AlgebraNode::Pattern(_)))
    }
}

fn fold_join(nodes: Vec<AlgebraNode>) -> Option<AlgebraNode> {
    nodes.into_iter().reduce(AlgebraNode::join)
}

fn wrap_filters(node: AlgebraNode, filters: Vec<ValueExpr>) -> AlgebraNode {
    filters.into_iter().fold(node, AlgebraNode::filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{NodeKind, TriplePattern, ValueExpr};

    fn atom(s: &str, o: &str) -> TriplePattern {
        TriplePattern::new(s, "p", o)
    }

    fn group_with(optional: bool, atoms: &[(&str, &str)]) -> Group {
        let mut g = Group::new(optional);
        for (s, o) in atoms {
            g.add_pattern(atom(s, o));
        }
        g
    }

    #[test]
    fn test_empty_group_fails() {
        assert!(matches!(Group::new(false).compile(), Err(BuilderError::EmptyGroup)));
    }

    #[test]
    fn test_single_pattern_is_not_wrapped() {
        let node = group_with(false, &[("x", "y")]).compile().unwrap();
        assert_eq!(node, AlgebraNode::Pattern(atom("x", "y")));
    }

    #[test]
    fn test_patterns_fold_left() {
        let node = group_with(false, &[("a", "b"), ("b", "c"), ("c", "d")])
            .compile()
            .unwrap();
        let expected = AlgebraNode::join(
            AlgebraNode::join(
                AlgebraNode::Pattern(atom("a", "b")),
                AlgebraNode::Pattern(atom("b", "c")),
            ),
            AlgebraNode::Pattern(atom("c", "d")),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_filters_wrap_in_insertion_order() {
        let mut g = group_with(false, &[("a", "b")]);
        g.add_filter(ValueExpr::bound("a"));
        g.add_filter(ValueExpr::bound("b"));

        let node = g.compile().unwrap();
        let expected = AlgebraNode::filter(
            AlgebraNode::filter(AlgebraNode::Pattern(atom("a", "b")), ValueExpr::bound("a")),
            ValueExpr::bound("b"),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_optional_child_becomes_left_join() {
        let mut g = group_with(false, &[("x", "name")]);
        g.add_child(group_with(true, &[("x", "mbox")])).unwrap();
        g.add_child(group_with(false, &[("x", "age")])).unwrap();

        let node = g.compile().unwrap();
        let expected = AlgebraNode::join(
            AlgebraNode::left_join(
                AlgebraNode::Pattern(atom("x", "name")),
                AlgebraNode::Pattern(atom("x", "mbox")),
                None,
            ),
            AlgebraNode::Pattern(atom("x", "age")),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_single_optional_filter_becomes_condition() {
        let mut optional = group_with(true, &[("x", "d")]);
        optional.add_filter(ValueExpr::bound("d"));

        let mut g = group_with(false, &[("x", "name")]);
        g.add_child(optional).unwrap();

        let node = g.compile().unwrap();
        let expected = AlgebraNode::left_join(
            AlgebraNode::Pattern(atom("x", "name")),
            AlgebraNode::Pattern(atom("x", "d")),
            Some(ValueExpr::bound("d")),
        );
        assert_eq!(node, expected);
        assert_eq!(node.count_kind(NodeKind::Filter), 0);
    }

    #[test]
    fn test_two_optional_filters_stay_filter_nodes() {
        let mut optional = group_with(true, &[("x", "d")]);
        optional.add_filter(ValueExpr::bound("d"));
        optional.add_filter(ValueExpr::bound("x"));

        let mut g = group_with(false, &[("x", "name")]);
        g.add_child(optional).unwrap();

        let node = g.compile().unwrap();
        assert_eq!(node.count_kind(NodeKind::Filter), 2);
        assert!(matches!(node, AlgebraNode::LeftJoin { condition: None, .. }));
    }

    #[test]
    fn test_optional_with_nested_group_keeps_filter_node() {
        let mut optional = group_with(true, &[("x", "d")]);
        optional.add_child(group_with(false, &[("d", "e")])).unwrap();
        optional.add_filter(ValueExpr::bound("d"));

        let mut g = group_with(false, &[("x", "name")]);
        g.add_child(optional).unwrap();

        let node = g.compile().unwrap();
        assert_eq!(node.count_kind(NodeKind::Filter), 1);
        assert!(matches!(node, AlgebraNode::LeftJoin { condition: None, .. }));
    }

    #[test]
    fn test_leading_optional_uses_singleton() {
        let mut g = Group::new(false);
        g.add_child(group_with(true, &[("x", "y")])).unwrap();

        let node = g.compile().unwrap();
        let expected = AlgebraNode::left_join(
            AlgebraNode::SingletonSet,
            AlgebraNode::Pattern(atom("x", "y")),
            None,
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_union_compiles_both_sides() {
        let mut union = Group::new_union();
        union.add_child(group_with(false, &[("x", "a")])).unwrap();
        union.add_child(group_with(false, &[("x", "b")])).unwrap();

        let mut g = group_with(false, &[("x", "name")]);
        g.add_child(union).unwrap();

        let node = g.compile().unwrap();
        let expected = AlgebraNode::join(
            AlgebraNode::Pattern(atom("x", "name")),
            AlgebraNode::union(
                AlgebraNode::Pattern(atom("x", "a")),
                AlgebraNode::Pattern(atom("x", "b")),
            ),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn test_third_union_side_is_rejected() {
        let mut union = Group::new_union();
        union.add_child(group_with(false, &[("x", "a")])).unwrap();
        union.add_child(group_with(false, &[("x", "b")])).unwrap();
        let err = union.add_child(group_with(false, &[("x", "c")])).unwrap_err();
        assert!(matches!(err, BuilderError::UnionArity { sides: 3 }));
    }

    #[test]
    fn test_one_sided_union_fails_to_compile() {
        let mut union = Group::new_union();
        union.add_child(group_with(false, &[("x", "a")])).unwrap();
        assert!(matches!(union.compile(), Err(BuilderError::UnionArity { sides: 1 })));
    }

    #[test]
    fn test_pattern_count_is_preserved() {
        let mut nested = group_with(false, &[("a", "b"), ("b", "c")]);
        nested.add_child(group_with(true, &[("c", "d")])).unwrap();

        let mut g = group_with(false, &[("x", "y")]);
        g.add_child(nested).unwrap();
        g.add_child(group_with(true, &[("y", "z"), ("z", "w")])).unwrap();

        let added = g.pattern_count();
        let node = g.compile().unwrap();
        assert_eq!(added, 6);
        assert_eq!(node.pattern_count(), added);
    }
}
