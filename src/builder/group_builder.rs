//! Fluent group, union and filter builders
//!
//! Builders are consumed and returned by every call so that nested groups can
//! be written as closures. Errors are recorded and reported by
//! [`QueryBuilder::build`](super::QueryBuilder::build).

use super::group::Group;
use super::{BuilderError, BuilderResult};
use crate::algebra::{AlgebraNode, Term, TriplePattern, ValueExpr, Variable};

/// Builds one group of graph patterns
#[derive(Debug)]
pub struct GroupBuilder {
    group: Group,
    error: Option<BuilderError>,
}

impl GroupBuilder {
    pub(crate) fn new(optional: bool) -> Self {
        Self {
            group: Group::new(optional),
            error: None,
        }
    }

    /// Add a triple pattern. Strings name variables.
    pub fn atom(self, subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        self.pattern(TriplePattern::new(subject, predicate, object))
    }

    /// Add a triple pattern restricted to a named graph
    pub fn atom_in(
        self,
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
        context: impl Into<Term>,
    ) -> Self {
        self.pattern(TriplePattern::new(subject, predicate, object).with_context(context))
    }

    pub fn pattern(mut self, pattern: TriplePattern) -> Self {
        self.group.add_pattern(pattern);
        self
    }

    /// Add a pre-built algebra sub-expression to this group's body
    pub fn expr(mut self, expr: AlgebraNode) -> Self {
        self.group.add_expr(expr);
        self
    }

    /// Add a nested, mandatory group
    pub fn group(self, build: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        let child = build(GroupBuilder::new(false));
        self.attach(child)
    }

    /// Add a nested optional group
    pub fn optional(self, build: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        let child = build(GroupBuilder::new(true));
        self.attach(child)
    }

    /// Add a union of two groups
    pub fn union(mut self, build: impl FnOnce(UnionBuilder) -> UnionBuilder) -> Self {
        let union = build(UnionBuilder::new());
        match union.finish() {
            Ok(group) => self.add_child(group),
            Err(e) => self.record(e),
        }
        self
    }

    /// Attach a filter condition to this group
    pub fn filter(mut self, condition: ValueExpr) -> Self {
        self.group.add_filter(condition);
        self
    }

    /// Attach filters through the fluent condition builder. Every condition
    /// added becomes one filter of this group.
    pub fn filter_with(mut self, build: impl FnOnce(FilterBuilder) -> FilterBuilder) -> Self {
        for condition in build(FilterBuilder::new()).conditions {
            self.group.add_filter(condition);
        }
        self
    }

    pub(crate) fn finish(self) -> BuilderResult<Group> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.group),
        }
    }

    fn attach(mut self, child: GroupBuilder) -> Self {
        match child.finish() {
            Ok(group) => self.add_child(group),
            Err(e) => self.record(e),
        }
        self
    }

    fn add_child(&mut self, group: Group) {
        if let Err(e) = self.group.add_child(group) {
            self.record(e);
        }
    }

    fn record(&mut self, error: BuilderError) {
        self.error.get_or_insert(error);
    }
}

/// Builds a two-sided union
#[derive(Debug)]
pub struct UnionBuilder {
    group: Group,
    error: Option<BuilderError>,
}

impl UnionBuilder {
    fn new() -> Self {
        Self {
            group: Group::new_union(),
            error: None,
        }
    }

    /// Add one side of the union. A third side is an error.
    pub fn side(mut self, build: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        let result = build(GroupBuilder::new(false))
            .finish()
            .and_then(|side| self.group.add_child(side));
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
        self
    }

    fn finish(self) -> BuilderResult<Group> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.group),
        }
    }
}

/// Collects filter conditions. Operands accept strings (variables), terms,
/// RDF values and integers.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    conditions: Vec<ValueExpr>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary condition
    pub fn expr(mut self, condition: ValueExpr) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn bound(self, var: impl Into<Variable>) -> Self {
        self.expr(ValueExpr::bound(var))
    }

    pub fn not(self, condition: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::not(condition))
    }

    pub fn and(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::and(left, right))
    }

    pub fn or(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::or(left, right))
    }

    pub fn eq(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::eq(left, right))
    }

    pub fn ne(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::ne(left, right))
    }

    pub fn lt(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::lt(left, right))
    }

    pub fn le(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::le(left, right))
    }

    pub fn gt(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::gt(left, right))
    }

    pub fn ge(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::ge(left, right))
    }

    pub fn regex(self, arg: impl Into<ValueExpr>, pattern: &str) -> Self {
        self.expr(ValueExpr::regex(arg, pattern))
    }

    pub fn same_term(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::same_term(left, right))
    }

    pub fn lang_matches(self, left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        self.expr(ValueExpr::lang_matches(left, right))
    }
}
