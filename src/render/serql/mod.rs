//! SeRQL renderer
//!
//! The join tree is flattened into comma-separated path expressions of a
//! from-clause, optional parts become `[ ... ]` brackets, and every filter
//! is and-ed into a single where-clause:
//!
//! ```text
//! select name, mbox
//! from
//!   {x} <http://xmlns.com/foaf/0.1/name> {name},
//!   [{x} <http://xmlns.com/foaf/0.1/mbox> {mbox}]
//! where isLiteral(name)
//! limit 10
//! ```
//!
//! Paths under a graph context go to their own `from context <g>` clause;
//! a from-clause carries at most one context, so a query over several
//! graphs repeats `from`. An optional part must sit in its parent's context.
//! Set operations are only supported at the top of the body, where they
//! combine parenthesised sub-queries.

mod expr;

pub use expr::SerqlExprRenderer;

use super::shape::{QueryParts, QueryShape};
use super::{tree_iris, QueryRenderer, RenderError, RenderResult, TermFormatter};
use crate::algebra::{AlgebraNode, NodeKind, ProjectionElemList, Term, TriplePattern, TripleRole, ValueExpr};
use crate::builder::{Query, QueryKind};
use crate::config::RenderConfig;
use crate::context::ContextMap;
use crate::rewrite::DescribeScope;
use indexmap::IndexMap;
use tracing::trace;

const TARGET: &str = "SeRQL";

/// Renders queries as SeRQL text
#[derive(Debug, Clone)]
pub struct SerqlRenderer {
    config: RenderConfig,
    terms: TermFormatter,
}

/// From-clause items and where-conditions collected from a join tree
#[derive(Debug, Default)]
struct Clauses<'t> {
    /// Rendered context (`None` for the default graph) → path items
    paths: IndexMap<Option<String>, Vec<String>>,
    conditions: Vec<&'t ValueExpr>,
}

impl SerqlRenderer {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        let terms = TermFormatter::new(&config);
        Self { config, terms }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn exprs(&self) -> SerqlExprRenderer<'_> {
        SerqlExprRenderer::new(&self.terms)
    }

    fn render_parts(&self, tree: &AlgebraNode, contexts: &ContextMap<'_>) -> RenderResult<String> {
        let parts = QueryParts::peel(tree);
        let exprs = self.exprs();

        let header = match parts.shape() {
            QueryShape::Select => self.select_header(&parts)?,
            QueryShape::Construct => self.construct_header(&parts)?,
        };
        let mut out = match parts.body {
            Some(body) => self.query_body(&header, body, None, contexts)?,
            None => header,
        };

        if !parts.order.is_empty() {
            let keys: Vec<_> = parts
                .order
                .iter()
                .map(|o| {
                    let key = exprs.nested(&o.expr);
                    if o.ascending {
                        key
                    } else {
                        format!("{} desc", key)
                    }
                })
                .collect();
            out.push_str(&format!("\norder by {}", keys.join(", ")));
        }
        if let Some(limit) = parts.limit {
            out.push_str(&format!("\nlimit {}", limit));
        }
        if let Some(offset) = parts.offset {
            out.push_str(&format!("\noffset {}", offset));
        }

        let declarations = self.terms.declarations(tree_iris(tree));
        if !declarations.is_empty() {
            let lines: Vec<_> = declarations
                .iter()
                .map(|ns| format!("{}{} = <{}>", self.config.indent(1), ns.prefix, ns.iri))
                .collect();
            out.push_str(&format!("\nusing namespace\n{}", lines.join(",\n")));
        }

        trace!("Rendered SeRQL query:\n{}", out);
        Ok(out)
    }

    fn select_header(&self, parts: &QueryParts<'_>) -> RenderResult<String> {
        self.check_extensions(parts)?;

        let mut out = String::from("select");
        push_modifier(&mut out, parts);
        let list = match parts.projections.as_slice() {
            [] => None,
            [list] => Some(*list),
            _ => {
                return Err(RenderError::UnsupportedQuery {
                    target: TARGET,
                    feature: "several select projections".to_string(),
                })
            }
        };

        match list {
            Some(list) if !list.is_empty() => {
                let items: Vec<_> = list
                    .iter()
                    .map(|elem| match parts.extension(&elem.source) {
                        Some(expr) => format!("{} as {}", self.exprs().render(expr), elem.target),
                        None if elem.source == elem.target => elem.source.clone(),
                        None => format!("{} as {}", elem.source, elem.target),
                    })
                    .collect();
                out.push(' ');
                out.push_str(&items.join(", "));
            }
            _ => out.push_str(" *"),
        }
        Ok(out)
    }

    fn construct_header(&self, parts: &QueryParts<'_>) -> RenderResult<String> {
        self.check_extensions(parts)?;

        let mut out = String::from("construct");
        push_modifier(&mut out, parts);
        let templates = parts
            .projections
            .iter()
            .filter(|l| l.is_spo())
            .map(|list| self.template(parts, list))
            .collect::<RenderResult<Vec<_>>>()?;
        out.push(' ');
        out.push_str(&templates.join(", "));
        Ok(out)
    }

    fn template(&self, parts: &QueryParts<'_>, list: &ProjectionElemList) -> RenderResult<String> {
        let [s, p, o] = [TripleRole::Subject, TripleRole::Predicate, TripleRole::Object].map(|role| {
            let source = list.by_role(role).map(|e| e.source.as_str()).unwrap_or_default();
            match parts.extension(source) {
                Some(ValueExpr::Const(value)) => Ok(self.terms.constant(value)),
                Some(_) => Err(RenderError::UnsupportedPosition {
                    target: TARGET,
                    kind: NodeKind::Extension,
                }),
                None => Ok(source.to_string()),
            }
        });
        Ok(format!("{{{}}} {} {{{}}}", s?, p?, o?))
    }

    /// Extension bindings can only surface through a projection
    fn check_extensions(&self, parts: &QueryParts<'_>) -> RenderResult<()> {
        if parts.unreferenced_extensions().is_empty() {
            Ok(())
        } else {
            Err(RenderError::UnsupportedNode {
                target: TARGET,
                kind: NodeKind::Extension,
            })
        }
    }

    /// From- and where-clauses under the header; set operations combine
    /// complete sub-queries.
    fn query_body(
        &self,
        header: &str,
        node: &AlgebraNode,
        inherited: Option<&Term>,
        contexts: &ContextMap<'_>,
    ) -> RenderResult<String> {
        let context = contexts.get(node).or(inherited);
        let (keyword, left, right) = match node {
            AlgebraNode::Union { left, right } => ("union", left, right),
            AlgebraNode::Difference { left, right } => ("minus", left, right),
            // SeRQL spells the operator `intersect`
            AlgebraNode::Intersection { left, right } => ("intersect", left, right),
            _ => {
                let mut clauses = Clauses::default();
                self.collect(node, context, contexts, &mut clauses)?;
                return Ok(format!("{}{}", header, self.clauses(&clauses)));
            }
        };
        Ok(format!(
            "({})\n{}\n({})",
            self.query_body(header, left, context, contexts)?,
            keyword,
            self.query_body(header, right, context, contexts)?
        ))
    }

    fn collect<'t>(
        &self,
        node: &'t AlgebraNode,
        inherited: Option<&Term>,
        contexts: &ContextMap<'_>,
        clauses: &mut Clauses<'t>,
    ) -> RenderResult<()> {
        let context = contexts.get(node).or(inherited);
        match node {
            AlgebraNode::SingletonSet => {}
            AlgebraNode::Pattern(pattern) => {
                let path = self.path(pattern);
                clauses.push(self.context_key(context), path);
            }
            AlgebraNode::Join { left, right } => {
                self.collect(left, context, contexts, clauses)?;
                self.collect(right, context, contexts, clauses)?;
            }
            AlgebraNode::LeftJoin { left, right, condition } => {
                self.collect(left, context, contexts, clauses)?;

                let key = self.context_key(context);
                let mut optional = Clauses::default();
                self.collect(right, context, contexts, &mut optional)?;
                optional.conditions.extend(condition.iter());
                let items = optional.take_only(&key).ok_or(RenderError::UnsupportedPosition {
                    target: TARGET,
                    kind: NodeKind::LeftJoin,
                })?;

                let mut bracket = format!("[{}", items.join(", "));
                if !optional.conditions.is_empty() {
                    bracket.push_str(" where ");
                    bracket.push_str(&self.exprs().conjunction(&optional.conditions));
                }
                bracket.push(']');
                clauses.push(key, bracket);
            }
            AlgebraNode::Filter { arg, condition } => {
                self.collect(arg, context, contexts, clauses)?;
                clauses.conditions.push(condition);
            }
            AlgebraNode::Union { .. }
            | AlgebraNode::Difference { .. }
            | AlgebraNode::Intersection { .. }
            | AlgebraNode::Projection { .. }
            | AlgebraNode::MultiProjection { .. }
            | AlgebraNode::Extension { .. }
            | AlgebraNode::Order { .. }
            | AlgebraNode::Distinct(_)
            | AlgebraNode::Reduced(_)
            | AlgebraNode::Slice { .. } => {
                return Err(RenderError::UnsupportedPosition {
                    target: TARGET,
                    kind: node.kind(),
                })
            }
        }
        Ok(())
    }

    fn clauses(&self, clauses: &Clauses<'_>) -> String {
        let indent = self.config.indent(1);
        let mut out = String::new();
        for (context, items) in &clauses.paths {
            match context {
                Some(ctx) => out.push_str(&format!("\nfrom context {}\n", ctx)),
                None => out.push_str("\nfrom\n"),
            }
            let lines: Vec<_> = items.iter().map(|item| format!("{}{}", indent, item)).collect();
            out.push_str(&lines.join(",\n"));
        }
        if !clauses.conditions.is_empty() {
            out.push_str("\nwhere ");
            out.push_str(&self.exprs().conjunction(&clauses.conditions));
        }
        out
    }

    fn path(&self, pattern: &TriplePattern) -> String {
        let exprs = self.exprs();
        format!(
            "{{{}}} {} {{{}}}",
            exprs.term(pattern.subject()),
            exprs.term(pattern.predicate()),
            exprs.term(pattern.object())
        )
    }

    fn context_key(&self, context: Option<&Term>) -> Option<String> {
        context.map(|ctx| self.exprs().term(ctx))
    }
}

impl<'t> Clauses<'t> {
    fn push(&mut self, context: Option<String>, item: String) {
        self.paths.entry(context).or_default().push(item);
    }

    /// Items of the one context present; `None` when paths sit in any other
    fn take_only(&mut self, context: &Option<String>) -> Option<Vec<String>> {
        let items = self.paths.shift_remove(context).unwrap_or_default();
        self.paths.is_empty().then_some(items)
    }
}

fn push_modifier(out: &mut String, parts: &QueryParts<'_>) {
    if parts.distinct {
        out.push_str(" distinct");
    } else if parts.reduced {
        out.push_str(" reduced");
    }
}

impl Default for SerqlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRenderer for SerqlRenderer {
    fn render(&self, query: &Query) -> RenderResult<String> {
        if !query.dataset().is_empty() {
            return Err(RenderError::UnsupportedQuery {
                target: TARGET,
                feature: "dataset clauses".to_string(),
            });
        }
        match query.kind() {
            QueryKind::Ask => Err(RenderError::UnsupportedQuery {
                target: TARGET,
                feature: "ask queries".to_string(),
            }),
            QueryKind::Describe { .. } => {
                let mut rewritten = query.clone();
                if !rewritten.rewrite_describe(DescribeScope::DefaultGraph) {
                    return Err(RenderError::UnsupportedQuery {
                        target: TARGET,
                        feature: "describe without targets".to_string(),
                    });
                }
                let contexts = ContextMap::collect(rewritten.root());
                self.render_parts(rewritten.root(), &contexts)
            }
            QueryKind::Select | QueryKind::Construct => {
                let contexts = ContextMap::collect(query.root());
                self.render_parts(query.root(), &contexts)
            }
        }
    }

    fn render_tree(&self, tree: &AlgebraNode, contexts: &ContextMap<'_>) -> RenderResult<String> {
        self.render_parts(tree, contexts)
    }
}
