//! SPARQL renderer
//!
//! Output layout:
//!
//! ```text
//! select ?name ?mbox
//! where {
//!   ?x <http://xmlns.com/foaf/0.1/name> ?name.
//!   OPTIONAL {
//!     ?x <http://xmlns.com/foaf/0.1/mbox> ?mbox.
//!   }.
//! }
//! limit 10
//! ```
//!
//! Keywords are lower case except the block keywords `OPTIONAL`, `GRAPH`,
//! `UNION` and `MINUS`. Every pattern and filter line ends with a period.

mod expr;

pub use expr::SparqlExprRenderer;

use super::shape::{QueryParts, QueryShape};
use super::{tree_iris, QueryRenderer, RenderError, RenderResult, TermFormatter};
use crate::algebra::{AlgebraNode, ProjectionElem, ProjectionElemList, TripleRole, ValueExpr};
use crate::builder::{Dataset, Query, QueryKind};
use crate::config::RenderConfig;
use crate::context::ContextMap;
use tracing::trace;

const TARGET: &str = "SPARQL";

/// Renders queries as SPARQL 1.1 text
#[derive(Debug, Clone)]
pub struct SparqlRenderer {
    config: RenderConfig,
    terms: TermFormatter,
}

impl SparqlRenderer {
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

    fn exprs(&self) -> SparqlExprRenderer<'_> {
        SparqlExprRenderer::new(&self.terms)
    }

    fn render_query(
        &self,
        kind: &QueryKind,
        dataset: &Dataset,
        tree: &AlgebraNode,
        contexts: &ContextMap<'_>,
    ) -> RenderResult<String> {
        let parts = QueryParts::peel(tree);
        let exprs = self.exprs();
        let mut out = String::new();

        let mut iris = tree_iris(tree);
        iris.extend(dataset.default_graphs.iter().map(|g| g.as_str().to_string()));
        iris.extend(dataset.named_graphs.iter().map(|g| g.as_str().to_string()));
        if let QueryKind::Describe { targets } = kind {
            for target in targets {
                if let Some(value) = target.as_const() {
                    super::push_constant_iri(value, &mut iris);
                }
            }
        }
        for ns in self.terms.declarations(iris) {
            out.push_str(&format!("PREFIX {}: <{}>\n", ns.prefix, ns.iri));
        }

        // Bindings rendered in the header are not repeated in the body.
        let mut inlined = Vec::new();
        match kind {
            QueryKind::Ask => out.push_str("ask"),
            QueryKind::Describe { targets } => {
                out.push_str("describe");
                if targets.is_empty() {
                    out.push_str(" *");
                }
                for target in targets {
                    out.push(' ');
                    out.push_str(&exprs.term(target));
                }
            }
            QueryKind::Select | QueryKind::Construct => match parts.shape() {
                QueryShape::Select => out.push_str(&self.select_header(&parts, &mut inlined)?),
                QueryShape::Construct => out.push_str(&self.construct_header(&parts, &mut inlined)?),
            },
        }

        for graph in &dataset.default_graphs {
            out.push_str(&format!("\nfrom {}", self.terms.iri(graph.as_str())));
        }
        for graph in &dataset.named_graphs {
            out.push_str(&format!("\nfrom named {}", self.terms.iri(graph.as_str())));
        }

        let describing_constants = matches!(kind, QueryKind::Describe { .. }) && parts.body.is_none();
        if !describing_constants {
            out.push_str("\nwhere {\n");
            if let Some(body) = parts.body {
                out.push_str(&self.node(body, 1, contexts)?);
            }
            for (name, expr) in &parts.extensions {
                if !inlined.contains(name) {
                    out.push_str(&format!(
                        "{}bind ({} as ?{}).\n",
                        self.config.indent(1),
                        exprs.render(expr),
                        name
                    ));
                }
            }
            out.push('}');
        }

        if !parts.order.is_empty() {
            let keys: Vec<_> = parts
                .order
                .iter()
                .map(|o| {
                    if o.ascending {
                        exprs.nested(&o.expr)
                    } else {
                        format!("desc({})", exprs.render(&o.expr))
                    }
                })
                .collect();
            out.push_str(&format!("\norder by {}", keys.join(" ")));
        }
        if let Some(limit) = parts.limit {
            out.push_str(&format!("\nlimit {}", limit));
        }
        if let Some(offset) = parts.offset {
            out.push_str(&format!("\noffset {}", offset));
        }

        trace!("Rendered {} query:\n{}", kind.name(), out);
        Ok(out)
    }

    fn select_header<'t>(&self, parts: &QueryParts<'t>, inlined: &mut Vec<&'t str>) -> RenderResult<String> {
        let mut out = String::from("select");
        if parts.distinct {
            out.push_str(" distinct");
        } else if parts.reduced {
            out.push_str(" reduced");
        }

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
                for elem in list {
                    out.push(' ');
                    out.push_str(&self.select_item(parts, elem, inlined));
                }
            }
            _ => out.push_str(" *"),
        }
        Ok(out)
    }

    fn select_item<'t>(&self, parts: &QueryParts<'t>, elem: &ProjectionElem, inlined: &mut Vec<&'t str>) -> String {
        if let Some((name, expr)) = parts.extensions.get_key_value(elem.source.as_str()) {
            inlined.push(*name);
            return format!("({} as ?{})", self.exprs().render(expr), elem.target);
        }
        if elem.source == elem.target {
            format!("?{}", elem.source)
        } else {
            format!("(?{} as ?{})", elem.source, elem.target)
        }
    }

    fn construct_header<'t>(&self, parts: &QueryParts<'t>, inlined: &mut Vec<&'t str>) -> RenderResult<String> {
        if parts.distinct || parts.reduced {
            return Err(RenderError::UnsupportedQuery {
                target: TARGET,
                feature: "distinct or reduced construct".to_string(),
            });
        }

        let mut out = String::from("construct {\n");
        for list in parts.projections.iter().filter(|l| l.is_spo()) {
            let [s, p, o] = [TripleRole::Subject, TripleRole::Predicate, TripleRole::Object]
                .map(|role| self.template_term(parts, list, role, inlined));
            out.push_str(&format!("{}{} {} {}.\n", self.config.indent(1), s, p, o));
        }
        out.push('}');
        Ok(out)
    }

    /// A template position: a variable, or the constant an extension binds
    fn template_term<'t>(
        &self,
        parts: &QueryParts<'t>,
        list: &ProjectionElemList,
        role: TripleRole,
        inlined: &mut Vec<&'t str>,
    ) -> String {
        let Some(elem) = list.by_role(role) else {
            return String::new();
        };
        match parts.extensions.get_key_value(elem.source.as_str()) {
            Some((name, ValueExpr::Const(value))) => {
                inlined.push(*name);
                self.terms.constant(value)
            }
            _ => format!("?{}", elem.source),
        }
    }

    /// Render a body node, opening a graph block when it carries a context
    fn node(&self, node: &AlgebraNode, depth: usize, contexts: &ContextMap<'_>) -> RenderResult<String> {
        match contexts.get(node) {
            Some(ctx) => {
                let indent = self.config.indent(depth);
                Ok(format!(
                    "{}GRAPH {} {{\n{}{}}}.\n",
                    indent,
                    self.exprs().term(ctx),
                    self.inner(node, depth + 1, contexts)?,
                    indent
                ))
            }
            None => self.inner(node, depth, contexts),
        }
    }

    fn inner(&self, node: &AlgebraNode, depth: usize, contexts: &ContextMap<'_>) -> RenderResult<String> {
        let indent = self.config.indent(depth);
        let exprs = self.exprs();

        let out = match node {
            AlgebraNode::SingletonSet => String::new(),
            AlgebraNode::Pattern(p) => format!(
                "{}{} {} {}.\n",
                indent,
                exprs.term(p.subject()),
                exprs.term(p.predicate()),
                exprs.term(p.object())
            ),
            AlgebraNode::Join { left, right } => {
                self.node(left, depth, contexts)? + &self.node(right, depth, contexts)?
            }
            AlgebraNode::LeftJoin { left, right, condition } => {
                let mut out = self.node(left, depth, contexts)?;
                out.push_str(&format!("{}OPTIONAL {{\n", indent));
                out.push_str(&self.node(right, depth + 1, contexts)?);
                if let Some(condition) = condition {
                    out.push_str(&self.filter_line(condition, depth + 1));
                }
                out.push_str(&format!("{}}}.\n", indent));
                out
            }
            AlgebraNode::Union { left, right } => format!(
                "{indent}{{\n{}{indent}}}\n{indent}UNION\n{indent}{{\n{}{indent}}}.\n",
                self.node(left, depth + 1, contexts)?,
                self.node(right, depth + 1, contexts)?,
                indent = indent
            ),
            AlgebraNode::Difference { left, right } => format!(
                "{}{indent}MINUS {{\n{}{indent}}}.\n",
                self.node(left, depth, contexts)?,
                self.node(right, depth + 1, contexts)?,
                indent = indent
            ),
            AlgebraNode::Filter { arg, condition } => {
                self.node(arg, depth, contexts)? + &self.filter_line(condition, depth)
            }
            AlgebraNode::Intersection { .. } => {
                return Err(RenderError::UnsupportedNode {
                    target: TARGET,
                    kind: node.kind(),
                })
            }
            AlgebraNode::Projection { .. }
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
        };
        Ok(out)
    }

    fn filter_line(&self, condition: &ValueExpr, depth: usize) -> String {
        format!("{}filter ({}).\n", self.config.indent(depth), self.exprs().render(condition))
    }
}

impl Default for SparqlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRenderer for SparqlRenderer {
    fn render(&self, query: &Query) -> RenderResult<String> {
        let contexts = ContextMap::collect(query.root());
        self.render_query(query.kind(), query.dataset(), query.root(), &contexts)
    }

    fn render_tree(&self, tree: &AlgebraNode, contexts: &ContextMap<'_>) -> RenderResult<String> {
        let kind = match QueryShape::detect(tree) {
            QueryShape::Select => QueryKind::Select,
            QueryShape::Construct => QueryKind::Construct,
        };
        self.render_query(&kind, &Dataset::default(), tree, contexts)
    }
}
