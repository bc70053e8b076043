//! SeRQL value expressions

use crate::algebra::{Term, ValueExpr};
use crate::render::TermFormatter;

/// Writes where-clause conditions in SeRQL syntax. Variables carry no sigil.
#[derive(Debug, Clone, Copy)]
pub struct SerqlExprRenderer<'a> {
    terms: &'a TermFormatter,
}

impl<'a> SerqlExprRenderer<'a> {
    pub(crate) fn new(terms: &'a TermFormatter) -> Self {
        Self { terms }
    }

    pub fn render(&self, expr: &ValueExpr) -> String {
        match expr {
            ValueExpr::Var(v) => v.name().to_string(),
            ValueExpr::Const(c) => self.terms.constant(c),
            ValueExpr::Not(e) => format!("not {}", self.nested(e)),
            ValueExpr::Bound(v) => format!("bound({})", v.name()),
            ValueExpr::Str(e) => self.call("label", &[e]),
            ValueExpr::Lang(e) => self.call("lang", &[e]),
            ValueExpr::Datatype(e) => self.call("datatype", &[e]),
            ValueExpr::IsIri(e) => self.call("isURI", &[e]),
            ValueExpr::IsBlank(e) => self.call("isBNode", &[e]),
            ValueExpr::IsLiteral(e) => self.call("isLiteral", &[e]),
            ValueExpr::And(l, r) => format!("{} and {}", self.nested(l), self.nested(r)),
            ValueExpr::Or(l, r) => format!("{} or {}", self.nested(l), self.nested(r)),
            ValueExpr::Compare { left, op, right } => {
                format!("{} {} {}", self.nested(left), op.symbol(), self.nested(right))
            }
            ValueExpr::SameTerm(l, r) => self.call("sameTerm", &[l, r]),
            ValueExpr::LangMatches(l, r) => self.call("langMatches", &[l, r]),
            ValueExpr::Regex { arg, pattern, flags } => match flags {
                Some(flags) => self.call("regex", &[arg, pattern, flags]),
                None => self.call("regex", &[arg, pattern]),
            },
            ValueExpr::FunctionCall { function, args } => {
                let args: Vec<_> = args.iter().map(|a| self.render(a)).collect();
                format!("{}({})", self.terms.iri(function.as_str()), args.join(", "))
            }
        }
    }

    pub fn nested(&self, expr: &ValueExpr) -> String {
        if expr.is_binary() {
            format!("({})", self.render(expr))
        } else {
            self.render(expr)
        }
    }

    /// Conditions joined with `and`; a single condition is not parenthesised
    pub fn conjunction(&self, conditions: &[&ValueExpr]) -> String {
        match conditions {
            [single] => self.render(single),
            many => many.iter().map(|c| self.nested(c)).collect::<Vec<_>>().join(" and "),
        }
    }

    pub fn term(&self, term: &Term) -> String {
        match term {
            Term::Var(v) => v.name().to_string(),
            Term::Const(c) => self.terms.constant(c),
        }
    }

    fn call(&self, name: &str, args: &[&ValueExpr]) -> String {
        let args: Vec<_> = args.iter().map(|a| self.render(a)).collect();
        format!("{}({})", name, args.join(", "))
    }
}
