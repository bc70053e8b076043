//! SPARQL value expressions

use crate::algebra::{Term, ValueExpr, Variable};
use crate::render::TermFormatter;

/// Writes filter conditions and bindings in SPARQL syntax
#[derive(Debug, Clone, Copy)]
pub struct SparqlExprRenderer<'a> {
    terms: &'a TermFormatter,
}

impl<'a> SparqlExprRenderer<'a> {
    pub(crate) fn new(terms: &'a TermFormatter) -> Self {
        Self { terms }
    }

    /// Top-level expression: infix operators are not parenthesised
    pub fn render(&self, expr: &ValueExpr) -> String {
        match expr {
            ValueExpr::Var(v) => var(v),
            ValueExpr::Const(c) => self.terms.constant(c),
            ValueExpr::Not(e) => format!("!{}", self.nested(e)),
            ValueExpr::Bound(v) => format!("bound({})", var(v)),
            ValueExpr::Str(e) => self.call("str", &[e]),
            ValueExpr::Lang(e) => self.call("lang", &[e]),
            ValueExpr::Datatype(e) => self.call("datatype", &[e]),
            ValueExpr::IsIri(e) => self.call("isIRI", &[e]),
            ValueExpr::IsBlank(e) => self.call("isBlank", &[e]),
            ValueExpr::IsLiteral(e) => self.call("isLiteral", &[e]),
            ValueExpr::And(l, r) => format!("{} && {}", self.nested(l), self.nested(r)),
            ValueExpr::Or(l, r) => format!("{} || {}", self.nested(l), self.nested(r)),
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

    /// Operand position: infix operators are parenthesised
    pub fn nested(&self, expr: &ValueExpr) -> String {
        if expr.is_binary() {
            format!("({})", self.render(expr))
        } else {
            self.render(expr)
        }
    }

    pub fn term(&self, term: &Term) -> String {
        match term {
            Term::Var(v) => var(v),
            Term::Const(c) => self.terms.constant(c),
        }
    }

    fn call(&self, name: &str, args: &[&ValueExpr]) -> String {
        let args: Vec<_> = args.iter().map(|a| self.render(a)).collect();
        format!("{}({})", name, args.join(", "))
    }
}

pub(crate) fn var(v: &Variable) -> String {
    format!("?{}", v.name())
}
