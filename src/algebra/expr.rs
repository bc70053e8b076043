//! Value expressions used by filters and left-join conditions

use super::term::{Term, Variable};
use crate::rdf::{Literal, NamedNode, RdfTerm};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal to (=)
    Eq,
    /// Not equal to (!=)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal to (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal to (>=)
    Ge,
}

impl CompareOp {
    /// Operator symbol, shared by both target syntaxes
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Expression tree evaluated against a solution binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueExpr {
    /// Variable reference
    Var(Variable),
    /// Constant RDF value
    Const(RdfTerm),
    /// Logical negation
    Not(Box<ValueExpr>),
    /// `bound(?v)`
    Bound(Variable),
    /// Lexical form of a term
    Str(Box<ValueExpr>),
    /// Language tag of a literal
    Lang(Box<ValueExpr>),
    /// Datatype of a literal
    Datatype(Box<ValueExpr>),
    IsIri(Box<ValueExpr>),
    IsBlank(Box<ValueExpr>),
    IsLiteral(Box<ValueExpr>),
    /// Logical conjunction
    And(Box<ValueExpr>, Box<ValueExpr>),
    /// Logical disjunction
    Or(Box<ValueExpr>, Box<ValueExpr>),
    /// Value comparison
    Compare {
        left: Box<ValueExpr>,
        op: CompareOp,
        right: Box<ValueExpr>,
    },
    /// RDF term identity
    SameTerm(Box<ValueExpr>, Box<ValueExpr>),
    /// Regular expression match
    Regex {
        arg: Box<ValueExpr>,
        pattern: Box<ValueExpr>,
        flags: Option<Box<ValueExpr>>,
    },
    /// Language range match
    LangMatches(Box<ValueExpr>, Box<ValueExpr>),
    /// Extension function identified by IRI
    FunctionCall {
        function: NamedNode,
        args: Vec<ValueExpr>,
    },
}

impl ValueExpr {
    pub fn var(name: impl Into<String>) -> Self {
        ValueExpr::Var(Variable::new(name))
    }

    pub fn constant(value: impl Into<RdfTerm>) -> Self {
        ValueExpr::Const(value.into())
    }

    pub fn bound(var: impl Into<Variable>) -> Self {
        ValueExpr::Bound(var.into())
    }

    pub fn not(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::Not(Box::new(expr.into()))
    }

    pub fn and(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        ValueExpr::And(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn or(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        ValueExpr::Or(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn compare(left: impl Into<ValueExpr>, op: CompareOp, right: impl Into<ValueExpr>) -> Self {
        ValueExpr::Compare {
            left: Box::new(left.into()),
            op,
            right: Box::new(right.into()),
        }
    }

    pub fn eq(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        Self::compare(left, CompareOp::Eq, right)
    }

    pub fn ne(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        Self::compare(left, CompareOp::Ne, right)
    }

    pub fn lt(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        Self::compare(left, CompareOp::Lt, right)
    }

    pub fn le(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        Self::compare(left, CompareOp::Le, right)
    }

    pub fn gt(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        Self::compare(left, CompareOp::Gt, right)
    }

    pub fn ge(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        Self::compare(left, CompareOp::Ge, right)
    }

    pub fn same_term(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        ValueExpr::SameTerm(Box::new(left.into()), Box::new(right.into()))
    }

    /// `regex(arg, pattern)` with the pattern given as a plain string
    pub fn regex(arg: impl Into<ValueExpr>, pattern: &str) -> Self {
        ValueExpr::Regex {
            arg: Box::new(arg.into()),
            pattern: Box::new(ValueExpr::Const(Literal::from(pattern).into())),
            flags: None,
        }
    }

    pub fn regex_with_flags(arg: impl Into<ValueExpr>, pattern: &str, flags: &str) -> Self {
        ValueExpr::Regex {
            arg: Box::new(arg.into()),
            pattern: Box::new(ValueExpr::Const(Literal::from(pattern).into())),
            flags: Some(Box::new(ValueExpr::Const(Literal::from(flags).into()))),
        }
    }

    pub fn lang_matches(left: impl Into<ValueExpr>, right: impl Into<ValueExpr>) -> Self {
        ValueExpr::LangMatches(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn str(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::Str(Box::new(expr.into()))
    }

    pub fn lang(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::Lang(Box::new(expr.into()))
    }

    pub fn datatype(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::Datatype(Box::new(expr.into()))
    }

    pub fn is_iri(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::IsIri(Box::new(expr.into()))
    }

    pub fn is_blank(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::IsBlank(Box::new(expr.into()))
    }

    pub fn is_literal(expr: impl Into<ValueExpr>) -> Self {
        ValueExpr::IsLiteral(Box::new(expr.into()))
    }

    pub fn call(function: NamedNode, args: Vec<ValueExpr>) -> Self {
        ValueExpr::FunctionCall { function, args }
    }

    /// Left-associative disjunction. `None` for an empty input.
    pub fn fold_or(exprs: impl IntoIterator<Item = ValueExpr>) -> Option<Self> {
        exprs.into_iter().reduce(|l, r| ValueExpr::or(l, r))
    }

    /// Left-associative conjunction. `None` for an empty input.
    pub fn fold_and(exprs: impl IntoIterator<Item = ValueExpr>) -> Option<Self> {
        exprs.into_iter().reduce(|l, r| ValueExpr::and(l, r))
    }

    /// Infix operators. Renderers parenthesise these when nested.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            ValueExpr::And(..) | ValueExpr::Or(..) | ValueExpr::Compare { .. }
        )
    }

    /// Every constant mentioned by the expression
    pub fn constants(&self) -> Vec<&RdfTerm> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let ValueExpr::Const(c) = e {
                out.push(c);
            }
        });
        out
    }

    /// Visit this expression and all sub-expressions, parents first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ValueExpr)) {
        visit(self);
        match self {
            ValueExpr::Var(_) | ValueExpr::Const(_) | ValueExpr::Bound(_) => {}
            ValueExpr::Not(e)
            | ValueExpr::Str(e)
            | ValueExpr::Lang(e)
            | ValueExpr::Datatype(e)
            | ValueExpr::IsIri(e)
            | ValueExpr::IsBlank(e)
            | ValueExpr::IsLiteral(e) => e.walk(visit),
            ValueExpr::And(l, r)
            | ValueExpr::Or(l, r)
            | ValueExpr::SameTerm(l, r)
            | ValueExpr::LangMatches(l, r)
            | ValueExpr::Compare { left: l, right: r, .. } => {
                l.walk(visit);
                r.walk(visit);
            }
            ValueExpr::Regex { arg, pattern, flags } => {
                arg.walk(visit);
                pattern.walk(visit);
                if let Some(flags) = flags {
                    flags.walk(visit);
                }
            }
            ValueExpr::FunctionCall { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
        }
    }
}

impl From<Variable> for ValueExpr {
    fn from(var: Variable) -> Self {
        ValueExpr::Var(var)
    }
}

impl From<Term> for ValueExpr {
    fn from(term: Term) -> Self {
        match term {
            Term::Var(v) => ValueExpr::Var(v),
            Term::Const(c) => ValueExpr::Const(c),
        }
    }
}

impl From<&Term> for ValueExpr {
    fn from(term: &Term) -> Self {
        term.clone().into()
    }
}

/// Bare strings name variables, as for terms
impl From<&str> for ValueExpr {
    fn from(name: &str) -> Self {
        ValueExpr::var(name)
    }
}

impl From<RdfTerm> for ValueExpr {
    fn from(value: RdfTerm) -> Self {
        ValueExpr::Const(value)
    }
}

impl From<NamedNode> for ValueExpr {
    fn from(value: NamedNode) -> Self {
        ValueExpr::Const(value.into())
    }
}

impl From<Literal> for ValueExpr {
    fn from(value: Literal) -> Self {
        ValueExpr::Const(value.into())
    }
}

impl From<i64> for ValueExpr {
    fn from(value: i64) -> Self {
        ValueExpr::Const(Literal::from(value).into())
    }
}
