//! Query terms and triple patterns

use crate::rdf::{BlankNode, Literal, NamedNode, RdfTerm};
use std::fmt;

/// A query variable
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
    /// Synthesized by the library rather than chosen by the user
    anonymous: bool,
}

impl Variable {
    /// Create a user-named variable
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anonymous: false,
        }
    }

    /// Create a synthesized variable. Callers use a reserved prefix so the
    /// name cannot clash with user variables.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anonymous: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Variable::new(name)
    }
}

impl From<String> for Variable {
    fn from(name: String) -> Self {
        Variable::new(name)
    }
}

/// A pattern position: either a variable or a constant RDF value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Var(Variable),
    Const(RdfTerm),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Variable::new(name))
    }

    pub fn constant(value: impl Into<RdfTerm>) -> Self {
        Term::Const(value.into())
    }

    pub fn as_var(&self) -> Option<&Variable> {
        match self {
            Term::Var(v) => Some(v),
            Term::Const(_) => None,
        }
    }

    pub fn as_const(&self) -> Option<&RdfTerm> {
        match self {
            Term::Const(c) => Some(c),
            Term::Var(_) => None,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    /// Whether two graph contexts denote the same graph: equal values for
    /// constants, equal names for variables. A variable never matches a
    /// constant.
    pub fn same_context(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Const(a), Term::Const(b)) => a == b,
            (Term::Var(a), Term::Var(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{}", v),
            Term::Const(c) => write!(f, "{}", c),
        }
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Var(var)
    }
}

/// Bare strings name variables, matching the `atom("x", p, "y")` idiom
impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::var(name)
    }
}

impl From<String> for Term {
    fn from(name: String) -> Self {
        Term::var(name)
    }
}

impl From<RdfTerm> for Term {
    fn from(value: RdfTerm) -> Self {
        Term::Const(value)
    }
}

impl From<NamedNode> for Term {
    fn from(value: NamedNode) -> Self {
        Term::Const(value.into())
    }
}

impl From<&NamedNode> for Term {
    fn from(value: &NamedNode) -> Self {
        Term::Const(value.clone().into())
    }
}

impl From<BlankNode> for Term {
    fn from(value: BlankNode) -> Self {
        Term::Const(value.into())
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Const(value.into())
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Const(Literal::from(value).into())
    }
}

/// Which graphs a triple pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Only statements in the default graph
    #[default]
    DefaultGraph,
    /// Statements in any named graph
    NamedGraphs,
}

/// Subject/predicate/object template with an optional graph context.
/// Leaf of the algebra tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    subject: Term,
    predicate: Term,
    object: Term,
    context: Option<Term>,
    scope: Scope,
}

impl TriplePattern {
    /// Create a pattern over the default graph
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            context: None,
            scope: Scope::DefaultGraph,
        }
    }

    /// Restrict the pattern to a named graph
    pub fn with_context(mut self, context: impl Into<Term>) -> Self {
        self.context = Some(context.into());
        self.scope = Scope::NamedGraphs;
        self
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn predicate(&self) -> &Term {
        &self.predicate
    }

    pub fn object(&self) -> &Term {
        &self.object
    }

    pub fn context(&self) -> Option<&Term> {
        self.context.as_ref()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Subject, predicate, object and context, in that order
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .chain(self.context.as_ref())
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(ctx) = &self.context {
            write!(f, " [{}]", ctx)?;
        }
        Ok(())
    }
}
