pub mod ntriples;
pub mod pattern;
pub mod star_query;
pub mod substitution;

use std::{fmt, sync::Arc};

/// A query variable. The name is stored without the leading `?`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(Arc<str>);

impl Variable {
    pub fn new(name: &str) -> Self {
        Variable(Arc::from(name.strip_prefix('?').unwrap_or(name)))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// An atomic RDF value. Constants carry their N-Triples lexical form
/// (`<iri>`, `"literal"@lang`, `_:blank`) and are the only terms that get dictionary codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Constant(Arc<str>),
    Variable(Variable),
}

impl Term {
    pub fn constant(value: &str) -> Self {
        Term::Constant(Arc::from(value))
    }

    pub fn variable(name: &str) -> Self {
        Term::Variable(Variable::new(name))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&Arc<str>> {
        match self {
            Term::Constant(value) => Some(value),
            Term::Variable(_) => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(var) => Some(var),
            Term::Constant(_) => None,
        }
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(value) => f.write_str(value),
            Term::Variable(var) => var.fmt(f),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Subject,
    Predicate,
    Object,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Subject, Position::Predicate, Position::Object];

    pub const fn index(self) -> usize {
        match self {
            Position::Subject => 0,
            Position::Predicate => 1,
            Position::Object => 2,
        }
    }
}

/// An ordered (subject, predicate, object) triple of terms.
/// Used both for stored facts and for patterns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripleAtom([Term; 3]);

impl TripleAtom {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        TripleAtom([subject, predicate, object])
    }

    pub fn subject(&self) -> &Term {
        &self.0[0]
    }

    pub fn predicate(&self) -> &Term {
        &self.0[1]
    }

    pub fn object(&self) -> &Term {
        &self.0[2]
    }

    pub fn term(&self, position: Position) -> &Term {
        &self.0[position.index()]
    }

    pub fn terms(&self) -> &[Term; 3] {
        &self.0
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.0.iter().filter_map(Term::as_variable)
    }

    pub fn mentions(&self, var: &Variable) -> bool {
        self.variables().any(|v| v == var)
    }

    pub fn is_ground(&self) -> bool {
        self.0.iter().all(Term::is_constant)
    }
}

impl From<[Term; 3]> for TripleAtom {
    fn from(terms: [Term; 3]) -> Self {
        TripleAtom(terms)
    }
}

impl fmt::Display for TripleAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [s, p, o] = &self.0;
        write!(f, "({s}, {p}, {o})")
    }
}
