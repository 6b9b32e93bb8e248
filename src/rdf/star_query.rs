use crate::{
    error::{Error, Result},
    rdf::{substitution::Substitution, TripleAtom, Variable},
};
use std::fmt;

/// A conjunction of atoms that all mention one central variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StarQuery {
    center: Variable,
    atoms: Vec<TripleAtom>,
    answer_variables: Vec<Variable>,
}

impl StarQuery {
    /// Fails with [`Error::EmptyStarQuery`] for an empty atom list and with
    /// [`Error::DisconnectedAtom`] for an atom that does not mention `center`.
    pub fn new(center: Variable, atoms: Vec<TripleAtom>, answer_variables: Vec<Variable>) -> Result<Self> {
        if atoms.is_empty() {
            return Err(Error::EmptyStarQuery);
        }

        if let Some(index) = atoms.iter().position(|atom| !atom.mentions(&center)) {
            return Err(Error::DisconnectedAtom { index, center });
        }

        Ok(StarQuery { center, atoms, answer_variables })
    }

    pub fn center(&self) -> &Variable {
        &self.center
    }

    pub fn atoms(&self) -> &[TripleAtom] {
        &self.atoms
    }

    pub fn answer_variables(&self) -> &[Variable] {
        &self.answer_variables
    }

    pub fn project(&self, substitution: &Substitution) -> Substitution {
        substitution.restrict(&self.answer_variables)
    }
}

impl fmt::Display for StarQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT")?;
        for var in &self.answer_variables {
            write!(f, " {var}")?;
        }
        f.write_str(" WHERE {")?;
        for atom in &self.atoms {
            let [s, p, o] = atom.terms();
            write!(f, " {s} {p} {o} .")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::Term;

    fn atom(s: &str, p: &str, o: &str) -> TripleAtom {
        let term = |t: &str| if t.starts_with('?') { Term::variable(t) } else { Term::constant(t) };
        TripleAtom::new(term(s), term(p), term(o))
    }

    #[test]
    fn empty_star_query_fails_fast() {
        let err = StarQuery::new(Variable::new("x"), vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::EmptyStarQuery));
    }

    #[test]
    fn every_atom_must_mention_the_center() {
        let err = StarQuery::new(
            Variable::new("x"),
            vec![atom("?x", "<p1>", "<o1>"), atom("?y", "<p2>", "<o2>")],
            vec![Variable::new("x")],
        )
        .unwrap_err();

        assert!(matches!(err, Error::DisconnectedAtom { index: 1, .. }));
    }

    #[test]
    fn display_reads_like_sparql() {
        let q = StarQuery::new(
            Variable::new("x"),
            vec![atom("?x", "<p1>", "<o1>"), atom("<s>", "<p2>", "?x")],
            vec![Variable::new("x")],
        )
        .unwrap();

        assert_eq!(q.to_string(), "SELECT ?x WHERE { ?x <p1> <o1> . <s> <p2> ?x . }");
    }
}
