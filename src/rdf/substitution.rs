use crate::rdf::{Term, Variable};
use std::{collections::BTreeMap, fmt};

/// A finite mapping from variables to terms, one answer of a pattern or star query.
///
/// Substitutions compare and hash structurally, so sets of them deduplicate answers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Substitution(BTreeMap<Variable, Term>);

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `var` to `term`. Returns `false` if `var` is already bound to a different term.
    pub(crate) fn bind(&mut self, var: Variable, term: Term) -> bool {
        match self.0.get(&var) {
            Some(bound) => *bound == term,
            None => {
                self.0.insert(var, term);
                true
            },
        }
    }

    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.0.get(var)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> + '_ {
        self.0.iter()
    }

    /// The bindings of `self` whose variable is one of `vars`.
    pub fn restrict<'a>(&self, vars: impl IntoIterator<Item = &'a Variable>) -> Substitution {
        vars.into_iter()
            .filter_map(|var| self.0.get_key_value(var))
            .map(|(var, term)| (var.clone(), term.clone()))
            .collect()
    }

    /// The union of both substitutions, or `None` if they bind a shared variable differently.
    pub fn merge(&self, other: &Substitution) -> Option<Substitution> {
        let mut merged = self.clone();

        for (var, term) in other.iter() {
            if !merged.bind(var.clone(), term.clone()) {
                return None;
            }
        }

        Some(merged)
    }
}

impl FromIterator<(Variable, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Variable, Term)>>(iter: I) -> Self {
        Substitution(iter.into_iter().collect())
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (ix, (var, term)) in self.0.iter().enumerate() {
            if ix > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var} -> {term}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(bindings: &[(&str, &str)]) -> Substitution {
        bindings
            .iter()
            .map(|(var, term)| (Variable::new(var), Term::constant(term)))
            .collect()
    }

    #[test]
    fn bind_rejects_conflicts() {
        let mut s = Substitution::new();
        assert!(s.bind(Variable::new("x"), Term::constant("a")));
        assert!(s.bind(Variable::new("x"), Term::constant("a")));
        assert!(!s.bind(Variable::new("x"), Term::constant("b")));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn merge_agrees_on_shared_variables() {
        let left = sub(&[("x", "s"), ("y", "o1")]);

        assert_eq!(left.merge(&sub(&[("x", "s"), ("z", "o2")])), Some(sub(&[("x", "s"), ("y", "o1"), ("z", "o2")])));
        assert_eq!(left.merge(&sub(&[("x", "t")])), None);
    }

    #[test]
    fn restrict_keeps_requested_bindings() {
        let s = sub(&[("x", "s"), ("y", "o1")]);
        let vars = [Variable::new("x"), Variable::new("w")];

        assert_eq!(s.restrict(&vars), sub(&[("x", "s")]));
        assert_eq!(s.to_string(), "{?x -> s, ?y -> o1}");
    }
}
