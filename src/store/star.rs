use super::{BuildHasher, SubstitutionSet};
use crate::rdf::{star_query::StarQuery, substitution::Substitution, TripleAtom, Variable};
use std::collections::{BTreeSet, HashMap};

/// How the substitution sets of the atoms of a star query are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinSemantics {
    /// Keep a substitution only if an identical one was produced for every atom.
    /// Under-returns when atoms bind different variables.
    Exact,
    /// Natural join: combine substitutions that agree on the variables both sides bind.
    #[default]
    SharedVariables,
}

/// Source of the per-atom substitution sets a star query is joined from.
pub trait AtomMatcher {
    fn match_atom(&self, atom: &TripleAtom) -> SubstitutionSet;
}

/// Evaluates the atoms of `query` in order, joining as it goes.
///
/// Stops as soon as the running result is empty; later atoms are never matched.
pub fn evaluate_star<M: AtomMatcher + ?Sized>(matcher: &M, query: &StarQuery, semantics: JoinSemantics) -> SubstitutionSet {
    let mut atoms = query.atoms().iter();

    let Some(first) = atoms.next() else {
        return SubstitutionSet::default();
    };

    let mut result = matcher.match_atom(first);
    let mut bound: BTreeSet<Variable> = first.variables().cloned().collect();

    for (ix, atom) in atoms.enumerate() {
        if result.is_empty() {
            tracing::debug!(query = %query, evaluated = ix + 1, "star query has no answers, skipping remaining atoms");
            return result;
        }

        let matches = matcher.match_atom(atom);

        result = match semantics {
            JoinSemantics::Exact => result.into_iter().filter(|s| matches.contains(s)).collect(),
            JoinSemantics::SharedVariables => {
                let shared: BTreeSet<Variable> = atom.variables().filter(|var| bound.contains(var)).cloned().collect();
                hash_join(result, &matches, &shared)
            },
        };

        bound.extend(atom.variables().cloned());
    }

    result
}

fn hash_join(left: SubstitutionSet, right: &SubstitutionSet, shared: &BTreeSet<Variable>) -> SubstitutionSet {
    let mut buckets: HashMap<Substitution, Vec<&Substitution>, BuildHasher> = HashMap::default();
    for substitution in right {
        buckets.entry(substitution.restrict(shared)).or_default().push(substitution);
    }

    left.iter()
        .flat_map(|substitution| {
            buckets
                .get(&substitution.restrict(shared))
                .into_iter()
                .flatten()
                .filter_map(move |other| substitution.merge(other))
        })
        .collect()
}
