pub mod dictionary;
pub mod index;
pub mod matcher;
pub mod star;

use crate::{
    error::{Error, Result},
    rdf::{star_query::StarQuery, substitution::Substitution, Term, TripleAtom},
};
use dictionary::Dictionary;
use index::{Permutation, PermutationIndex};
use rayon::prelude::*;
use star::{evaluate_star, AtomMatcher, JoinSemantics};
use std::{
    collections::{hash_set, HashSet},
    hash::BuildHasherDefault,
};

pub type TermId = u64;
pub type EncodedTriple = [TermId; 3];

pub(crate) type BuildHasher = BuildHasherDefault<ahash::AHasher>;
pub type SubstitutionSet = HashSet<Substitution, BuildHasher>;

/// Finite, single pass sequence of answers.
pub type Substitutions = hash_set::IntoIter<Substitution>;

/// Outcome of a bulk insertion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddReport {
    pub added: usize,
    pub duplicates: usize,
    /// Atoms that mention a variable or a constant missing from the codex.
    pub skipped: usize,
}

/// In-memory triple store keeping every triple in all six permutation indices.
///
/// A store is built in three steps: observe terms ([`HexaStore::add_terms`]), seal the
/// dictionary ([`HexaStore::create_codex`]) and insert atoms ([`HexaStore::add`],
/// [`HexaStore::add_all`]). [`HexaStore::load`] performs all three. Queries are meant to
/// run once loading is complete; a sealed store can be shared between threads for reading.
pub struct HexaStore {
    dictionary: Dictionary,
    indices: [PermutationIndex; 6],
    atoms: HashSet<TripleAtom, BuildHasher>,
    join_semantics: JoinSemantics,
}

impl Default for HexaStore {
    fn default() -> Self {
        Self::with_join_semantics(JoinSemantics::default())
    }
}

impl HexaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_join_semantics(join_semantics: JoinSemantics) -> Self {
        Self {
            dictionary: Dictionary::new(),
            indices: Permutation::ALL.map(PermutationIndex::new),
            atoms: HashSet::default(),
            join_semantics,
        }
    }

    /// Accumulates, seals and inserts `atoms` in one go.
    pub fn from_atoms(atoms: Vec<TripleAtom>) -> Result<(Self, AddReport)> {
        let mut store = Self::new();
        let report = store.load(atoms)?;
        Ok((store, report))
    }

    pub fn load(&mut self, atoms: Vec<TripleAtom>) -> Result<AddReport> {
        self.add_terms_from(&atoms)?;
        self.create_codex()?;
        self.add_all(atoms)
    }

    pub fn join_semantics(&self) -> JoinSemantics {
        self.join_semantics
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn index(&self, permutation: Permutation) -> &PermutationIndex {
        &self.indices[permutation as usize]
    }

    pub fn add_term(&mut self, term: &Term) -> Result<()> {
        self.dictionary.add_term(term)
    }

    pub fn add_terms(&mut self, atom: &TripleAtom) -> Result<()> {
        atom.terms().iter().try_for_each(|term| self.dictionary.add_term(term))
    }

    pub fn add_terms_from<'a, I: IntoIterator<Item = &'a TripleAtom>>(&mut self, atoms: I) -> Result<()> {
        atoms.into_iter().try_for_each(|atom| self.add_terms(atom))
    }

    pub fn create_codex(&mut self) -> Result<()> {
        self.dictionary.create_codex()
    }

    /// Inserts one atom into the triple set and all six indices.
    ///
    /// Returns `Ok(false)` without touching the store if the atom is already present.
    /// Fails, leaving the store unchanged, if a position is a variable or a constant the
    /// codex does not know.
    pub fn add(&mut self, atom: &TripleAtom) -> Result<bool> {
        if self.atoms.contains(atom) {
            return Ok(false);
        }

        let triple = self.dictionary.encode_constant_triple(atom)?;

        for index in &mut self.indices {
            index.insert(triple);
        }
        self.atoms.insert(atom.clone());

        Ok(true)
    }

    /// Inserts a batch of atoms. Unencodable atoms are skipped and counted, not fatal.
    pub fn add_all<I: IntoIterator<Item = TripleAtom>>(&mut self, atoms: I) -> Result<AddReport> {
        if !self.dictionary.is_sealed() {
            return Err(Error::DictionaryNotSealed);
        }

        let mut report = AddReport::default();
        let mut encoded = Vec::new();

        for atom in atoms {
            if self.atoms.contains(&atom) {
                report.duplicates += 1;
                continue;
            }

            match self.dictionary.encode_constant_triple(&atom) {
                Ok(triple) => {
                    encoded.push(triple);
                    self.atoms.insert(atom);
                    report.added += 1;
                },
                Err(e) => {
                    tracing::debug!(%atom, error = %e, "skipping atom");
                    report.skipped += 1;
                },
            }
        }

        self.indices
            .as_mut_slice()
            .par_iter_mut()
            .for_each(|index| index.extend(encoded.iter().copied()));

        if report.skipped > 0 {
            tracing::warn!(skipped = report.skipped, "some atoms could not be encoded");
        }
        tracing::info!(added = report.added, duplicates = report.duplicates, total = self.len(), "inserted atoms");

        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, atom: &TripleAtom) -> bool {
        self.atoms.contains(atom)
    }

    pub fn atoms(&self) -> impl Iterator<Item = &TripleAtom> + '_ {
        self.atoms.iter()
    }

    pub fn match_star(&self, query: &StarQuery) -> Substitutions {
        evaluate_star(self, query, self.join_semantics).into_iter()
    }

    /// Star query answers restricted to the query's answer variables.
    pub fn answer(&self, query: &StarQuery) -> Substitutions {
        self.match_star(query)
            .map(|substitution| query.project(&substitution))
            .collect::<SubstitutionSet>()
            .into_iter()
    }

    /// Evaluates independent star queries concurrently.
    pub fn match_star_batch(&self, queries: &[StarQuery]) -> Vec<Vec<Substitution>> {
        queries
            .par_iter()
            .map(|query| self.match_star(query).collect())
            .collect()
    }
}

impl AtomMatcher for HexaStore {
    fn match_atom(&self, atom: &TripleAtom) -> SubstitutionSet {
        self.match_pattern(atom).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(value: &str) -> Term {
        Term::constant(value)
    }

    fn triple(s: &str, p: &str, o: &str) -> TripleAtom {
        TripleAtom::new(c(s), c(p), c(o))
    }

    fn sealed_store(atoms: &[TripleAtom]) -> HexaStore {
        let mut store = HexaStore::new();
        store.add_terms_from(atoms).unwrap();
        store.create_codex().unwrap();
        store
    }

    fn index_sizes(store: &HexaStore) -> Vec<usize> {
        store.indices.iter().map(|index| index.scan().count()).collect()
    }

    #[test]
    fn add_is_idempotent() {
        let atom = triple("s", "p", "o");
        let mut store = sealed_store(&[atom.clone()]);

        assert!(store.add(&atom).unwrap());
        assert_eq!(store.len(), 1);
        assert!(!store.add(&atom).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(index_sizes(&store), [1; 6]);
    }

    #[test]
    fn triple_is_in_all_six_indices() {
        let atoms = [triple("s", "p", "o"), triple("o", "p", "s"), triple("s", "q", "s")];
        let mut store = sealed_store(&atoms);
        for atom in &atoms {
            store.add(atom).unwrap();
        }

        for atom in &atoms {
            let canonical = store.dictionary.encode_constant_triple(atom).unwrap();
            for index in &store.indices {
                let [a, b, c] = index.permutation().permute(canonical);
                assert_eq!(index.search_by_three(a, b, c), Some([a, b, c]), "{:?}", index.permutation());
            }
        }
    }

    #[test]
    fn unresolved_atom_leaves_store_unchanged() {
        let mut store = sealed_store(&[triple("s", "p", "o")]);

        assert!(matches!(store.add(&triple("s", "p", "unseen")), Err(Error::UnresolvedConstant(_))));
        assert!(matches!(
            store.add(&TripleAtom::new(Term::variable("x"), c("p"), c("o"))),
            Err(Error::VariableInTriple(_))
        ));
        assert!(store.is_empty());
        assert_eq!(index_sizes(&store), [0; 6]);
    }

    #[test]
    fn add_before_sealing_fails() {
        let mut store = HexaStore::new();
        store.add_terms(&triple("s", "p", "o")).unwrap();

        assert!(matches!(store.add(&triple("s", "p", "o")), Err(Error::DictionaryNotSealed)));
        assert!(matches!(store.add_all(vec![triple("s", "p", "o")]), Err(Error::DictionaryNotSealed)));
    }

    #[test]
    fn add_all_reports_skips_and_duplicates() {
        let known = [triple("a", "p", "b"), triple("b", "p", "c")];
        let mut store = sealed_store(&known);

        let report = store
            .add_all(vec![known[0].clone(), triple("a", "p", "zzz"), known[1].clone(), known[0].clone()])
            .unwrap();

        assert_eq!(report, AddReport { added: 2, duplicates: 1, skipped: 1 });
        assert_eq!(store.len(), 2);
        assert_eq!(index_sizes(&store), [2; 6]);
        assert!(store.contains(&known[1]));
    }

    #[test]
    fn terms_cannot_be_added_after_sealing() {
        let mut store = sealed_store(&[triple("s", "p", "o")]);

        assert!(matches!(store.add_term(&c("late")), Err(Error::DictionarySealed)));
        assert!(matches!(store.create_codex(), Err(Error::DictionarySealed)));
    }
}
