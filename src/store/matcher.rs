use super::{
    dictionary::BoundPositions,
    index::{Permutation, PermutationIndex},
    EncodedTriple, HexaStore, SubstitutionSet, Substitutions,
};
use crate::{
    error::{Error, Result},
    rdf::{substitution::Substitution, Term, TripleAtom},
};

/// How a pattern is answered, chosen from which of its positions are bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessPath {
    ByThree(Permutation),
    ByTwo(Permutation),
    ByOne(Permutation),
    Scan(Permutation),
}

impl AccessPath {
    /// Bit 2 is the subject, bit 1 the predicate, bit 0 the object.
    pub fn boundness_mask(bound: &BoundPositions) -> u8 {
        bound
            .codes()
            .iter()
            .fold(0, |mask, code| (mask << 1) | u8::from(code.is_some()))
    }

    /// The index whose leading positions are exactly the bound ones.
    pub fn for_mask(mask: u8) -> AccessPath {
        match mask & 0b111 {
            0b111 => AccessPath::ByThree(Permutation::Spo),
            0b110 => AccessPath::ByTwo(Permutation::Spo),
            0b101 => AccessPath::ByTwo(Permutation::Sop),
            0b011 => AccessPath::ByTwo(Permutation::Pos),
            0b100 => AccessPath::ByOne(Permutation::Spo),
            0b010 => AccessPath::ByOne(Permutation::Pso),
            0b001 => AccessPath::ByOne(Permutation::Ops),
            _ => AccessPath::Scan(Permutation::Spo),
        }
    }

    pub fn permutation(self) -> Permutation {
        match self {
            AccessPath::ByThree(p) | AccessPath::ByTwo(p) | AccessPath::ByOne(p) | AccessPath::Scan(p) => p,
        }
    }
}

impl HexaStore {
    /// All distinct substitutions of the variables of `pattern` against the stored triples.
    ///
    /// Never fails: a constant the dictionary has not seen matches nothing.
    pub fn match_pattern(&self, pattern: &TripleAtom) -> Substitutions {
        match self.try_match_pattern(pattern) {
            Ok(substitutions) => substitutions,
            Err(Error::UnresolvedConstant(term)) => {
                tracing::debug!(%pattern, %term, "pattern mentions an unknown constant");
                SubstitutionSet::default()
            },
            Err(e) => {
                tracing::error!(%pattern, error = %e, "unable to decode pattern matches");
                SubstitutionSet::default()
            },
        }
        .into_iter()
    }

    pub(super) fn try_match_pattern(&self, pattern: &TripleAtom) -> Result<SubstitutionSet> {
        let bound = self.dictionary.resolve_bound_positions(pattern)?;
        let path = AccessPath::for_mask(AccessPath::boundness_mask(&bound));

        tracing::trace!(%pattern, ?path, "matching pattern");

        let mut substitutions = SubstitutionSet::default();
        for triple in self.lookup(path, bound) {
            if let Some(substitution) = self.bind_variables(pattern, triple)? {
                substitutions.insert(substitution);
            }
        }

        Ok(substitutions)
    }

    /// Raw hits of `path`, permuted back to canonical order.
    fn lookup(&self, path: AccessPath, bound: BoundPositions) -> Box<dyn Iterator<Item = EncodedTriple> + '_> {
        let index: &PermutationIndex = self.index(path.permutation());
        let [a, b, c] = index.permutation().permute(bound.codes().map(Option::unwrap_or_default));

        let hits: Box<dyn Iterator<Item = EncodedTriple> + '_> = match path {
            AccessPath::ByThree(_) => Box::new(index.search_by_three(a, b, c).into_iter()),
            AccessPath::ByTwo(_) => Box::new(index.search_by_two(a, b)),
            AccessPath::ByOne(_) => Box::new(index.search_by_one(a)),
            AccessPath::Scan(_) => Box::new(index.scan()),
        };

        Box::new(hits.map(move |triple| index.permutation().inverse(triple)))
    }

    /// Pairs the pattern with a canonical hit. Constant positions contribute nothing.
    /// `None` if a repeated variable would be bound to two different terms.
    fn bind_variables(&self, pattern: &TripleAtom, triple: EncodedTriple) -> Result<Option<Substitution>> {
        let mut substitution = Substitution::new();

        for (term, code) in pattern.terms().iter().zip(triple) {
            if let Term::Variable(var) = term {
                if !substitution.bind(var.clone(), self.dictionary.get_value(code)?) {
                    return Ok(None);
                }
            }
        }

        Ok(Some(substitution))
    }
}
