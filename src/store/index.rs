use super::{BuildHasher, EncodedTriple, TermId};
use std::collections::HashMap;

/// One of the six physical orderings of (subject, predicate, object).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permutation {
    Spo,
    Sop,
    Pso,
    Pos,
    Osp,
    Ops,
}

impl Permutation {
    pub const ALL: [Permutation; 6] = [
        Permutation::Spo,
        Permutation::Sop,
        Permutation::Pso,
        Permutation::Pos,
        Permutation::Osp,
        Permutation::Ops,
    ];

    /// Canonical position stored at each physical slot.
    const fn order(self) -> [usize; 3] {
        match self {
            Permutation::Spo => [0, 1, 2],
            Permutation::Sop => [0, 2, 1],
            Permutation::Pso => [1, 0, 2],
            Permutation::Pos => [1, 2, 0],
            Permutation::Osp => [2, 0, 1],
            Permutation::Ops => [2, 1, 0],
        }
    }

    /// Canonical (S, P, O) order to this physical order.
    pub fn permute(self, triple: EncodedTriple) -> EncodedTriple {
        let [a, b, c] = self.order();
        [triple[a], triple[b], triple[c]]
    }

    /// This physical order back to canonical (S, P, O) order.
    pub fn inverse(self, triple: EncodedTriple) -> EncodedTriple {
        let mut canonical = [0; 3];
        for (slot, position) in self.order().into_iter().enumerate() {
            canonical[position] = triple[slot];
        }
        canonical
    }
}

pub fn permute_triplet(triple: EncodedTriple, permutation: Permutation) -> EncodedTriple {
    permutation.permute(triple)
}

pub fn inverse_permute_triplet(triple: EncodedTriple, permutation: Permutation) -> EncodedTriple {
    permutation.inverse(triple)
}

/// Two level inverted index `first -> second -> [third]` over one [`Permutation`].
///
/// Triples are inserted in canonical order and permuted on the way in; search results
/// are in the physical order of the index. Duplicates are not filtered here.
pub struct PermutationIndex {
    permutation: Permutation,
    entries: HashMap<TermId, HashMap<TermId, Vec<TermId>, BuildHasher>, BuildHasher>,
}

impl PermutationIndex {
    pub fn new(permutation: Permutation) -> Self {
        Self { permutation, entries: HashMap::default() }
    }

    pub fn permutation(&self) -> Permutation {
        self.permutation
    }

    pub fn insert(&mut self, triple: EncodedTriple) {
        let [first, second, third] = self.permutation.permute(triple);

        self.entries
            .entry(first)
            .or_default()
            .entry(second)
            .or_default()
            .push(third);
    }

    pub fn extend<I: IntoIterator<Item = EncodedTriple>>(&mut self, triples: I) {
        for triple in triples {
            self.insert(triple);
        }
    }

    fn thirds(&self, first: TermId, second: TermId) -> &[TermId] {
        self.entries
            .get(&first)
            .and_then(|seconds| seconds.get(&second))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn search_by_three(&self, first: TermId, second: TermId, third: TermId) -> Option<EncodedTriple> {
        self.thirds(first, second)
            .contains(&third)
            .then_some([first, second, third])
    }

    pub fn search_by_two(&self, first: TermId, second: TermId) -> impl Iterator<Item = EncodedTriple> + '_ {
        self.thirds(first, second)
            .iter()
            .map(move |&third| [first, second, third])
    }

    pub fn search_by_one(&self, first: TermId) -> impl Iterator<Item = EncodedTriple> + '_ {
        self.entries
            .get(&first)
            .into_iter()
            .flat_map(move |seconds| {
                seconds
                    .iter()
                    .flat_map(move |(&second, thirds)| thirds.iter().map(move |&third| [first, second, third]))
            })
    }

    pub fn scan(&self) -> impl Iterator<Item = EncodedTriple> + '_ {
        self.entries.iter().flat_map(|(&first, seconds)| {
            seconds
                .iter()
                .flat_map(move |(&second, thirds)| thirds.iter().map(move |&third| [first, second, third]))
        })
    }
}
